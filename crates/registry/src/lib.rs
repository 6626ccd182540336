//! # emissions-registry
//!
//! Trains one forecasting model per country and persists the resulting
//! country → model mapping as a single registry file.
//!
//! - [`observation`]: loading `(country, year, value)` rows from CSV
//! - [`technique`]: the fitting strategies tried for each series
//! - [`trainer`]: primary/fallback training with a per-country outcome
//! - [`registry`]: the immutable registry and its file format
//!
//! ## Example
//!
//! ```rust
//! use emissions_registry::{Observation, Trainer};
//!
//! let observations = vec![
//!     Observation::new("A", 2018, 100.0),
//!     Observation::new("A", 2019, 110.0),
//!     Observation::new("A", 2020, 121.0),
//! ];
//! let report = Trainer::default().train(&observations);
//! let registry = report.into_registry().unwrap();
//! assert_eq!(registry.entities(), vec!["A".to_string()]);
//! ```

mod error;
pub mod model;
pub mod observation;
pub mod registry;
pub mod technique;
pub mod trainer;

pub use error::{RegistryError, Result};
pub use model::{FittedModel, FittedState, Technique};
pub use observation::{group_by_entity, load_observations, read_observations, ColumnSpec, EntitySeries, Observation};
pub use registry::{ModelRegistry, REGISTRY_FORMAT_VERSION};
pub use technique::{AutoArimaTechnique, DampedHoltTechnique, FittingTechnique};
pub use trainer::{SkippedEntity, TrainOutcome, TrainedEntity, Trainer, TrainingReport};
