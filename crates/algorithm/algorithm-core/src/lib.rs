//! Algorithm Core Implementations
//!
//! Forecasting models used to build per-country emission forecasts,
//! organized by category:
//!
//! - [`regression`]: ARIMA and automatic ARIMA order selection
//! - [`smoothing`]: Holt's linear method with a damped trend
//! - [`utils`]: differencing, moments and the KPSS stationarity test
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::prelude::*;
//!
//! let data: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64 + (i as f64).sin()).collect();
//! let selection = AutoArima::default().fit(&data).unwrap();
//! let forecast = selection.model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

pub mod regression;
pub mod smoothing;
pub mod utils;

// Re-export from SPI
pub use algorithm_spi::{Predictor, Result, TsError};

pub use regression::*;
pub use smoothing::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use algorithm_spi::Predictor;
    pub use crate::regression::{Arima, ArimaSelection, AutoArima, InformationCriterion};
    pub use crate::smoothing::DampedHolt;
    pub use algorithm_spi::{Result, TsError};
}
