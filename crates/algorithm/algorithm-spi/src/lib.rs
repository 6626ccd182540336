//! Algorithm Service Provider Interface
//!
//! Defines the contracts every forecasting algorithm in the workspace
//! implements:
//!
//! - [`Predictor`]: fit-then-predict interface for univariate series
//! - [`TsError`]: error type shared by all algorithm operations
//! - [`Result`]: result alias over [`TsError`]

pub mod contract;
pub mod error;

pub use contract::Predictor;
pub use error::{ensure_finite, Result, TsError};
