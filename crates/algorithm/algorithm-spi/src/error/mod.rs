//! Error types for algorithm operations

mod ts_error;

pub use ts_error::{ensure_finite, Result, TsError};
