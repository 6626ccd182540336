//! Exponential smoothing for trending series without seasonality

pub mod damped_holt;

pub use damped_holt::DampedHolt;
