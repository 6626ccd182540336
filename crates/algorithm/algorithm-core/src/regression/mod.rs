//! Regression models for time series forecasting
//!
//! ## Algorithms
//!
//! - **ARIMA**: AutoRegressive Integrated Moving Average
//! - **Auto ARIMA**: non-seasonal order search ranked by an information criterion

pub mod arima;
pub mod auto_arima;

pub use arima::Arima;
pub use auto_arima::{ArimaSelection, AutoArima, InformationCriterion};
