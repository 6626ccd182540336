//! Numerical helpers shared by the models

pub mod stats;

pub use stats::{difference, kpss_statistic, mean, ndiffs, KPSS_CRITICAL_5PCT};
