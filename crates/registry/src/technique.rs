//! Fitting strategies tried for each entity's series.

use crate::model::FittedState;
use algorithm_core::{AutoArima, DampedHolt};
use algorithm_spi::Result;

/// A way of turning one ordered series into a fitted model.
pub trait FittingTechnique: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Fit the series, failing for any numerical or data problem
    fn fit(&self, series: &[f64]) -> Result<FittedState>;
}

/// Non-seasonal ARIMA with orders selected by an information criterion.
#[derive(Debug, Clone, Default)]
pub struct AutoArimaTechnique {
    search: AutoArima,
}

impl AutoArimaTechnique {
    pub fn new(search: AutoArima) -> Self {
        Self { search }
    }
}

impl FittingTechnique for AutoArimaTechnique {
    fn name(&self) -> &str {
        "auto_arima"
    }

    fn fit(&self, series: &[f64]) -> Result<FittedState> {
        let selection = self.search.fit(series)?;
        let (p, d, q) = selection.order;
        tracing::debug!(
            p,
            d,
            q,
            score = selection.score,
            candidates = selection.candidates,
            criterion = %self.search.criterion(),
            "optimal ARIMA order selected"
        );
        Ok(FittedState::Arima(selection.model))
    }
}

/// Additive damped-trend exponential smoothing without seasonality.
#[derive(Debug, Clone, Copy, Default)]
pub struct DampedHoltTechnique;

impl FittingTechnique for DampedHoltTechnique {
    fn name(&self) -> &str {
        "exponential_smoothing"
    }

    fn fit(&self, series: &[f64]) -> Result<FittedState> {
        DampedHolt::auto(series).map(FittedState::DampedHolt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm_spi::TsError;

    #[test]
    fn test_auto_arima_technique() {
        let series: Vec<f64> = (0..40)
            .map(|i| 300.0 + 4.0 * i as f64 + (i as f64 * 1.1).sin())
            .collect();
        let state = AutoArimaTechnique::default().fit(&series).unwrap();
        assert!(matches!(state, FittedState::Arima(_)));
    }

    #[test]
    fn test_auto_arima_technique_short_series() {
        let result = AutoArimaTechnique::default().fit(&[1.0, 2.0]);
        assert!(matches!(result, Err(TsError::InsufficientData { .. })));
    }

    #[test]
    fn test_damped_holt_technique() {
        let state = DampedHoltTechnique.fit(&[5.0, 6.0, 7.5, 8.0]).unwrap();
        assert!(matches!(state, FittedState::DampedHolt(_)));
        assert_eq!(DampedHoltTechnique.name(), "exponential_smoothing");
    }
}
