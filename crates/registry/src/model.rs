//! Fitted per-entity models as stored in the registry.

use algorithm_core::{Arima, DampedHolt};
use algorithm_spi::{Predictor, Result, TsError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Technique and parameters that produced a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Technique {
    Arima { p: usize, d: usize, q: usize },
    ExponentialSmoothing { alpha: f64, beta: f64, phi: f64 },
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Technique::Arima { p, d, q } => write!(f, "ARIMA({},{},{})", p, d, q),
            Technique::ExponentialSmoothing { alpha, beta, phi } => write!(
                f,
                "ExponentialSmoothing(alpha={:.2}, beta={:.2}, phi={:.2})",
                alpha, beta, phi
            ),
        }
    }
}

/// Fitted state of whichever technique succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "state", rename_all = "snake_case")]
pub enum FittedState {
    Arima(Arima),
    DampedHolt(DampedHolt),
}

impl FittedState {
    pub fn technique(&self) -> Technique {
        match self {
            FittedState::Arima(model) => {
                let (p, d, q) = model.params();
                Technique::Arima { p, d, q }
            }
            FittedState::DampedHolt(model) => {
                let (alpha, beta, phi) = model.params();
                Technique::ExponentialSmoothing { alpha, beta, phi }
            }
        }
    }

    fn predictor(&self) -> &dyn Predictor {
        match self {
            FittedState::Arima(model) => model,
            FittedState::DampedHolt(model) => model,
        }
    }
}

/// A trained model for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    state: FittedState,
    /// Year of the last observation the model was fitted on
    last_observed_year: i32,
    /// Number of observations the model was fitted on
    observations: usize,
}

impl FittedModel {
    pub fn new(state: FittedState, last_observed_year: i32, observations: usize) -> Self {
        Self {
            state,
            last_observed_year,
            observations,
        }
    }

    pub fn technique(&self) -> Technique {
        self.state.technique()
    }

    pub fn state(&self) -> &FittedState {
        &self.state
    }

    pub fn last_observed_year(&self) -> i32 {
        self.last_observed_year
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Produce `horizon` forecasts following the last observed year.
    ///
    /// Fails if the model is unfitted or yields a non-finite value.
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let values = self.state.predictor().predict(horizon)?;
        if let Some(step) = values.iter().position(|v| !v.is_finite()) {
            return Err(TsError::NumericalError(format!(
                "forecast step {} is not finite",
                step + 1
            )));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holt_model() -> FittedModel {
        let holt = DampedHolt::auto(&[100.0, 110.0, 121.0]).unwrap();
        FittedModel::new(FittedState::DampedHolt(holt), 2020, 3)
    }

    #[test]
    fn test_forecast_length() {
        let model = holt_model();
        assert_eq!(model.forecast(3).unwrap().len(), 3);
        assert!(model.forecast(0).unwrap().is_empty());
    }

    #[test]
    fn test_unfitted_state_fails() {
        let arima = Arima::new(1, 1, 0).unwrap();
        let model = FittedModel::new(FittedState::Arima(arima), 2020, 0);
        assert_eq!(model.forecast(2), Err(TsError::NotFitted));
    }

    #[test]
    fn test_technique_reporting() {
        let model = holt_model();
        assert!(matches!(model.technique(), Technique::ExponentialSmoothing { .. }));
        assert_eq!(model.last_observed_year(), 2020);
        assert_eq!(model.observations(), 3);

        let label = Technique::Arima { p: 1, d: 1, q: 0 }.to_string();
        assert_eq!(label, "ARIMA(1,1,0)");
    }

    #[test]
    fn test_state_serializes_with_tag() {
        let json = serde_json::to_value(holt_model()).unwrap();
        assert_eq!(json["state"]["model"], "damped_holt");
        assert_eq!(json["last_observed_year"], 2020);
    }
}
