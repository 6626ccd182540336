//! Holt's linear method with an additive damped trend
//!
//! Extends double exponential smoothing with a damping factor `phi` so the
//! trend flattens out over long horizons instead of growing without bound.
//!
//! ```text
//! level_t = alpha * y_t + (1 - alpha) * (level_{t-1} + phi * trend_{t-1})
//! trend_t = beta * (level_t - level_{t-1}) + (1 - beta) * phi * trend_{t-1}
//! y_{T+h} = level_T + (phi + phi^2 + ... + phi^h) * trend_T
//! ```
//!
//! No seasonal component is modelled.

use algorithm_spi::{ensure_finite, Predictor, Result, TsError};
use serde::{Deserialize, Serialize};

const GRID_SMOOTHING: [f64; 10] = [0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
const GRID_DAMPING: [f64; 5] = [0.8, 0.85, 0.9, 0.95, 0.98];

/// Damped-trend exponential smoothing
///
/// # Example
///
/// ```rust
/// use algorithm_core::smoothing::DampedHolt;
/// use algorithm_core::Predictor;
///
/// let data = vec![100.0, 110.0, 121.0, 133.1, 146.4];
/// let model = DampedHolt::auto(&data).unwrap();
/// let forecast = model.predict(3).unwrap();
/// assert_eq!(forecast.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DampedHolt {
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Trend damping factor
    phi: f64,
    level: f64,
    trend: f64,
    /// Sum of squared one-step-ahead errors over the fitted history
    sse: f64,
    fitted: bool,
}

impl DampedHolt {
    /// Minimum series length accepted by `fit`
    pub const MIN_OBSERVATIONS: usize = 3;

    /// Create a new damped Holt model
    ///
    /// # Arguments
    ///
    /// * `alpha` - Level smoothing (0 < alpha < 1)
    /// * `beta` - Trend smoothing (0 < beta < 1)
    /// * `phi` - Trend damping (0 < phi <= 1, 1 disables damping)
    pub fn new(alpha: f64, beta: f64, phi: f64) -> Result<Self> {
        if !(0.0 < alpha && alpha < 1.0) {
            return Err(TsError::InvalidParameter {
                name: "alpha".to_string(),
                reason: "must be between 0 and 1 (exclusive)".to_string(),
            });
        }
        if !(0.0 < beta && beta < 1.0) {
            return Err(TsError::InvalidParameter {
                name: "beta".to_string(),
                reason: "must be between 0 and 1 (exclusive)".to_string(),
            });
        }
        if !(0.0 < phi && phi <= 1.0) {
            return Err(TsError::InvalidParameter {
                name: "phi".to_string(),
                reason: "must be in (0, 1]".to_string(),
            });
        }

        Ok(Self {
            alpha,
            beta,
            phi,
            level: 0.0,
            trend: 0.0,
            sse: 0.0,
            fitted: false,
        })
    }

    /// Fit with parameters chosen by grid search on the one-step-ahead SSE
    pub fn auto(data: &[f64]) -> Result<Self> {
        Self::check_input(data)?;

        let mut best: Option<((f64, f64, f64), f64)> = None;
        for &alpha in &GRID_SMOOTHING {
            for &beta in &GRID_SMOOTHING {
                for &phi in &GRID_DAMPING {
                    let model = Self::new(alpha, beta, phi)?;
                    let (_, _, sse) = model.smooth(data);
                    if !sse.is_finite() {
                        continue;
                    }
                    if best.map_or(true, |(_, current)| sse < current) {
                        best = Some(((alpha, beta, phi), sse));
                    }
                }
            }
        }

        let ((alpha, beta, phi), _) = best.ok_or_else(|| {
            TsError::NumericalError("no smoothing parameters produced a finite error".to_string())
        })?;

        let mut model = Self::new(alpha, beta, phi)?;
        model.fit(data)?;
        Ok(model)
    }

    fn check_input(data: &[f64]) -> Result<()> {
        if data.len() < Self::MIN_OBSERVATIONS {
            return Err(TsError::InsufficientData {
                required: Self::MIN_OBSERVATIONS,
                actual: data.len(),
            });
        }
        ensure_finite(data)
    }

    /// Run the recursions over `data`, returning final level, trend and SSE
    fn smooth(&self, data: &[f64]) -> (f64, f64, f64) {
        let mut level = data[0];
        let mut trend = data[1] - data[0];
        let mut sse = 0.0;

        for &value in &data[1..] {
            let error = value - (level + self.phi * trend);
            sse += error * error;

            let prev_level = level;
            level = self.alpha * value + (1.0 - self.alpha) * (level + self.phi * trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * self.phi * trend;
        }

        (level, trend, sse)
    }

    /// Get `(alpha, beta, phi)`
    pub fn params(&self) -> (f64, f64, f64) {
        (self.alpha, self.beta, self.phi)
    }

    /// Get current level and trend
    pub fn components(&self) -> (f64, f64) {
        (self.level, self.trend)
    }

    /// Sum of squared one-step-ahead errors of the fit
    pub fn sse(&self) -> f64 {
        self.sse
    }
}

impl Predictor for DampedHolt {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        Self::check_input(data)?;

        let (level, trend, sse) = self.smooth(data);
        if !(level.is_finite() && trend.is_finite() && sse.is_finite()) {
            return Err(TsError::NumericalError(
                "smoothing recursion diverged".to_string(),
            ));
        }

        self.level = level;
        self.trend = trend;
        self.sse = sse;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        let mut forecasts = Vec::with_capacity(steps);
        let mut damping = 0.0;
        let mut factor = 1.0;
        for _ in 0..steps {
            factor *= self.phi;
            damping += factor;
            forecasts.push(self.level + damping * self.trend);
        }

        Ok(forecasts)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_validation() {
        assert!(DampedHolt::new(0.3, 0.1, 0.9).is_ok());
        assert!(DampedHolt::new(0.3, 0.1, 1.0).is_ok());
        assert!(DampedHolt::new(0.0, 0.1, 0.9).is_err());
        assert!(DampedHolt::new(0.3, 1.0, 0.9).is_err());
        assert!(DampedHolt::new(0.3, 0.1, 0.0).is_err());
        assert!(DampedHolt::new(0.3, 0.1, 1.2).is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = DampedHolt::new(0.5, 0.5, 0.9).unwrap();
        assert_eq!(model.predict(3), Err(TsError::NotFitted));
    }

    #[test]
    fn test_undamped_linear_trend_is_exact() {
        let data: Vec<f64> = (0..10).map(|i| 10.0 + 3.0 * i as f64).collect();
        let mut model = DampedHolt::new(0.5, 0.5, 1.0).unwrap();
        model.fit(&data).unwrap();

        let forecast = model.predict(2).unwrap();
        assert!((forecast[0] - 40.0).abs() < 1e-9);
        assert!((forecast[1] - 43.0).abs() < 1e-9);
        assert!(model.sse() < 1e-12);
    }

    #[test]
    fn test_damped_trend_flattens() {
        let data: Vec<f64> = (0..10).map(|i| 10.0 + 3.0 * i as f64).collect();
        let mut model = DampedHolt::new(0.5, 0.5, 0.8).unwrap();
        model.fit(&data).unwrap();

        let forecast = model.predict(20).unwrap();
        let increments: Vec<f64> = forecast.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(increments.iter().all(|step| *step > 0.0));
        assert!(increments.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_auto_on_short_series() {
        let data = vec![100.0, 110.0, 121.0];
        let model = DampedHolt::auto(&data).unwrap();

        assert!(model.is_fitted());
        let (alpha, beta, phi) = model.params();
        assert!(alpha > 0.0 && alpha < 1.0);
        assert!(beta > 0.0 && beta < 1.0);
        assert!(phi > 0.0 && phi <= 1.0);

        let forecast = model.predict(2).unwrap();
        assert_eq!(forecast.len(), 2);
        assert!(forecast.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(
            DampedHolt::auto(&[5.0]).unwrap_err(),
            TsError::InsufficientData {
                required: 3,
                actual: 1
            }
        );
        assert!(matches!(
            DampedHolt::auto(&[1.0, f64::NAN, 3.0]),
            Err(TsError::InvalidData(_))
        ));
    }

    #[test]
    fn test_constant_series() {
        let model = DampedHolt::auto(&[8.0; 6]).unwrap();
        for value in model.predict(4).unwrap() {
            assert!((value - 8.0).abs() < 1e-9);
        }
    }
}
