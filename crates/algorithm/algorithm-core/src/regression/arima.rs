//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: Uses past values to predict future values
//! - **I (Integrated)**: Differencing to achieve stationarity
//! - **MA (Moving Average)**: Uses past forecast errors
//!
//! AR terms are estimated with the Yule-Walker equations, MA terms from the
//! autocorrelation of the AR residuals. The conditional residuals of the
//! combined model give the variance used for the information criteria.
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::regression::Arima;
//! use algorithm_core::Predictor;
//!
//! let data: Vec<f64> = (1..=30).map(|x| x as f64).collect();
//! let mut model = Arima::new(0, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

use crate::utils::stats::{difference, mean};
use algorithm_spi::{ensure_finite, Predictor, Result, TsError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arima {
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    /// Mean of the differenced series
    constant: f64,
    /// Last value of the series at each differencing level `0..d`
    integration_tails: Vec<f64>,
    differenced_data: Vec<f64>,
    residuals: Vec<f64>,
    /// Residuals before this index are left out of the likelihood. Never
    /// less than `p`; a shared value makes criteria of different orders
    /// comparable.
    #[serde(default)]
    conditioning: usize,
    /// Conditional residual variance
    sigma2: f64,
    /// Number of residuals the variance was computed from
    n_effective: usize,
    fitted: bool,
}

impl Arima {
    /// Create a new ARIMA model with specified orders
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > 10 {
            return Err(TsError::InvalidParameter {
                name: "p".to_string(),
                reason: "AR order must be <= 10".to_string(),
            });
        }
        if d > 2 {
            return Err(TsError::InvalidParameter {
                name: "d".to_string(),
                reason: "Differencing order must be <= 2".to_string(),
            });
        }
        if q > 10 {
            return Err(TsError::InvalidParameter {
                name: "q".to_string(),
                reason: "MA order must be <= 10".to_string(),
            });
        }

        Ok(Self {
            p,
            d,
            q,
            ar_coeffs: vec![0.0; p],
            ma_coeffs: vec![0.0; q],
            constant: 0.0,
            integration_tails: Vec::new(),
            differenced_data: Vec::new(),
            residuals: Vec::new(),
            conditioning: 0,
            sigma2: 0.0,
            n_effective: 0,
            fitted: false,
        })
    }

    /// Score the fit on residuals from index `lags` of the differenced series
    /// onwards (or from `p` if that is later).
    ///
    /// Candidates compared by an information criterion must share the same
    /// value, otherwise each is scored on a different number of observations.
    pub fn with_conditioning(mut self, lags: usize) -> Self {
        self.conditioning = lags;
        self
    }

    /// First residual index used for the variance and likelihood
    fn scoring_start(&self) -> usize {
        self.p.max(self.conditioning)
    }

    /// Minimum series length accepted by `fit` for the given orders
    pub fn min_observations(p: usize, d: usize, q: usize) -> usize {
        p + d + q + 10
    }

    /// Integrate forecasts made on the differenced scale back to levels
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for tail in self.integration_tails.iter().rev() {
            let mut level = *tail;
            for value in result.iter_mut() {
                level += *value;
                *value = level;
            }
        }
        result
    }

    /// Estimate AR coefficients with Levinson-Durbin on the sample autocovariances
    fn estimate_ar_coefficients(&self, data: &[f64]) -> Vec<f64> {
        let mut coeffs = vec![0.0; self.p];
        if self.p == 0 {
            return coeffs;
        }

        let n = data.len();
        let m = mean(data);
        let centered: Vec<f64> = data.iter().map(|x| x - m).collect();

        let autocov: Vec<f64> = (0..=self.p)
            .map(|k| (k..n).map(|i| centered[i] * centered[i - k]).sum::<f64>() / n as f64)
            .collect();

        if autocov[0].abs() <= 1e-10 {
            return coeffs;
        }

        let mut error = autocov[0];
        for k in 0..self.p {
            let mut acc = autocov[k + 1];
            for j in 0..k {
                acc -= coeffs[j] * autocov[k - j];
            }
            let reflection = acc / error;

            let previous = coeffs.clone();
            coeffs[k] = reflection;
            for j in 0..k {
                coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
            }

            error *= 1.0 - reflection * reflection;
            if error <= 1e-12 {
                break;
            }
        }

        coeffs
    }

    /// Estimate MA coefficients from residual autocorrelations
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        let mut coeffs = vec![0.0; self.q];
        if self.q == 0 || residuals.is_empty() {
            return coeffs;
        }

        let n = residuals.len();
        let m = mean(residuals);
        let centered: Vec<f64> = residuals.iter().map(|x| x - m).collect();
        let var: f64 = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

        if var.abs() > 1e-10 {
            for (k, coeff) in coeffs.iter_mut().enumerate() {
                let sum: f64 = ((k + 1)..n)
                    .map(|i| centered[i] * centered[i - k - 1])
                    .sum();
                // Bounded to keep the recursion invertible
                *coeff = ((sum / n as f64) / var).clamp(-0.99, 0.99);
            }
        }

        coeffs
    }

    /// One-step-ahead residuals of the differenced series, starting at lag `p`
    fn conditional_residuals(&self, ma_coeffs: &[f64]) -> Vec<f64> {
        let w = &self.differenced_data;
        let mut residuals = vec![0.0; w.len()];

        for i in self.p..w.len() {
            let mut prediction = self.constant;
            for (j, phi) in self.ar_coeffs.iter().enumerate() {
                prediction += phi * (w[i - j - 1] - self.constant);
            }
            for (j, theta) in ma_coeffs.iter().enumerate() {
                if i > j {
                    prediction += theta * residuals[i - j - 1];
                }
            }
            residuals[i] = w[i] - prediction;
        }

        residuals
    }

    fn log_likelihood(&self) -> Result<f64> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        let n = self.n_effective as f64;
        Ok(-0.5 * n * ((2.0 * PI * self.sigma2).ln() + 1.0))
    }

    /// Number of estimated parameters: AR, MA, constant and variance
    pub fn n_params(&self) -> usize {
        self.p + self.q + 2
    }

    /// Akaike information criterion
    pub fn aic(&self) -> Result<f64> {
        let ll = self.log_likelihood()?;
        Ok(-2.0 * ll + 2.0 * self.n_params() as f64)
    }

    /// AIC with the small-sample correction, infinite when undefined
    pub fn aicc(&self) -> Result<f64> {
        let aic = self.aic()?;
        let k = self.n_params() as f64;
        let n = self.n_effective as f64;
        if n - k - 1.0 <= 0.0 {
            return Ok(f64::INFINITY);
        }
        Ok(aic + 2.0 * k * (k + 1.0) / (n - k - 1.0))
    }

    /// Bayesian information criterion
    pub fn bic(&self) -> Result<f64> {
        let ll = self.log_likelihood()?;
        Ok(-2.0 * ll + self.n_params() as f64 * (self.n_effective as f64).ln())
    }

    /// Get model orders `(p, d, q)`
    pub fn params(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Get AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Get MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Conditional residual variance of the fit
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let min_required = Self::min_observations(self.p, self.d, self.q);
        if data.len() < min_required {
            return Err(TsError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }
        ensure_finite(data)?;

        self.fitted = false;
        self.integration_tails = (0..self.d)
            .filter_map(|level| difference(data, level).last().copied())
            .collect();
        self.differenced_data = difference(data, self.d);
        self.constant = mean(&self.differenced_data);
        self.ar_coeffs = self.estimate_ar_coefficients(&self.differenced_data);

        let ar_residuals = self.conditional_residuals(&[]);
        self.ma_coeffs = self.estimate_ma_coefficients(&ar_residuals[self.p..]);
        self.residuals = self.conditional_residuals(&self.ma_coeffs);

        let start = self.scoring_start();
        if self.residuals.len() <= start {
            return Err(TsError::InsufficientData {
                required: start + self.d + 1,
                actual: data.len(),
            });
        }
        let used = &self.residuals[start..];
        if used.iter().any(|e| !e.is_finite()) {
            return Err(TsError::NumericalError(
                "residuals are not finite".to_string(),
            ));
        }
        self.n_effective = used.len();
        // Exact fits keep a tiny positive variance so the likelihood stays finite
        self.sigma2 = (used.iter().map(|e| e * e).sum::<f64>() / used.len() as f64)
            .max(f64::MIN_POSITIVE);

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.differenced_data.len();
        let mut extended = self.differenced_data.clone();
        let mut extended_residuals = self.residuals.clone();

        for _ in 0..steps {
            let mut forecast = self.constant;

            for (j, phi) in self.ar_coeffs.iter().enumerate() {
                let idx = extended.len() - j - 1;
                forecast += phi * (extended[idx] - self.constant);
            }

            for (j, theta) in self.ma_coeffs.iter().enumerate() {
                if extended_residuals.len() > j {
                    let idx = extended_residuals.len() - j - 1;
                    forecast += theta * extended_residuals[idx];
                }
            }

            extended.push(forecast);
            extended_residuals.push(0.0); // Future residuals are 0
        }

        Ok(self.undifference(&extended[n..]))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
