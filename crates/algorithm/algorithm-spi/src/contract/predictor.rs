//! Predictor trait for time series algorithms

use crate::error::Result;

/// Common trait for all univariate time series predictors
///
/// Follows the fit-predict pattern: a model is fitted once on an ordered
/// history and can then forecast any number of steps past its last
/// observation. `predict` takes `&self`, so forecasting never changes the
/// fitted state and repeated calls return identical values.
///
/// # Example
///
/// ```rust,ignore
/// use algorithm_spi::Predictor;
///
/// fn forecast<P: Predictor>(predictor: &mut P, data: &[f64], horizon: usize) -> algorithm_spi::Result<Vec<f64>> {
///     predictor.fit(data)?;
///     predictor.predict(horizon)
/// }
/// ```
pub trait Predictor {
    /// Fit the model to a chronologically ordered history
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Forecast `steps` values following the last fitted observation
    fn predict(&self, steps: usize) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsError;

    /// Forecasts the last observed value
    struct NaivePredictor {
        last: Option<f64>,
    }

    impl Predictor for NaivePredictor {
        fn fit(&mut self, data: &[f64]) -> Result<()> {
            let last = data.last().copied().ok_or(TsError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
            self.last = Some(last);
            Ok(())
        }

        fn predict(&self, steps: usize) -> Result<Vec<f64>> {
            self.last
                .map(|value| vec![value; steps])
                .ok_or(TsError::NotFitted)
        }

        fn is_fitted(&self) -> bool {
            self.last.is_some()
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let predictor = NaivePredictor { last: None };
        assert!(!predictor.is_fitted());
        assert_eq!(predictor.predict(2), Err(TsError::NotFitted));
    }

    #[test]
    fn test_fit_then_predict() {
        let mut predictor = NaivePredictor { last: None };
        predictor.fit(&[1.0, 2.0, 5.0]).unwrap();

        assert!(predictor.is_fitted());
        assert_eq!(predictor.predict(3).unwrap(), vec![5.0, 5.0, 5.0]);
        assert!(predictor.predict(0).unwrap().is_empty());
    }

    #[test]
    fn test_fit_empty_series() {
        let mut predictor = NaivePredictor { last: None };
        assert_eq!(
            predictor.fit(&[]),
            Err(TsError::InsufficientData {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_predictor_as_trait_object() {
        let mut predictor: Box<dyn Predictor> = Box::new(NaivePredictor { last: None });
        predictor.fit(&[4.0]).unwrap();
        assert_eq!(predictor.predict(1).unwrap(), vec![4.0]);
    }
}
