//! Read-only forecasting over a loaded registry

use algorithm_spi::TsError;
use emissions_registry::ModelRegistry;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// First forecast year when a request does not name one
pub const DEFAULT_START_YEAR: i32 = 2024;
/// Last forecast year when a request does not name one
pub const DEFAULT_END_YEAR: i32 = 2050;
/// Longest range a single request may ask for, in years
pub const MAX_HORIZON: usize = 1_000;

/// Errors returned by [`ForecastService::forecast`]
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("No model found for {0}")]
    NotFound(String),

    #[error("end_year {end} is before start_year {start}")]
    InvalidRange { start: i32, end: i32 },

    #[error("requested {requested} years, at most {max} allowed")]
    HorizonTooLong { requested: usize, max: usize },

    #[error("forecast failed for {entity}: {source}")]
    Internal {
        entity: String,
        #[source]
        source: TsError,
    },
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, ForecastError> {
        if end < start {
            return Err(ForecastError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of years in the range, `end - start + 1`
    pub fn horizon(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// One forecast value labelled with its year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyPrediction {
    pub year: i32,
    pub emissions: f64,
}

/// Forecast response for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityForecast {
    pub country: String,
    pub predictions: Vec<YearlyPrediction>,
}

/// Forecasting operations over an immutable registry
#[derive(Debug, Clone)]
pub struct ForecastService {
    registry: Arc<ModelRegistry>,
    defaults: YearRange,
}

impl ForecastService {
    pub fn new(registry: Arc<ModelRegistry>, defaults: YearRange) -> Self {
        Self { registry, defaults }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn defaults(&self) -> YearRange {
        self.defaults
    }

    /// Identifiers of every entity with a model
    pub fn entities(&self) -> Vec<String> {
        self.registry.entities()
    }

    /// Forecast `entity` for each year of `[start_year, end_year]`.
    ///
    /// Missing bounds fall back to the configured defaults. The model
    /// produces `end_year - start_year + 1` values that are labelled with
    /// consecutive years starting at `start_year`.
    pub fn forecast(
        &self,
        entity: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<EntityForecast, ForecastError> {
        let model = self
            .registry
            .get(entity)
            .ok_or_else(|| ForecastError::NotFound(entity.to_string()))?;

        let range = YearRange::new(
            start_year.unwrap_or(self.defaults.start),
            end_year.unwrap_or(self.defaults.end),
        )?;
        let horizon = range.horizon();
        if horizon > MAX_HORIZON {
            return Err(ForecastError::HorizonTooLong {
                requested: horizon,
                max: MAX_HORIZON,
            });
        }

        let values = model
            .forecast(horizon)
            .map_err(|source| ForecastError::Internal {
                entity: entity.to_string(),
                source,
            })?;

        let predictions = range
            .years()
            .zip(values)
            .map(|(year, emissions)| YearlyPrediction { year, emissions })
            .collect();

        Ok(EntityForecast {
            country: entity.to_string(),
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm_core::{Arima, DampedHolt};
    use emissions_registry::{FittedModel, FittedState};

    fn service() -> ForecastService {
        let holt = DampedHolt::auto(&[100.0, 110.0, 121.0]).unwrap();
        let unfitted = Arima::new(1, 1, 0).unwrap();
        let registry: ModelRegistry = vec![
            (
                "A".to_string(),
                FittedModel::new(FittedState::DampedHolt(holt), 2020, 3),
            ),
            (
                "Broken".to_string(),
                FittedModel::new(FittedState::Arima(unfitted), 2020, 0),
            ),
        ]
        .into_iter()
        .collect();

        ForecastService::new(Arc::new(registry), YearRange::new(2024, 2050).unwrap())
    }

    #[test]
    fn test_year_range() {
        let range = YearRange::new(2024, 2026).unwrap();
        assert_eq!(range.horizon(), 3);
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
        assert_eq!(YearRange::new(2030, 2030).unwrap().horizon(), 1);
        assert_eq!(
            YearRange::new(2030, 2029),
            Err(ForecastError::InvalidRange {
                start: 2030,
                end: 2029
            })
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(service().entities(), vec!["A", "Broken"]);
    }

    #[test]
    fn test_forecast_explicit_range() {
        let forecast = service().forecast("A", Some(2024), Some(2026)).unwrap();
        assert_eq!(forecast.country, "A");
        let years: Vec<i32> = forecast.predictions.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2024, 2025, 2026]);
    }

    #[test]
    fn test_forecast_default_range() {
        let forecast = service().forecast("A", None, None).unwrap();
        assert_eq!(forecast.predictions.len(), 27);
        assert_eq!(forecast.predictions.first().unwrap().year, 2024);
        assert_eq!(forecast.predictions.last().unwrap().year, 2050);

        let forecast = service().forecast("A", Some(2045), None).unwrap();
        assert_eq!(forecast.predictions.len(), 6);
    }

    #[test]
    fn test_forecast_unknown_entity() {
        assert_eq!(
            service().forecast("Atlantis", None, None),
            Err(ForecastError::NotFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_forecast_internal_failure() {
        let result = service().forecast("Broken", Some(2024), Some(2025));
        assert!(matches!(
            result,
            Err(ForecastError::Internal { ref entity, source: TsError::NotFitted }) if entity == "Broken"
        ));
    }

    #[test]
    fn test_forecast_invalid_and_oversized_ranges() {
        assert!(matches!(
            service().forecast("A", Some(2030), Some(2020)),
            Err(ForecastError::InvalidRange { .. })
        ));
        assert!(matches!(
            service().forecast("A", Some(0), Some(5000)),
            Err(ForecastError::HorizonTooLong { requested: 5001, .. })
        ));
    }

    #[test]
    fn test_forecast_is_idempotent() {
        let service = service();
        let first = service.forecast("A", Some(2021), Some(2030)).unwrap();
        let second = service.forecast("A", Some(2021), Some(2030)).unwrap();
        assert_eq!(first, second);
    }
}
