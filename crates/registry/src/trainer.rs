//! Per-entity training with a primary and a fallback technique.
//!
//! Every entity ends in a [`TrainOutcome`]; a failure for one entity never
//! stops the batch. The outcomes are folded into a [`TrainingReport`] holding
//! the registry and a record of what was skipped.

use crate::error::{RegistryError, Result};
use crate::model::{FittedModel, Technique};
use crate::observation::{group_by_entity, EntitySeries, Observation};
use crate::registry::ModelRegistry;
use crate::technique::{AutoArimaTechnique, DampedHoltTechnique, FittingTechnique};
use algorithm_spi::TsError;
use serde::Serialize;

/// Result of training one entity.
#[derive(Debug, Clone)]
pub enum TrainOutcome {
    /// A model was fitted; `fallback_reason` is set when the primary failed
    Trained {
        model: FittedModel,
        fallback_reason: Option<TsError>,
    },
    /// Both techniques failed
    Skipped { primary: TsError, fallback: TsError },
}

/// Summary line for a trained entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedEntity {
    pub entity: String,
    pub technique: Technique,
    pub used_fallback: bool,
}

/// An entity left out of the registry, with both failure reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntity {
    pub entity: String,
    pub primary_error: String,
    pub fallback_error: String,
}

/// Registry plus the per-entity record of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub registry: ModelRegistry,
    pub trained: Vec<TrainedEntity>,
    pub skipped: Vec<SkippedEntity>,
}

impl TrainingReport {
    /// Take the registry, failing when nothing was trained.
    pub fn into_registry(self) -> Result<ModelRegistry> {
        if self.registry.is_empty() {
            return Err(RegistryError::NothingTrained {
                skipped: self.skipped.len(),
            });
        }
        Ok(self.registry)
    }
}

/// Trains one model per entity.
pub struct Trainer {
    primary: Box<dyn FittingTechnique>,
    fallback: Box<dyn FittingTechnique>,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(
            Box::new(AutoArimaTechnique::default()),
            Box::new(DampedHoltTechnique),
        )
    }
}

impl Trainer {
    pub fn new(primary: Box<dyn FittingTechnique>, fallback: Box<dyn FittingTechnique>) -> Self {
        Self { primary, fallback }
    }

    /// Fit one series: primary first, fallback on any primary failure.
    pub fn train_series(&self, series: &EntitySeries) -> TrainOutcome {
        let last_year = series.last_year().unwrap_or_default();
        let fitted = |state| FittedModel::new(state, last_year, series.len());

        let primary_error = match self.primary.fit(&series.values) {
            Ok(state) => {
                return TrainOutcome::Trained {
                    model: fitted(state),
                    fallback_reason: None,
                }
            }
            Err(e) => e,
        };

        match self.fallback.fit(&series.values) {
            Ok(state) => TrainOutcome::Trained {
                model: fitted(state),
                fallback_reason: Some(primary_error),
            },
            Err(fallback) => TrainOutcome::Skipped {
                primary: primary_error,
                fallback,
            },
        }
    }

    /// Train every entity present in `observations`.
    pub fn train(&self, observations: &[Observation]) -> TrainingReport {
        let mut models = Vec::new();
        let mut trained = Vec::new();
        let mut skipped = Vec::new();

        for series in group_by_entity(observations) {
            match self.train_series(&series) {
                TrainOutcome::Trained {
                    model,
                    fallback_reason,
                } => {
                    let technique = model.technique();
                    if let Some(reason) = &fallback_reason {
                        tracing::warn!(
                            entity = %series.entity,
                            primary = self.primary.name(),
                            error = %reason,
                            "primary technique failed, used {}",
                            self.fallback.name()
                        );
                    }
                    tracing::info!(
                        entity = %series.entity,
                        observations = series.len(),
                        technique = %technique,
                        "model trained"
                    );
                    trained.push(TrainedEntity {
                        entity: series.entity.clone(),
                        technique,
                        used_fallback: fallback_reason.is_some(),
                    });
                    models.push((series.entity, model));
                }
                TrainOutcome::Skipped { primary, fallback } => {
                    tracing::warn!(
                        entity = %series.entity,
                        primary_error = %primary,
                        fallback_error = %fallback,
                        "both techniques failed, entity skipped"
                    );
                    skipped.push(SkippedEntity {
                        entity: series.entity,
                        primary_error: primary.to_string(),
                        fallback_error: fallback.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            trained = trained.len(),
            skipped = skipped.len(),
            "training finished"
        );

        TrainingReport {
            registry: models.into_iter().collect(),
            trained,
            skipped,
        }
    }
}
