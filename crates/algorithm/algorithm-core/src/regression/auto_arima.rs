//! Automatic non-seasonal ARIMA order selection
//!
//! The differencing order is fixed first with repeated KPSS tests, then every
//! `(p, q)` pair up to the configured maxima is fitted and ranked by an
//! information criterion. Candidates that fail to fit are skipped. Every
//! candidate is scored on the same residuals, those after the first `max_p`
//! differenced values.

use crate::regression::Arima;
use crate::utils::stats::ndiffs;
use algorithm_spi::{ensure_finite, Predictor, Result, TsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Criterion used to rank candidate orders (lower is better)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationCriterion {
    #[default]
    Aic,
    Aicc,
    Bic,
}

impl InformationCriterion {
    /// Score a fitted model
    pub fn score(&self, model: &Arima) -> Result<f64> {
        match self {
            InformationCriterion::Aic => model.aic(),
            InformationCriterion::Aicc => model.aicc(),
            InformationCriterion::Bic => model.bic(),
        }
    }
}

impl fmt::Display for InformationCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InformationCriterion::Aic => write!(f, "aic"),
            InformationCriterion::Aicc => write!(f, "aicc"),
            InformationCriterion::Bic => write!(f, "bic"),
        }
    }
}

impl FromStr for InformationCriterion {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aic" => Ok(InformationCriterion::Aic),
            "aicc" => Ok(InformationCriterion::Aicc),
            "bic" => Ok(InformationCriterion::Bic),
            other => Err(TsError::InvalidParameter {
                name: "criterion".to_string(),
                reason: format!("unknown information criterion '{}'", other),
            }),
        }
    }
}

/// Outcome of an order search
#[derive(Debug, Clone)]
pub struct ArimaSelection {
    /// Fitted model with the best score
    pub model: Arima,
    /// Selected `(p, d, q)`
    pub order: (usize, usize, usize),
    /// Criterion value of the selected model
    pub score: f64,
    /// Number of `(p, q)` candidates tried
    pub candidates: usize,
}

/// Non-seasonal ARIMA order search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoArima {
    max_p: usize,
    max_d: usize,
    max_q: usize,
    criterion: InformationCriterion,
}

impl Default for AutoArima {
    fn default() -> Self {
        Self {
            max_p: 3,
            max_d: 2,
            max_q: 3,
            criterion: InformationCriterion::Aic,
        }
    }
}

impl AutoArima {
    /// Create a search with explicit bounds
    pub fn new(max_p: usize, max_d: usize, max_q: usize) -> Result<Self> {
        // Validates the bounds against the model limits
        Arima::new(max_p, max_d, max_q)?;
        Ok(Self {
            max_p,
            max_d,
            max_q,
            criterion: InformationCriterion::default(),
        })
    }

    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Upper bounds `(max_p, max_d, max_q)`
    pub fn bounds(&self) -> (usize, usize, usize) {
        (self.max_p, self.max_d, self.max_q)
    }

    /// Differencing order chosen by the KPSS test
    pub fn select_d(&self, data: &[f64]) -> usize {
        ndiffs(data, self.max_d)
    }

    /// Search the order grid and return the best fitted model
    pub fn fit(&self, data: &[f64]) -> Result<ArimaSelection> {
        ensure_finite(data)?;
        let d = self.select_d(data);

        let mut best: Option<(Arima, f64)> = None;
        let mut candidates = 0;
        let mut last_error = None;

        for p in 0..=self.max_p {
            for q in 0..=self.max_q {
                candidates += 1;
                let scored = Arima::new(p, d, q).and_then(|model| {
                    let mut model = model.with_conditioning(self.max_p);
                    model.fit(data)?;
                    let score = self.criterion.score(&model)?;
                    Ok((model, score))
                });

                match scored {
                    Ok((model, score)) if score.is_finite() => {
                        tracing::debug!(p, d, q, score, criterion = %self.criterion, "candidate fitted");
                        let improves = best.as_ref().map_or(true, |(_, current)| score < *current);
                        if improves {
                            best = Some((model, score));
                        }
                    }
                    Ok((_, score)) => {
                        tracing::debug!(p, d, q, score, "candidate discarded: non-finite score");
                    }
                    Err(e) => {
                        tracing::debug!(p, d, q, error = %e, "candidate failed");
                        last_error = Some(e);
                    }
                }
            }
        }

        match best {
            Some((model, score)) => Ok(ArimaSelection {
                order: model.params(),
                model,
                score,
                candidates,
            }),
            None => match last_error {
                Some(e @ TsError::InsufficientData { .. }) => Err(e),
                _ => Err(TsError::NoViableCandidate { candidates }),
            },
        }
    }
}
