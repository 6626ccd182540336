//! Time series error types

use thiserror::Error;

/// Result type alias for algorithm operations
pub type Result<T> = std::result::Result<T, TsError>;

/// Errors raised while fitting or forecasting a series
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TsError {
    /// The series is too short for the requested model
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A model parameter is outside its valid range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// `predict` was called before a successful `fit`
    #[error("Model must be fitted before prediction")]
    NotFitted,

    /// None of the candidate models in a search could be fitted and scored
    #[error("No candidate model could be fitted ({candidates} tried)")]
    NoViableCandidate { candidates: usize },

    /// A computation produced a non-finite or degenerate result
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// The input series contains unusable values
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Reject series containing NaN or infinite values.
pub fn ensure_finite(data: &[f64]) -> Result<()> {
    if data.iter().any(|x| !x.is_finite()) {
        return Err(TsError::InvalidData(
            "Data contains NaN or infinite values".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let error = TsError::InsufficientData {
            required: 13,
            actual: 1,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data: need at least 13 points, got 1"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = TsError::InvalidParameter {
            name: "phi".to_string(),
            reason: "must be in (0, 1]".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid parameter 'phi': must be in (0, 1]");
    }

    #[test]
    fn test_no_viable_candidate_display() {
        let error = TsError::NoViableCandidate { candidates: 16 };
        assert_eq!(
            error.to_string(),
            "No candidate model could be fitted (16 tried)"
        );
    }

    #[test]
    fn test_error_is_clone_and_eq() {
        let error = TsError::NumericalError("residual variance is not finite".to_string());
        assert_eq!(error.clone(), error);
        assert_ne!(error, TsError::NotFitted);
    }

    #[test]
    fn test_error_implements_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&TsError::NotFitted);
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, 2.0, 3.0]).is_ok());
        assert!(ensure_finite(&[]).is_ok());

        match ensure_finite(&[1.0, f64::NAN]) {
            Err(TsError::InvalidData(msg)) => assert!(msg.contains("NaN")),
            other => panic!("Expected InvalidData, got {:?}", other),
        }
        assert!(ensure_finite(&[f64::INFINITY]).is_err());
    }
}
