//! Registry error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading observations or reading and writing registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File could not be opened, read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed registry document
    #[error("Registry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required CSV column is absent from the header row
    #[error("Column '{0}' not found in input header")]
    MissingColumn(String),

    /// Registry written by an incompatible version
    #[error("Unsupported registry format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    /// Training finished without a single fitted entity
    #[error("No entity could be trained ({skipped} skipped)")]
    NothingTrained { skipped: usize },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let error = RegistryError::MissingColumn("country_name".to_string());
        assert_eq!(error.to_string(), "Column 'country_name' not found in input header");
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = RegistryError::UnsupportedFormat {
            found: 7,
            expected: 1,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported registry format version 7 (expected 1)"
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let error = RegistryError::io(
            "models.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(error.to_string().contains("models.json"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_nothing_trained_display() {
        let error = RegistryError::NothingTrained { skipped: 4 };
        assert_eq!(error.to_string(), "No entity could be trained (4 skipped)");
    }
}
