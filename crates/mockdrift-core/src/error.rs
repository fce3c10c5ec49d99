//! Crate-level error types for `mockdrift-core`.
//!
//! Only document-level failures surface as a [`DriftError`]: a spec or
//! cassette that cannot be read or parsed at all. Everything that goes wrong
//! for an individual mock or interaction is recorded as a violation inside a
//! [`DriftFinding`](crate::finding::DriftFinding) instead.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type for `mockdrift-core`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriftError {
    /// A spec, cassette or payload file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The specification document is not a structured YAML/JSON mapping.
    #[error("Spec format error in {}: {message}", path.display())]
    SpecFormat { path: PathBuf, message: String },

    /// The cassette document is not a structured YAML/JSON mapping.
    #[error("Cassette format error in {}: {message}", path.display())]
    CassetteFormat { path: PathBuf, message: String },

    /// A payload file handed to a single-mock check could not be parsed.
    #[error("Payload format error in {}: {message}", path.display())]
    PayloadFormat { path: PathBuf, message: String },

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A JSON (de)serialization error while rendering a report.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DriftError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result alias for `mockdrift-core`.
pub type DriftResult<T> = Result<T, DriftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_file() {
        let err = DriftError::io(
            "specs/openapi.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file missing"),
        );

        let text = err.to_string();
        assert!(text.contains("specs/openapi.yaml"));
        assert!(text.contains("file missing"));
    }

    #[test]
    fn config_error_converts_via_from() {
        let err: DriftError = ConfigError::UnsupportedFormat("ini".to_string()).into();

        assert!(matches!(err, DriftError::Config(_)));
        assert!(err.to_string().contains("ini"));
    }

    #[test]
    fn spec_format_error_carries_message() {
        let err = DriftError::SpecFormat {
            path: PathBuf::from("broken.yaml"),
            message: "expected a mapping".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Spec format error in broken.yaml: expected a mapping"
        );
    }
}
