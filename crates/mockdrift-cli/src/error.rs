use mockdrift_core::{ConfigError, DriftError};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    Drift(#[from] DriftError),
}
