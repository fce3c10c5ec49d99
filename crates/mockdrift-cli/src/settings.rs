//! Layer command-line flags over the loaded configuration

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use mockdrift_core::DriftConfig;

/// Load config (file, then `MOCKDRIFT_*` env) and apply flags on top.
pub fn resolve(cli: &Cli) -> Result<DriftConfig, CliError> {
    let loaded = DriftConfig::load(cli.config.as_deref())?;
    Ok(apply_flags(loaded, cli))
}

fn apply_flags(mut config: DriftConfig, cli: &Cli) -> DriftConfig {
    if let Some(spec) = &cli.spec {
        config.spec = Some(spec.clone());
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if cli.allow_extra_keys {
        config.strict_keys = false;
    }
    if cli.no_fail {
        config.fail_on_drift = false;
    }
    if let Commands::Cassette {
        max_age: Some(days),
        ..
    } = &cli.command
    {
        config.max_age_days = *days;
    }
    config
}
