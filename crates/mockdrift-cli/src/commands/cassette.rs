//! `mockdrift cassette` command implementation

use crate::error::CliError;
use mockdrift_core::{CassetteDriftChecker, DriftConfig, DriftFinding, ExtraKeyPolicy};
use std::path::PathBuf;

/// Check each cassette in turn; findings are concatenated in argument order.
pub fn run(files: &[PathBuf], config: &DriftConfig) -> Result<Vec<DriftFinding>, CliError> {
    let spec = config.require_spec()?;
    let policy = if config.strict_keys {
        ExtraKeyPolicy::Violation
    } else {
        ExtraKeyPolicy::Informational
    };
    let checker = CassetteDriftChecker::load(spec)?.with_extra_key_policy(policy);

    let mut findings = Vec::new();
    for file in files {
        tracing::debug!(cassette = %file.display(), max_age_days = config.max_age_days, "checking cassette");
        findings.extend(checker.check(file, config.max_age_days)?);
    }
    Ok(findings)
}
