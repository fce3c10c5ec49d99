//! Environment-driven sessions.
//!
//! A session is configured by two variables: `MOCKDRIFT_SPEC` names the spec
//! (without it the session is absent and drift checks should be skipped) and
//! `MOCKDRIFT_FAIL` makes the session fail when it ends with drifted mocks.

use crate::registry::MockRegistry;
use mockdrift_core::{DriftResult, MockDriftDetector};
use std::fmt;
use std::path::Path;

pub const SPEC_ENV: &str = "MOCKDRIFT_SPEC";
pub const FAIL_ENV: &str = "MOCKDRIFT_FAIL";

/// Returned by [`MockDriftSession::finish`] when failing on drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftDetected(pub String);

impl fmt::Display for DriftDetected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DriftDetected {}

/// A registry bound to the configured spec, with fail-on-drift teardown.
///
/// Dropping an unfinished session that should fail panics with the drift
/// summary, unless the thread is already panicking.
#[derive(Debug)]
pub struct MockDriftSession {
    registry: MockRegistry,
    fail_on_drift: bool,
    finished: bool,
}

impl MockDriftSession {
    /// Build a session from `MOCKDRIFT_SPEC` / `MOCKDRIFT_FAIL`.
    /// `Ok(None)` when no spec is configured.
    pub fn from_env() -> DriftResult<Option<Self>> {
        let spec = std::env::var(SPEC_ENV).ok();
        let fail = std::env::var(FAIL_ENV).ok();
        Self::from_settings(spec.as_deref(), fail.as_deref())
    }

    /// Like [`from_env`](Self::from_env) with the variable values passed in.
    pub fn from_settings(spec: Option<&str>, fail: Option<&str>) -> DriftResult<Option<Self>> {
        let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
            tracing::debug!("{SPEC_ENV} not set; mock drift checks skipped");
            return Ok(None);
        };

        let fail_on_drift = fail.is_some_and(is_truthy);
        Ok(Some(Self::new(MockDriftDetector::load(Path::new(spec))?, fail_on_drift)))
    }

    pub fn new(detector: MockDriftDetector, fail_on_drift: bool) -> Self {
        Self {
            registry: MockRegistry::new(detector),
            fail_on_drift,
            finished: false,
        }
    }

    pub fn registry(&self) -> &MockRegistry {
        &self.registry
    }

    pub fn fail_on_drift(&self) -> bool {
        self.fail_on_drift
    }

    /// End the session. Errors with the drift summary when failing on drift.
    pub fn finish(mut self) -> Result<(), DriftDetected> {
        self.finished = true;
        self.verdict()
    }

    fn verdict(&self) -> Result<(), DriftDetected> {
        if !self.fail_on_drift {
            return Ok(());
        }
        match self.registry.failure_message() {
            Some(message) => Err(DriftDetected(message)),
            None => Ok(()),
        }
    }
}

impl Drop for MockDriftSession {
    fn drop(&mut self) {
        if self.finished || std::thread::panicking() {
            return;
        }
        if let Err(drift) = self.verdict() {
            panic!("{drift}");
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
