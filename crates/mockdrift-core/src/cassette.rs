//! Drift checks for recorded HTTP cassettes (VCR-style YAML/JSON files).
//!
//! Every interaction yields exactly one finding, in file order. Per-interaction
//! problems are violations inside the finding; only a cassette that cannot be
//! read or parsed at all is an error.

use crate::detector::MockDriftDetector;
use crate::error::{DriftError, DriftResult};
use crate::finding::{CassetteOrigin, DriftFinding, KeysDiff};
use crate::loader::{self, DocumentKind};
use crate::locator::{Coordinates, DEFAULT_METHOD, DEFAULT_STATUS};
use crate::validator::{StructuralValidator, ViolationMode};
use serde_json::Value;
use std::path::Path;
use std::time::SystemTime;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// What to do with body keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraKeyPolicy {
    /// Report them in `actual_keys_diff` only.
    Informational,
    /// Also record one violation per undeclared key.
    #[default]
    Violation,
}

/// One recorded request/response pair, read leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub uri: String,
    pub method: Option<String>,
    pub status: Option<String>,
    pub body: Option<String>,
}

impl Interaction {
    fn from_value(value: &Value) -> Self {
        let request = value.get("request");
        let response = value.get("response");

        let uri = request
            .and_then(|r| r.get("uri"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let method = request
            .and_then(|r| r.get("method"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let status = response
            .and_then(|r| r.get("status"))
            .and_then(|s| s.get("code").or(Some(s)))
            .and_then(scalar_to_string);
        let body = response.and_then(|r| r.get("body")).and_then(|body| match body {
            Value::String(s) => Some(s.clone()),
            other => other.get("string").and_then(Value::as_str).map(str::to_string),
        });

        Self {
            uri,
            method,
            status,
            body,
        }
    }

    /// Path component of the URI, without scheme, host, query or fragment.
    pub fn path(&self) -> String {
        uri_path(&self.uri)
    }

    /// Lower-case method, `get` when unrecorded.
    pub fn method(&self) -> String {
        self.method
            .as_deref()
            .unwrap_or(DEFAULT_METHOD)
            .to_ascii_lowercase()
    }

    /// Recorded status, `200` when unrecorded.
    pub fn status(&self) -> String {
        self.status.clone().unwrap_or_else(|| DEFAULT_STATUS.to_string())
    }

    /// The body parsed as JSON; `None` when empty, `null` or unparsable.
    pub fn parsed_body(&self) -> Option<Value> {
        let raw = self.body.as_deref().filter(|s| !s.trim().is_empty())?;
        match serde_json::from_str(raw) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(uri = %self.uri, error = %err, "unparsable response body; skipping structural checks");
                None
            }
        }
    }
}

/// Parse the interactions of a cassette file.
pub fn read_interactions(path: &Path) -> DriftResult<Vec<Interaction>> {
    let doc = loader::load_document(path, DocumentKind::Cassette)?;
    let root = match &doc {
        Value::Object(root) => root,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(DriftError::CassetteFormat {
                path: path.to_path_buf(),
                message: "expected a mapping at the document root".to_string(),
            });
        }
    };

    Ok(root
        .get("interactions")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(Interaction::from_value).collect())
        .unwrap_or_default())
}

/// Age of `path` in fractional days at `now`. Negative for future mtimes.
pub fn file_age_days(path: &Path, now: SystemTime) -> DriftResult<f64> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| DriftError::io(path, e))?;

    let seconds = match now.duration_since(modified) {
        Ok(age) => age.as_secs_f64(),
        Err(ahead) => -ahead.duration().as_secs_f64(),
    };
    Ok(seconds / SECONDS_PER_DAY)
}

/// Checks cassettes against a spec.
#[derive(Debug, Clone)]
pub struct CassetteDriftChecker {
    detector: MockDriftDetector,
    extra_keys: ExtraKeyPolicy,
    validator: StructuralValidator,
}

impl CassetteDriftChecker {
    pub fn new(detector: MockDriftDetector) -> Self {
        Self {
            detector,
            extra_keys: ExtraKeyPolicy::default(),
            validator: StructuralValidator::new(ViolationMode::All),
        }
    }

    /// Load the spec at `spec_path`.
    pub fn load(spec_path: impl AsRef<Path>) -> DriftResult<Self> {
        Ok(Self::new(MockDriftDetector::load(spec_path)?))
    }

    pub fn with_extra_key_policy(mut self, policy: ExtraKeyPolicy) -> Self {
        self.extra_keys = policy;
        self
    }

    pub fn detector(&self) -> &MockDriftDetector {
        &self.detector
    }

    /// Check every interaction of the cassette at `path`, using the current
    /// time for staleness.
    pub fn check(&self, path: &Path, max_age_days: u64) -> DriftResult<Vec<DriftFinding>> {
        self.check_at(path, max_age_days, SystemTime::now())
    }

    /// Like [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(
        &self,
        path: &Path,
        max_age_days: u64,
        now: SystemTime,
    ) -> DriftResult<Vec<DriftFinding>> {
        let age_days = file_age_days(path, now)?;
        let interactions = read_interactions(path)?;
        let cassette_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let findings: Vec<DriftFinding> = interactions
            .iter()
            .enumerate()
            .map(|(index, interaction)| {
                self.check_interaction(&cassette_file, index, interaction, age_days, max_age_days)
            })
            .collect();

        tracing::info!(
            cassette = %cassette_file,
            interactions = findings.len(),
            drifted = findings.iter().filter(|f| f.drifted()).count(),
            age_days = %format!("{age_days:.1}"),
            "checked cassette"
        );
        Ok(findings)
    }

    fn check_interaction(
        &self,
        cassette_file: &str,
        index: usize,
        interaction: &Interaction,
        age_days: f64,
        max_age_days: u64,
    ) -> DriftFinding {
        let recorded_path = interaction.path();
        // Looked up by the recorded status rather than a fixed "200", so error
        // responses are checked against their own schemas.
        let coords = Coordinates::new(recorded_path.clone())
            .method(interaction.method())
            .status(interaction.status());
        tracing::debug!(cassette = cassette_file, index, %coords, "checking interaction");

        let mut errors = Vec::new();
        if age_days > max_age_days as f64 {
            errors.push(format!(
                "Cassette age {age_days:.0}d exceeds {max_age_days}d limit"
            ));
        }

        let located = self.detector.find_schema(&coords);
        let path = located
            .as_ref()
            .map(|found| found.template.clone())
            .unwrap_or(recorded_path);

        let mut diff = KeysDiff::default();
        if let (Some(body), Some(found)) = (interaction.parsed_body(), located.as_ref()) {
            errors.extend(
                self.validator
                    .validate(&body, &found.schema)
                    .into_iter()
                    .map(|message| format!("Body drift: {message}")),
            );
            diff = KeysDiff::compute(&body, &found.schema);
            if self.extra_keys == ExtraKeyPolicy::Violation {
                errors.extend(
                    diff.extra
                        .iter()
                        .map(|key| format!("Body drift: undeclared property '{key}'")),
                );
            }
        }

        let name = format!("cassette[{index}]:{} {path}", coords.method.to_uppercase());
        let origin = CassetteOrigin {
            cassette_file: cassette_file.to_string(),
            interaction_index: index,
            status_code: coords.status.clone(),
            expected_schema: located.map(|found| found.schema),
            actual_keys_diff: diff,
        };
        DriftFinding::from_cassette(name, path, coords.method, errors, origin)
    }
}

fn uri_path(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => uri
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
