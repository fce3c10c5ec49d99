//! Single-mock drift checks.

use crate::error::DriftResult;
use crate::finding::DriftFinding;
use crate::loader::{self, DocumentKind};
use crate::locator::{Coordinates, LocatedSchema};
use crate::spec::SpecDocument;
use crate::validator;
use serde_json::Value;
use std::path::Path;

/// Checks mock payloads against one loaded spec.
///
/// The spec is read once on construction and never reloaded; build a new
/// detector to pick up changes on disk.
#[derive(Debug, Clone)]
pub struct MockDriftDetector {
    spec: SpecDocument,
}

impl MockDriftDetector {
    /// Load the spec at `spec_path`.
    pub fn load(spec_path: impl AsRef<Path>) -> DriftResult<Self> {
        Ok(Self::new(SpecDocument::load(spec_path.as_ref())?))
    }

    pub fn new(spec: SpecDocument) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SpecDocument {
        &self.spec
    }

    /// The resolved response schema for `coords`, if the spec declares one.
    pub fn find_schema(&self, coords: &Coordinates) -> Option<LocatedSchema> {
        self.spec.find_schema(coords)
    }

    /// Check `payload` against the schema declared for `coords`.
    ///
    /// A missing schema is a drift with a single `No schema for ...` message.
    /// Otherwise at most one violation is reported.
    pub fn check_mock(&self, name: &str, payload: &Value, coords: &Coordinates) -> DriftFinding {
        let errors = match self.find_schema(coords) {
            Some(found) => validator::validate(payload, &found.schema),
            None => vec![format!("No schema for {coords}")],
        };

        if !errors.is_empty() {
            tracing::debug!(name, %coords, violations = errors.len(), "mock drifted");
        }

        DriftFinding::new(name, coords.path.clone(), coords.method.clone(), errors)
    }

    /// Like [`check_mock`](Self::check_mock), reading the payload from a
    /// YAML or JSON file.
    pub fn check_mock_file(
        &self,
        name: &str,
        payload_path: &Path,
        coords: &Coordinates,
    ) -> DriftResult<DriftFinding> {
        let payload = loader::load_document(payload_path, DocumentKind::Payload)?;
        Ok(self.check_mock(name, &payload, coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detector() -> MockDriftDetector {
        let spec = SpecDocument::from_value(&json!({
            "openapi": "3.0.0",
            "paths": {
                "/users": {"get": {"responses": {"200": {"content": {
                    "application/json": {"schema": {
                        "type": "array",
                        "items": {"$ref": "#/components/schemas/User"}
                    }}
                }}}}},
                "/users/{id}": {"get": {"responses": {"200": {"content": {
                    "application/json": {"schema": {"$ref": "#/components/schemas/User"}}
                }}}}}
            },
            "components": {"schemas": {"User": {
                "type": "object",
                "required": ["id", "email"],
                "properties": {
                    "id": {"type": "integer"},
                    "email": {"type": "string"},
                    "name": {"type": "string"}
                }
            }}}
        }))
        .unwrap();
        MockDriftDetector::new(spec)
    }

    #[test]
    fn valid_mock_has_no_drift() {
        let finding = detector().check_mock(
            "users_list",
            &json!([{"id": 1, "email": "a@b.com"}]),
            &Coordinates::new("/users"),
        );

        assert!(!finding.drifted());
        assert!(finding.errors().is_empty());
    }

    #[test]
    fn missing_required_field_drifts() {
        let finding = detector().check_mock(
            "bad",
            &json!([{"name": "Alice"}]),
            &Coordinates::new("/users"),
        );

        assert!(finding.drifted());
        assert_eq!(finding.errors().len(), 1);
        assert!(finding.errors().iter().any(|e| e.contains("id") || e.contains("email")));
    }

    #[test]
    fn wrong_type_drifts() {
        let finding = detector().check_mock(
            "type_err",
            &json!({"id": "NaN", "email": "x@y.com"}),
            &Coordinates::new("/users/{id}"),
        );

        assert!(finding.drifted());
        assert!(finding.errors()[0].contains("integer"));
    }

    #[test]
    fn unknown_path_reports_no_schema() {
        let finding = detector().check_mock(
            "ghost",
            &json!({"x": 1}),
            &Coordinates::new("/orders").method("post").status(201),
        );

        assert!(finding.drifted());
        assert_eq!(finding.errors(), ["No schema for POST /orders [201]"]);
        assert_eq!(finding.method(), "post");
    }

    #[test]
    fn record_round_trip() {
        let finding = detector().check_mock(
            "m",
            &json!({"id": 1, "email": "x@y"}),
            &Coordinates::new("/users/{id}"),
        );
        let record = finding.to_record();

        assert_eq!(record["name"], "m");
        assert_eq!(record["drifted"], false);
        assert_eq!(record["method"], "get");
        assert_eq!(record["path"], "/users/{id}");
        assert_eq!(record["errors"], json!([]));
    }

    #[test]
    fn check_mock_file_reads_yaml_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("user.yaml");
        std::fs::write(&payload, "id: 7\nemail: seven@example.com\n").unwrap();

        let finding = detector()
            .check_mock_file("user", &payload, &Coordinates::new("/users/7"))
            .unwrap();
        assert!(!finding.drifted());
    }
}
