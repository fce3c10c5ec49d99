use mockdrift_core::{Coordinates, DriftFinding, MockDriftDetector};
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

/// Collects mock registrations and checks each one against the spec.
///
/// Registration only needs `&self`, so one registry can be shared by the
/// helpers of a test.
#[derive(Debug)]
pub struct MockRegistry {
    detector: MockDriftDetector,
    findings: Mutex<Vec<DriftFinding>>,
}

impl MockRegistry {
    pub fn new(detector: MockDriftDetector) -> Self {
        Self {
            detector,
            findings: Mutex::new(Vec::new()),
        }
    }

    /// Check `payload` as the `GET path` 200 response and record the finding.
    /// Returns the finding so callers can assert inline.
    pub fn register(&self, name: &str, payload: &Value, path: &str) -> DriftFinding {
        self.register_at(name, payload, &Coordinates::new(path))
    }

    /// Check `payload` at explicit coordinates and record the finding.
    pub fn register_at(&self, name: &str, payload: &Value, coords: &Coordinates) -> DriftFinding {
        let finding = self.detector.check_mock(name, payload, coords);
        self.lock().push(finding.clone());
        finding
    }

    /// Every recorded finding, in registration order.
    pub fn findings(&self) -> Vec<DriftFinding> {
        self.lock().clone()
    }

    /// Recorded findings that drifted.
    pub fn drifted(&self) -> Vec<DriftFinding> {
        self.lock().iter().filter(|f| f.drifted()).cloned().collect()
    }

    /// Summary of drifted mocks, or `None` when nothing drifted.
    pub fn failure_message(&self) -> Option<String> {
        let drifted = self.drifted();
        if drifted.is_empty() {
            return None;
        }

        let lines: Vec<String> = drifted
            .iter()
            .map(|f| format!("  {}: {}", f.name(), f.errors().join("; ")))
            .collect();
        Some(format!(
            "MockDrift detected {} drifted mock(s):\n{}",
            drifted.len(),
            lines.join("\n")
        ))
    }

    /// Panic with [`failure_message`](Self::failure_message) if anything drifted.
    pub fn assert_no_drift(&self) {
        if let Some(message) = self.failure_message() {
            panic!("{message}");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DriftFinding>> {
        self.findings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockdrift_core::SpecDocument;
    use serde_json::json;

    fn registry() -> MockRegistry {
        let spec = SpecDocument::from_value(&json!({
            "paths": {"/users/{id}": {"get": {"responses": {"200": {"content": {
                "application/json": {"schema": {"$ref": "#/components/schemas/User"}}
            }}}}}},
            "components": {"schemas": {"User": {
                "type": "object",
                "required": ["id", "email"],
                "properties": {"id": {"type": "integer"}, "email": {"type": "string"}}
            }}}
        }))
        .unwrap();
        MockRegistry::new(MockDriftDetector::new(spec))
    }

    #[test]
    fn register_records_and_returns_finding() {
        let registry = registry();

        let finding = registry.register("ok", &json!({"id": 1, "email": "a@b"}), "/users/{id}");
        assert!(!finding.drifted());
        assert_eq!(registry.findings(), vec![finding]);
        assert!(registry.drifted().is_empty());
        assert_eq!(registry.failure_message(), None);
        registry.assert_no_drift();
    }

    #[test]
    fn failure_message_lists_drifted_mocks() {
        let registry = registry();
        registry.register("ok", &json!({"id": 1, "email": "a@b"}), "/users/{id}");
        registry.register("bad", &json!({"id": 1}), "/users/{id}");
        registry.register_at(
            "ghost",
            &json!({}),
            &Coordinates::new("/users/{id}").method("delete"),
        );

        assert_eq!(registry.findings().len(), 3);
        assert_eq!(registry.drifted().len(), 2);

        let message = registry.failure_message().unwrap();
        assert!(message.starts_with("MockDrift detected 2 drifted mock(s):\n  bad: "));
        assert!(message.contains("email"));
        assert!(message.ends_with("  ghost: No schema for DELETE /users/{id} [200]"));
    }

    #[test]
    #[should_panic(expected = "MockDrift detected 1 drifted mock(s)")]
    fn assert_no_drift_panics() {
        let registry = registry();
        registry.register("bad", &json!({}), "/users/{id}");
        registry.assert_no_drift();
    }

    #[test]
    #[should_panic(expected = "bad")]
    fn macro_panics_on_drift() {
        let registry = registry();
        registry.register("bad", &json!({"id": "x", "email": "a@b"}), "/users/{id}");
        crate::assert_no_drift!(registry);
    }
}
