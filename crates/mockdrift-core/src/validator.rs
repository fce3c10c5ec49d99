//! Structural validation of payloads against resolved schemas.
//!
//! Backed by the `jsonschema` crate. Messages are the primitive's own
//! descriptions, e.g. `"id" is a required property`.

use jsonschema::JSONSchema;
use serde_json::Value;

/// How many violations to collect from one validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationMode {
    /// Stop at the first violation.
    #[default]
    First,
    /// Collect every violation the primitive reports.
    All,
}

/// Validates payloads and flattens the outcome to violation messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator {
    mode: ViolationMode,
}

impl StructuralValidator {
    pub fn new(mode: ViolationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViolationMode {
        self.mode
    }

    /// Violation messages for `payload` against `schema`; empty when it conforms.
    pub fn validate(&self, payload: &Value, schema: &Value) -> Vec<String> {
        let compiled = match JSONSchema::compile(schema) {
            Ok(compiled) => compiled,
            Err(err) => return vec![format!("Invalid schema: {err}")],
        };

        let Err(errors) = compiled.validate(payload) else {
            return Vec::new();
        };

        let messages = errors.map(|err| err.to_string());
        match self.mode {
            ViolationMode::First => messages.take(1).collect(),
            ViolationMode::All => messages.collect(),
        }
    }
}

/// At most one violation message.
pub fn validate(payload: &Value, schema: &Value) -> Vec<String> {
    StructuralValidator::new(ViolationMode::First).validate(payload, schema)
}

/// Every violation message, in the primitive's order.
pub fn validate_all(payload: &Value, schema: &Value) -> Vec<String> {
    StructuralValidator::new(ViolationMode::All).validate(payload, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "email"],
            "properties": {
                "id": {"type": "integer"},
                "email": {"type": "string"}
            }
        })
    }

    #[test]
    fn conforming_payload_has_no_violations() {
        let payload = json!({"id": 1, "email": "a@b.com"});
        assert!(validate(&payload, &user_schema()).is_empty());
        assert!(validate_all(&payload, &user_schema()).is_empty());
    }

    #[test]
    fn first_mode_reports_one_message() {
        let payload = json!({"id": "NaN", "email": 7});

        let first = validate(&payload, &user_schema());
        assert_eq!(first.len(), 1);

        let all = validate_all(&payload, &user_schema());
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|m| m.contains("integer")));
        assert!(all.iter().any(|m| m.contains("string")));
    }

    #[test]
    fn missing_property_is_named() {
        let messages = validate(&json!({"email": "a@b.com"}), &user_schema());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("id"));
    }

    #[test]
    fn empty_schema_accepts_anything() {
        assert!(validate_all(&json!([1, "two", null]), &json!({})).is_empty());
    }

    #[test]
    fn uncompilable_schema_is_a_violation() {
        let messages = validate(&json!(1), &json!({"type": 12}));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid schema"));
    }

    #[test]
    fn does_not_mutate_inputs() {
        let payload = json!({"id": 1});
        let schema = user_schema();
        let _ = validate_all(&payload, &schema);

        assert_eq!(payload, json!({"id": 1}));
        assert_eq!(schema, user_schema());
    }
}
