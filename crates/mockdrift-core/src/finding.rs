//! Drift findings: the outcome of one mock or interaction check.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Top-level key differences between a body and its schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct KeysDiff {
    /// Required properties absent from the body, in declared order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Body keys the schema does not declare, in body order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl KeysDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    /// Compare the top-level keys of `body` with `schema`.
    ///
    /// `missing` is only computed when the schema declares `required`, `extra`
    /// only when it declares `properties`. Non-object bodies have no keys.
    pub fn compute(body: &Value, schema: &Value) -> Self {
        let Some(body) = body.as_object() else {
            return Self::default();
        };

        let missing = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|required| {
                required
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|name| !body.contains_key(*name))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let extra = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|declared| {
                body.keys()
                    .filter(|key| !declared.contains_key(*key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self { missing, extra }
    }
}

/// Where a cassette finding came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CassetteOrigin {
    /// Base name of the cassette file.
    pub cassette_file: String,
    /// Zero-based position of the interaction in the cassette.
    pub interaction_index: usize,
    pub status_code: String,
    /// The resolved schema the body was checked against, if one was found.
    pub expected_schema: Option<Value>,
    pub actual_keys_diff: KeysDiff,
}

/// Result of checking one mock or cassette interaction against the spec.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftFinding {
    name: String,
    path: String,
    method: String,
    errors: Vec<String>,
    origin: Option<CassetteOrigin>,
}

impl DriftFinding {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method: method.into(),
            errors,
            origin: None,
        }
    }

    pub fn from_cassette(
        name: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
        errors: Vec<String>,
        origin: CassetteOrigin,
    ) -> Self {
        Self {
            origin: Some(origin),
            ..Self::new(name, path, method, errors)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Cassette locator fields; `None` for single-mock findings.
    pub fn cassette(&self) -> Option<&CassetteOrigin> {
        self.origin.as_ref()
    }

    /// True iff any violation was recorded.
    pub fn drifted(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The generic structured record for this finding.
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for DriftFinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.origin.is_some() { 10 } else { 5 };
        let mut map = serializer.serialize_map(Some(fields))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("method", &self.method)?;
        map.serialize_entry("drifted", &self.drifted())?;
        map.serialize_entry("errors", &self.errors)?;
        if let Some(origin) = &self.origin {
            map.serialize_entry("cassette_file", &origin.cassette_file)?;
            map.serialize_entry("interaction_index", &origin.interaction_index)?;
            map.serialize_entry("status_code", &origin.status_code)?;
            map.serialize_entry("expected_schema", &origin.expected_schema)?;
            map.serialize_entry("actual_keys_diff", &origin.actual_keys_diff)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drifted_follows_errors() {
        assert!(!DriftFinding::new("m", "/users", "get", vec![]).drifted());
        assert!(DriftFinding::new("m", "/users", "get", vec!["boom".into()]).drifted());
    }

    #[test]
    fn mock_record_has_core_fields_only() {
        let finding = DriftFinding::new("m", "/users/{id}", "get", vec![]);

        assert_eq!(
            finding.to_record(),
            json!({
                "name": "m",
                "path": "/users/{id}",
                "method": "get",
                "drifted": false,
                "errors": []
            })
        );
    }

    #[test]
    fn cassette_record_adds_locator_fields() {
        let finding = DriftFinding::from_cassette(
            "cassette[0]:GET /users/{id}",
            "/users/{id}",
            "get",
            vec!["Body drift: \"id\" is a required property".into()],
            CassetteOrigin {
                cassette_file: "users.yaml".into(),
                interaction_index: 0,
                status_code: "200".into(),
                expected_schema: Some(json!({"required": ["id"]})),
                actual_keys_diff: KeysDiff {
                    missing: vec!["id".into()],
                    extra: vec![],
                },
            },
        );

        let record = finding.to_record();
        assert_eq!(record["drifted"], true);
        assert_eq!(record["cassette_file"], "users.yaml");
        assert_eq!(record["interaction_index"], 0);
        assert_eq!(record["status_code"], "200");
        assert_eq!(record["expected_schema"], json!({"required": ["id"]}));
        assert_eq!(record["actual_keys_diff"], json!({"missing": ["id"]}));
    }

    #[test]
    fn keys_diff_missing_in_declared_order() {
        let schema = json!({
            "required": ["id", "email"],
            "properties": {"id": {}, "email": {}, "name": {}}
        });

        let diff = KeysDiff::compute(&json!({"name": "Alice"}), &schema);
        assert_eq!(diff.missing, vec!["id", "email"]);
        assert!(diff.extra.is_empty());
        assert_eq!(serde_json::to_value(&diff).unwrap(), json!({"missing": ["id", "email"]}));
    }

    #[test]
    fn keys_diff_extra_in_body_order() {
        let schema = json!({
            "required": ["id", "email"],
            "properties": {"id": {}, "email": {}, "name": {}}
        });
        let body = json!({"id": 1, "email": "a@b", "role": "admin", "avatar_url": "x"});

        let diff = KeysDiff::compute(&body, &schema);
        assert_eq!(serde_json::to_value(&diff).unwrap(), json!({"extra": ["role", "avatar_url"]}));
    }

    #[test]
    fn keys_diff_skips_undeclared_sections_and_non_objects() {
        assert!(KeysDiff::compute(&json!({"a": 1}), &json!({"type": "object"})).is_empty());
        assert!(KeysDiff::compute(&json!([{"a": 1}]), &json!({"required": ["id"]})).is_empty());
    }
}
