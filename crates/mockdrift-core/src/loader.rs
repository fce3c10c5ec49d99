//! Document loading.
//!
//! Specs, cassettes and payload files are all read through [`load_document`],
//! which accepts any YAML document (and therefore any JSON document) and
//! produces a [`serde_json::Value`] tree. Mapping keys are normalised to
//! strings so that unquoted YAML status codes such as `200:` are addressable
//! as `"200"`.

use crate::error::{DriftError, DriftResult};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use std::path::Path;

/// What a document is loaded as; selects the error reported on parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Spec,
    Cassette,
    Payload,
}

/// Read `path` and parse it as a YAML/JSON document.
pub fn load_document(path: &Path, kind: DocumentKind) -> DriftResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| DriftError::io(path, e))?;
    parse_document(&content).map_err(|e| format_error(path, kind, e.to_string()))
}

/// Parse YAML/JSON text into a JSON value tree.
pub fn parse_document(content: &str) -> Result<Value, serde_yaml::Error> {
    let yaml: YamlValue = serde_yaml::from_str(content)?;
    Ok(yaml_to_json(yaml))
}

pub(crate) fn format_error(path: &Path, kind: DocumentKind, message: String) -> DriftError {
    let path = path.to_path_buf();
    match kind {
        DocumentKind::Spec => DriftError::SpecFormat { path, message },
        DocumentKind::Cassette => DriftError::CassetteFormat { path, message },
        DocumentKind::Payload => DriftError::PayloadFormat { path, message },
    }
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => yaml_number(&n),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                out.insert(key_to_string(key), yaml_to_json(value));
            }
            Value::Object(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unquoted_status_keys_become_strings() {
        let doc = parse_document("responses:\n  200:\n    description: ok\n").unwrap();

        assert_eq!(doc["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn json_is_accepted_as_yaml() {
        let doc = parse_document(r#"{"paths": {"/users": {}}, "n": 1.5}"#).unwrap();

        assert_eq!(doc, json!({"paths": {"/users": {}}, "n": 1.5}));
    }

    #[test]
    fn malformed_document_maps_to_kind_specific_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "paths: [unterminated").unwrap();

        let err = load_document(&path, DocumentKind::Cassette).unwrap_err();
        assert!(matches!(err, DriftError::CassetteFormat { .. }));

        let err = load_document(&path, DocumentKind::Spec).unwrap_err();
        assert!(matches!(err, DriftError::SpecFormat { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_document(Path::new("/definitely/not/here.yaml"), DocumentKind::Spec)
            .unwrap_err();

        assert!(matches!(err, DriftError::Io { .. }));
    }
}
