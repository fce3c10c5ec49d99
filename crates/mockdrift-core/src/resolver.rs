//! Schema reference resolution.
//!
//! A spec keeps its reusable schemas in one definition table: `definitions`
//! for Swagger 2.0 documents or `components.schemas` for OpenAPI 3.x. The
//! table is picked once when the spec is loaded and never changes afterwards.
//!
//! Resolution inlines `$ref` targets through `properties` and `items`. A
//! reference whose target is not in the table resolves to the empty schema,
//! which accepts any instance; this usually means the reference points at a
//! shared or external document that is out of scope for the check.

use serde_json::{Map, Value};

const REF_KEY: &str = "$ref";

/// Where a spec keeps its definition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Swagger 2.0: `#/definitions/<name>`.
    Swagger2,
    /// OpenAPI 3.x: `#/components/schemas/<name>`.
    OpenApi3,
}

/// Outcome of looking up a single `$ref`.
#[derive(Debug, Clone, PartialEq)]
pub enum RefResolution {
    /// The target exists; carries the fully resolved target.
    Resolved(Value),
    /// No definition with this name; resolves to the empty schema.
    Unknown(String),
    /// The reference leads back to a definition already being resolved.
    Cyclic(String),
}

impl RefResolution {
    /// The schema this outcome stands for.
    pub fn into_schema(self) -> Value {
        match self {
            Self::Resolved(schema) => schema,
            Self::Unknown(_) | Self::Cyclic(_) => Value::Object(Map::new()),
        }
    }
}

/// The definition table chosen at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionTable {
    dialect: SchemaDialect,
    schemas: Map<String, Value>,
}

impl DefinitionTable {
    /// Pick the table from a spec root. `definitions` wins when present, even
    /// if empty; otherwise `components.schemas` is used.
    pub fn from_root(root: &Map<String, Value>) -> Self {
        if let Some(defs) = root.get("definitions") {
            return Self {
                dialect: SchemaDialect::Swagger2,
                schemas: defs.as_object().cloned().unwrap_or_default(),
            };
        }

        let schemas = root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            dialect: SchemaDialect::OpenApi3,
            schemas,
        }
    }

    pub fn dialect(&self) -> SchemaDialect {
        self.dialect
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Resolve one reference string such as `#/components/schemas/User`.
    /// Only the last path segment is significant.
    pub fn resolve_ref(&self, reference: &str) -> RefResolution {
        self.resolve_ref_inner(reference, &mut Vec::new())
    }

    /// Return `schema` with every reachable `$ref` inlined.
    pub fn resolve(&self, schema: &Value) -> Value {
        self.resolve_inner(schema, &mut Vec::new())
    }

    fn resolve_ref_inner(&self, reference: &str, stack: &mut Vec<String>) -> RefResolution {
        let name = ref_name(reference);

        if stack.iter().any(|seen| seen == name) {
            tracing::warn!(reference, "cyclic schema reference; treating as unconstrained");
            return RefResolution::Cyclic(name.to_string());
        }

        let Some(target) = self.schemas.get(name) else {
            tracing::warn!(reference, "unknown schema reference; treating as unconstrained");
            return RefResolution::Unknown(name.to_string());
        };

        tracing::debug!(reference, "resolving schema reference");
        stack.push(name.to_string());
        let resolved = self.resolve_inner(target, stack);
        stack.pop();
        RefResolution::Resolved(resolved)
    }

    fn resolve_inner(&self, schema: &Value, stack: &mut Vec<String>) -> Value {
        let Some(map) = schema.as_object() else {
            return schema.clone();
        };

        if let Some(reference) = map.get(REF_KEY) {
            let reference = reference.as_str().unwrap_or_default();
            return self.resolve_ref_inner(reference, stack).into_schema();
        }

        let mut out = map.clone();
        if let Some(Value::Object(props)) = map.get("properties") {
            let resolved = props
                .iter()
                .map(|(key, value)| (key.clone(), self.resolve_inner(value, stack)))
                .collect();
            out.insert("properties".to_string(), Value::Object(resolved));
        }
        if let Some(items) = map.get("items") {
            out.insert("items".to_string(), self.resolve_inner(items, stack));
        }
        Value::Object(out)
    }
}

fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
