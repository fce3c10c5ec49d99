//! Typed view of an OpenAPI / Swagger document.
//!
//! Only the parts drift detection reads are modelled: path templates,
//! operations keyed by lower-case method, responses keyed by status, and the
//! schema attached to each response. Anything missing or of the wrong shape is
//! an explicit `None` or an empty collection.

use crate::error::{DriftError, DriftResult};
use crate::loader::{self, DocumentKind};
use crate::resolver::DefinitionTable;
use serde_json::{Map, Value};
use std::path::Path;

/// A loaded specification. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    paths: Vec<PathItem>,
    definitions: DefinitionTable,
}

/// One entry under `paths`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub template: String,
    pub operations: Vec<Operation>,
}

/// One HTTP operation of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Lower-case method name.
    pub method: String,
    pub responses: Vec<ResponseSpec>,
}

/// One response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub status: String,
    /// OpenAPI 3.x `content` entries in declaration order: media type and its
    /// schema, if it declares one.
    pub content: Vec<(String, Option<Value>)>,
    /// Swagger 2.0 schema attached directly to the response.
    pub schema: Option<Value>,
}

impl ResponseSpec {
    /// The raw (unresolved) schema: the first media type that declares one,
    /// falling back to a directly attached `schema`.
    pub fn raw_schema(&self) -> Option<&Value> {
        self.content
            .iter()
            .find_map(|(_, schema)| schema.as_ref())
            .or(self.schema.as_ref())
    }
}

impl Operation {
    pub fn response(&self, status: &str) -> Option<&ResponseSpec> {
        self.responses.iter().find(|r| r.status == status)
    }
}

impl PathItem {
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        let method = method.to_ascii_lowercase();
        self.operations.iter().find(|op| op.method == method)
    }
}

impl SpecDocument {
    /// Load and parse a spec file.
    pub fn load(path: &Path) -> DriftResult<Self> {
        let root = loader::load_document(path, DocumentKind::Spec)?;
        let spec = Self::from_value(&root).map_err(|message| DriftError::SpecFormat {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::debug!(
            path = %path.display(),
            dialect = ?spec.definitions.dialect(),
            definitions = spec.definitions.len(),
            paths = spec.paths.len(),
            "loaded spec"
        );
        Ok(spec)
    }

    /// Build from an already parsed document. The root must be a mapping.
    pub fn from_value(root: &Value) -> Result<Self, String> {
        let root = root
            .as_object()
            .ok_or_else(|| format!("expected a mapping at the document root, found {}", kind_of(root)))?;

        let paths = root
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| {
                paths
                    .iter()
                    .map(|(template, item)| parse_path_item(template, item))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            paths,
            definitions: DefinitionTable::from_root(root),
        })
    }

    pub fn paths(&self) -> &[PathItem] {
        &self.paths
    }

    pub fn path_item(&self, template: &str) -> Option<&PathItem> {
        self.paths.iter().find(|item| item.template == template)
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    /// Inline every reachable `$ref` in `schema`.
    pub fn resolve_schema(&self, schema: &Value) -> Value {
        self.definitions.resolve(schema)
    }
}

fn parse_path_item(template: &str, item: &Value) -> PathItem {
    let operations = item
        .as_object()
        .map(|ops| {
            ops.iter()
                .filter_map(|(method, op)| op.as_object().map(|op| parse_operation(method, op)))
                .collect()
        })
        .unwrap_or_default();

    PathItem {
        template: template.to_string(),
        operations,
    }
}

fn parse_operation(method: &str, op: &Map<String, Value>) -> Operation {
    let responses = op
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .filter_map(|(status, resp)| parse_response(status, resp))
                .collect()
        })
        .unwrap_or_default();

    Operation {
        method: method.to_ascii_lowercase(),
        responses,
    }
}

fn parse_response(status: &str, resp: &Value) -> Option<ResponseSpec> {
    let resp = resp.as_object()?;

    let content = resp
        .get("content")
        .and_then(Value::as_object)
        .map(|content| {
            content
                .iter()
                .map(|(media, entry)| (media.clone(), entry.get("schema").cloned()))
                .collect()
        })
        .unwrap_or_default();

    Some(ResponseSpec {
        status: status.to_string(),
        content,
        schema: resp.get("schema").cloned(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
