//! Report rendering.
//!
//! Three renderings over a slice of findings: a human-readable text summary,
//! the generic JSON records, and SARIF 2.1.0 for code-review tooling.

use crate::error::DriftResult;
use crate::finding::DriftFinding;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const TOOL_NAME: &str = "MockDrift";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const RULE_ID: &str = "mockdrift/schema-drift";
pub const SARIF_VERSION: &str = "2.1.0";
pub const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

const INFORMATION_URI: &str = "https://github.com/mockdrift/mockdrift";

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON array of finding records
    Json,
    /// SARIF 2.1.0 log
    Sarif,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Sarif => write!(f, "sarif"),
        }
    }
}

/// Render `findings` in `format`. SARIF logs are stamped with the current time.
pub fn render(findings: &[DriftFinding], format: ReportFormat) -> DriftResult<String> {
    match format {
        ReportFormat::Text => Ok(to_text(findings)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&to_records(findings))?),
        ReportFormat::Sarif => Ok(serde_json::to_string_pretty(&to_sarif(
            findings,
            Utc::now(),
        ))?),
    }
}

/// Number of drifted findings.
pub fn drifted_count(findings: &[DriftFinding]) -> usize {
    findings.iter().filter(|f| f.drifted()).count()
}

/// One line per finding, one indented line per violation, then a summary.
pub fn to_text(findings: &[DriftFinding]) -> String {
    let mut out = String::new();
    for finding in findings {
        let mark = if finding.drifted() { "✗ DRIFT" } else { "✓ OK" };
        out.push_str(&format!("{mark} {}\n", finding.name()));
        for error in finding.errors() {
            out.push_str(&format!("   → {error}\n"));
        }
    }
    out.push_str(&format!(
        "\n{}/{} drifted\n",
        drifted_count(findings),
        findings.len()
    ));
    out
}

/// The generic record of every finding.
pub fn to_records(findings: &[DriftFinding]) -> Value {
    Value::Array(findings.iter().map(DriftFinding::to_record).collect())
}

/// A SARIF log with one result per violation of every drifted finding.
///
/// `end_time` becomes the invocation's `endTimeUtc`.
pub fn to_sarif(findings: &[DriftFinding], end_time: DateTime<Utc>) -> Value {
    let results: Vec<Value> = findings
        .iter()
        .filter(|f| f.drifted())
        .flat_map(|finding| {
            finding
                .errors()
                .iter()
                .map(move |error| sarif_result(finding, error))
        })
        .collect();

    json!({
        "version": SARIF_VERSION,
        "$schema": SARIF_SCHEMA,
        "runs": [{
            "tool": {"driver": {
                "name": TOOL_NAME,
                "version": TOOL_VERSION,
                "informationUri": INFORMATION_URI,
                "rules": [{
                    "id": RULE_ID,
                    "shortDescription": {"text": "Mock drifted from API schema"},
                    "fullDescription": {"text": "A mock payload or recorded cassette interaction no longer conforms to the response schema declared by the API specification, or the recording is older than the allowed age."},
                    "helpUri": INFORMATION_URI,
                    "defaultConfiguration": {"level": "error"}
                }]
            }},
            "invocations": [{
                "executionSuccessful": true,
                "endTimeUtc": end_time.to_rfc3339_opts(SecondsFormat::Secs, true)
            }],
            "results": results
        }]
    })
}

fn sarif_result(finding: &DriftFinding, error: &str) -> Value {
    let mut result = json!({
        "ruleId": RULE_ID,
        "level": "error",
        "message": {"text": format!("{}: {error}", finding.name())},
        "locations": [{"physicalLocation": {
            "artifactLocation": {"uri": finding.path()}
        }}]
    });

    if let (Some(origin), Some(obj)) = (finding.cassette(), result.as_object_mut()) {
        let mut properties = Map::new();
        properties.insert("cassetteFile".to_string(), json!(origin.cassette_file));
        properties.insert("interactionIndex".to_string(), json!(origin.interaction_index));
        obj.insert("properties".to_string(), Value::Object(properties));
    }
    result
}
