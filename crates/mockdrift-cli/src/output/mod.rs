//! Output formatting module
//!
//! Renders findings through `mockdrift_core::report`, adding colour to the
//! text rendering when stdout is a terminal.

use crate::error::CliError;
use colored::Colorize;
use mockdrift_core::{DriftFinding, ReportFormat, report};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON records for automation
    Json,
    /// SARIF 2.1.0 for code-review tooling
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Sarif => write!(f, "sarif"),
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

/// Format findings for display
pub fn format_findings(findings: &[DriftFinding], format: ReportFormat) -> Result<String, CliError> {
    let rendered = report::render(findings, format)?;
    match format {
        ReportFormat::Text => Ok(colorize_text(&rendered, report::drifted_count(findings) > 0)),
        ReportFormat::Json | ReportFormat::Sarif => Ok(rendered),
    }
}

fn colorize_text(rendered: &str, any_drift: bool) -> String {
    rendered
        .lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix("✗ DRIFT") {
                format!("{}{rest}", "✗ DRIFT".red().bold())
            } else if let Some(rest) = line.strip_prefix("✓ OK") {
                format!("{}{rest}", "✓ OK".green())
            } else if line.ends_with(" drifted") && !line.starts_with(' ') {
                if any_drift {
                    line.yellow().bold().to_string()
                } else {
                    line.green().to_string()
                }
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
