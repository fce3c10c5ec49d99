//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MockDrift - detect mocks and cassettes that drifted from an OpenAPI spec
#[derive(Parser)]
#[command(name = "mockdrift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// OpenAPI 3.x or Swagger 2.0 spec (YAML or JSON)
    #[arg(short, long, global = true)]
    pub spec: Option<PathBuf>,

    /// Output format (text, json, sarif)
    #[arg(short = 'f', long, global = true)]
    pub format: Option<OutputFormat>,

    /// Configuration file path (defaults to ./mockdrift.{yml,yaml,toml,json})
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Only list undeclared cassette body keys in the key diff instead of
    /// reporting them as violations
    #[arg(long, global = true)]
    pub allow_extra_keys: bool,

    /// Exit successfully even when drift is found
    #[arg(long, global = true)]
    pub no_fail: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check recorded cassettes against the spec
    Cassette {
        /// Cassette files (VCR YAML/JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Maximum cassette age in days
        #[arg(long)]
        max_age: Option<u64>,
    },

    /// Check a mock payload file against the spec
    Mock {
        /// Payload file (JSON or YAML)
        payload: PathBuf,

        /// Request path, e.g. /users/{id}
        #[arg(short, long)]
        path: String,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: String,

        /// Response status code
        #[arg(long, default_value = "200")]
        status: String,

        /// Name reported for this mock (defaults to the payload file name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cassette_command() {
        let cli = Cli::try_parse_from([
            "mockdrift",
            "--spec",
            "openapi.yaml",
            "cassette",
            "a.yaml",
            "b.yaml",
            "--max-age",
            "7",
            "--format",
            "sarif",
        ])
        .unwrap();

        assert_eq!(cli.spec, Some(PathBuf::from("openapi.yaml")));
        assert_eq!(cli.format, Some(OutputFormat::Sarif));
        match cli.command {
            Commands::Cassette { files, max_age } => {
                assert_eq!(files.len(), 2);
                assert_eq!(max_age, Some(7));
            }
            _ => panic!("expected cassette command"),
        }
    }

    #[test]
    fn mock_defaults_to_get_200() {
        let cli = Cli::try_parse_from(["mockdrift", "mock", "user.json", "--path", "/users/{id}"])
            .unwrap();

        match cli.command {
            Commands::Mock {
                method,
                status,
                name,
                ..
            } => {
                assert_eq!(method, "get");
                assert_eq!(status, "200");
                assert!(name.is_none());
            }
            _ => panic!("expected mock command"),
        }
    }

    #[test]
    fn cassette_requires_files() {
        assert!(Cli::try_parse_from(["mockdrift", "cassette"]).is_err());
    }
}
