//! MockDrift CLI - check mocks and recorded cassettes against an OpenAPI spec

mod cli;
mod commands;
mod error;
mod output;
mod settings;

use clap::Parser;
use cli::{Cli, Commands};
use mockdrift_core::{Coordinates, report};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = settings::resolve(&cli)?;

    let findings = match &cli.command {
        Commands::Cassette { files, .. } => commands::cassette::run(files, &config)?,
        Commands::Mock {
            payload,
            path,
            method,
            status,
            name,
        } => {
            let coords = Coordinates::new(path.clone())
                .method(method.clone())
                .status(status);
            commands::mock::run(payload, &coords, name.as_deref(), &config)?
        }
    };

    println!("{}", output::format_findings(&findings, config.format)?);

    let drifted = report::drifted_count(&findings);
    if config.fail_on_drift && drifted > 0 {
        anyhow::bail!("{}/{} drifted", drifted, findings.len());
    }

    Ok(())
}
