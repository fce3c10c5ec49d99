//! Drift-check configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults ([`DriftConfig::default`])
//! 2. a YAML, TOML or JSON file, either given explicitly or discovered as
//!    `mockdrift.{yml,yaml,toml,json}` in the working directory
//! 3. `MOCKDRIFT_*` environment variables (`MOCKDRIFT_MAX_AGE_DAYS=45`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! File contents undergo `${VAR}` / `$VAR` substitution before parsing.

use crate::report::ReportFormat;
use config::{Config as Cfg, Environment, File, FileFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MOCKDRIFT";

/// File names probed by [`discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "mockdrift.yml",
    "mockdrift.yaml",
    "mockdrift.toml",
    "mockdrift.json",
];

/// Default cassette staleness limit.
pub const DEFAULT_MAX_AGE_DAYS: u64 = 30;

static BRACED_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("braced env var pattern")
});

static BARE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").expect("bare env var pattern")
});

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by the CLI and the test harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DriftConfig {
    /// OpenAPI / Swagger document to check against.
    pub spec: Option<PathBuf>,
    /// Cassettes older than this many days are reported as stale.
    pub max_age_days: u64,
    /// Report rendering.
    pub format: ReportFormat,
    /// Treat undeclared body keys in cassettes as violations. Set to `false`
    /// to only report them in the key diff.
    pub strict_keys: bool,
    /// Exit non-zero when any finding drifted.
    pub fail_on_drift: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            spec: None,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            format: ReportFormat::Text,
            strict_keys: true,
            fail_on_drift: true,
        }
    }
}

impl DriftConfig {
    /// Load configuration from `path`, or from a discovered file in the
    /// current directory when `path` is `None`, then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let discovered;
        let path = match path {
            Some(p) => Some(p),
            None => {
                discovered = std::env::current_dir().ok().and_then(|dir| discover(&dir));
                discovered.as_deref()
            }
        };

        let mut builder = Cfg::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading mockdrift config");
            let format = detect_format(path)?;
            let content = std::fs::read_to_string(path)?;
            let substituted = substitute_env_vars(&content);
            builder = builder.add_source(File::from_str(&substituted, format));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The spec path, or an error naming how to provide one.
    pub fn require_spec(&self) -> ConfigResult<&Path> {
        self.spec.as_deref().ok_or_else(|| {
            ConfigError::Invalid(
                "no spec configured; pass --spec, set MOCKDRIFT_SPEC or add `spec:` to mockdrift.yml"
                    .to_string(),
            )
        })
    }
}

/// Find the first `mockdrift.*` config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Detect configuration format from file extension
pub fn detect_format(path: &Path) -> ConfigResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Substitute `${VAR}` and `$VAR` references. Unset variables are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    let braced = BRACED_VAR.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    BARE_VAR
        .replace_all(&braced, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
