//! Configuration management.
//!
//! Settings come from an optional TOML file layered with `PHARMA_PAPERS_*`
//! environment variables (nested keys use `__`, e.g.
//! `PHARMA_PAPERS_PUBMED__API_KEY`).
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! api_key = "your-ncbi-api-key"
//! email = "you@example.com"
//! tool = "pharma-papers"
//! max_results = 100
//! timeout_secs = 30
//! max_attempts = 3
//!
//! [logging]
//! level = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_MAX_RESULTS;
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PHARMA_PAPERS";

/// Default NCBI E-utilities endpoint
pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// PubMed E-utilities settings
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PubMed E-utilities settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Base URL of the E-utilities service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// NCBI API key (raises the rate limit from 3 to 10 requests per second)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Contact email sent with each request, as NCBI asks
    #[serde(default)]
    pub email: Option<String>,

    /// Tool name sent with each request
    #[serde(default = "default_tool")]
    pub tool: Option<String>,

    /// Maximum number of papers requested from a search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request before giving up on transient errors
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            email: None,
            tool: default_tool(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_EUTILS_URL.to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var("NCBI_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_tool() -> Option<String> {
    Some(env!("CARGO_PKG_NAME").to_string())
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    3
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate when neither `RUST_LOG` nor `--debug` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::new(
            &path.to_string_lossy(),
            config::FileFormat::Toml,
        ));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Find a configuration file in the default locations
///
/// Checks `<config dir>/pharma-papers/config.toml`, then `./pharma-papers.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(env!("CARGO_PKG_NAME")).join("config.toml"));
    }
    candidates.push(PathBuf::from(concat!(env!("CARGO_PKG_NAME"), ".toml")));

    candidates.into_iter().find(|p| p.is_file())
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
