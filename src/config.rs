use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "TRACKER";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LEDGER_TABLE: &str = "Ledger";
const DEFAULT_CATALOG_TABLE: &str = "Item Data";
const DEFAULT_ENUM_TABLE: &str = "Enum Data";
const DEFAULT_REQUEST_ID_PREFIX: &str = "REQ-";
const DEFAULT_PR_ID_PREFIX: &str = "PR-";
const DEFAULT_PO_ID_PREFIX: &str = "PO-";
const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_PRIORITIES: [&str; 3] = ["normal", "urgent", "most-urgent"];

/// Tracker configuration
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Profile name, also used to pick `config/{environment}.toml`
    #[serde(default = "default_environment")]
    #[validate(length(min = 1))]
    pub environment: String,

    /// Directory holding the CSV tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_ledger_table")]
    #[validate(length(min = 1))]
    pub ledger_table: String,

    #[serde(default = "default_catalog_table")]
    #[validate(length(min = 1))]
    pub catalog_table: String,

    #[serde(default = "default_enum_table")]
    #[validate(length(min = 1))]
    pub enum_table: String,

    #[serde(default = "default_request_id_prefix")]
    #[validate(length(min = 1))]
    pub request_id_prefix: String,

    #[serde(default = "default_pr_id_prefix")]
    #[validate(length(min = 1))]
    pub pr_id_prefix: String,

    #[serde(default = "default_po_id_prefix")]
    #[validate(length(min = 1))]
    pub po_id_prefix: String,

    /// Maximum catalog matches returned to a picker
    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1, max = 500))]
    pub search_limit: usize,

    /// Priority options used when the enum table has none
    #[serde(default = "default_priorities")]
    #[validate(custom = "validate_priorities")]
    pub priorities: Vec<String>,

    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            data_dir: default_data_dir(),
            ledger_table: default_ledger_table(),
            catalog_table: default_catalog_table(),
            enum_table: default_enum_table(),
            request_id_prefix: default_request_id_prefix(),
            pr_id_prefix: default_pr_id_prefix(),
            po_id_prefix: default_po_id_prefix(),
            search_limit: default_search_limit(),
            priorities: default_priorities(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl TrackerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEFAULT_ENV)
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum TrackerConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_ledger_table() -> String {
    DEFAULT_LEDGER_TABLE.to_string()
}

fn default_catalog_table() -> String {
    DEFAULT_CATALOG_TABLE.to_string()
}

fn default_enum_table() -> String {
    DEFAULT_ENUM_TABLE.to_string()
}

fn default_request_id_prefix() -> String {
    DEFAULT_REQUEST_ID_PREFIX.to_string()
}

fn default_pr_id_prefix() -> String {
    DEFAULT_PR_ID_PREFIX.to_string()
}

fn default_po_id_prefix() -> String {
    DEFAULT_PO_ID_PREFIX.to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_priorities() -> Vec<String> {
    DEFAULT_PRIORITIES.iter().map(|p| p.to_string()).collect()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_priorities(priorities: &Vec<String>) -> Result<(), ValidationError> {
    if priorities.is_empty() || priorities.iter().any(|p| p.trim().is_empty()) {
        let mut err = ValidationError::new("priorities");
        err.message = Some("At least one non-blank priority is required".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("purchase_ledger={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::new(filter_directive);

    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads tracker configuration from `./config`
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (TRACKER__*)
pub fn load_config() -> Result<TrackerConfig, TrackerConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Same layering as [`load_config`] with an explicit config directory and profile.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
) -> Result<TrackerConfig, TrackerConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let tracker_config: TrackerConfig = config.try_deserialize()?;

    tracker_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        TrackerConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(tracker_config)
}
