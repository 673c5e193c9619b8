//! API configuration
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. optional `intake.toml` (or the file named by `INTAKE_CONFIG_FILE`)
//! 3. `INTAKE_*` environment variables, nested keys separated by `__`
//!    (e.g. `INTAKE_TRAINING__FOREST__N_TREES=50`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use domain_intake::TrainingConfig;

/// API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Location of the persisted model bundle
    pub bundle_path: PathBuf,
    /// Location of the JSON-lines claims ledger
    pub ledger_path: PathBuf,
    /// Log level
    pub log_level: String,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    pub training: TrainingConfig,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            bundle_path: PathBuf::from("models/trained_brain.bin"),
            ledger_path: PathBuf::from("data/claims_ledger.jsonl"),
            log_level: "info".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            training: TrainingConfig::default(),
        }
    }
}

impl IntakeConfig {
    /// Loads configuration from the default file and environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let file = std::env::var("INTAKE_CONFIG_FILE").unwrap_or_else(|_| "intake".to_string());
        Self::load(&file)
    }

    /// Loads configuration from `file` (optional) and environment
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&IntakeConfig::default())?)
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("INTAKE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
