//! # Configuration for relmap
//!
//! Settings that pick the relational provider and tune how mappings are
//! resolved.
//!
//! ## TOML File Configuration
//! ```toml
//! [mapping]
//! provider = "sqlserver"
//! unicode_by_default = true
//! default_string_size = 256
//! cache_mappings = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from the path in RELMAP_CONFIG, or ./relmap.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, fmt, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./relmap.toml";
const CONFIG_PATH_VAR: &str = "RELMAP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub mapping: MappingConfig,
}

/// Relational provider a mapping source resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Postgres,
    SqlServer,
    Oracle,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Postgres => "postgres",
            ProviderKind::SqlServer => "sqlserver",
            ProviderKind::Oracle => "oracle",
        };
        f.write_str(name)
    }
}

/// Mapping resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub provider: ProviderKind,
    /// Strings are unicode unless a property says otherwise
    #[serde(default = "default_true")]
    pub unicode_by_default: bool,
    /// Size for string columns that declare none
    #[serde(default)]
    pub default_string_size: Option<i32>,
    /// Memoize resolved mappings per type and facets
    #[serde(default = "default_true")]
    pub cache_mappings: bool,
}

fn default_true() -> bool {
    true
}

impl MappingConfig {
    /// Create a mapping configuration with default settings for `provider`
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            unicode_by_default: true,
            default_string_size: None,
            cache_mappings: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is not
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.mapping.default_string_size {
            if size <= 0 {
                return Err(ConfigError::Invalid(
                    "Mapping default_string_size must be greater than 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}
