//! # Desk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUOTE_DB_PATH=/data/quotes.db                                      │
//! │     QUOTE_EXPORT_DIR=/home/me/quotations                               │
//! │     QUOTE_CURRENCY_SYMBOL=INR                                          │
//! │     QUOTE_COMPANY_NAME=Mabric                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/quote-desk/quote-desk.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Mabric letterhead, "Rs.", current directory for exports            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/data/quotes.db"
//!
//! [export]
//! output_dir = "./quotations"
//! currency_symbol = "Rs."
//!
//! [company]
//! name = "Mabric"
//! trade_name = "Mabric Interio"
//! address_lines = ["Sy. No. 245/2, 1st Cross Rd,"]
//! contact_lines = ["www.mabric.in"]
//! footer_note = "For any queries, contact us at contact@mabric.in"
//! signatory_title = "Director"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use quote_core::view::DEFAULT_CURRENCY_SYMBOL;
use quote_core::CompanyProfile;

const CONFIG_FILE: &str = "quote-desk.toml";
const DATABASE_FILE: &str = "quotes.db";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not write config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No config or data directory available on this platform")]
    NoProjectDirs,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_dir: default_output_dir(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub export: ExportSettings,

    /// Letterhead printed on every export.
    #[serde(default)]
    pub company: CompanyProfile,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoProjectDirs)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.export.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export.currency_symbol must not be empty".into(),
            ));
        }

        if self.company.name.trim().is_empty() {
            return Err(ConfigError::Invalid("company.name must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `QUOTE_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("QUOTE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("QUOTE_EXPORT_DIR") {
            debug!(dir = %dir, "Overriding export directory from environment");
            self.export.output_dir = PathBuf::from(dir);
        }

        if let Some(symbol) = lookup("QUOTE_CURRENCY_SYMBOL") {
            self.export.currency_symbol = symbol;
        }

        if let Some(name) = lookup("QUOTE_COMPANY_NAME") {
            self.company.name = name;
        }
    }

    /// Database file, falling back to the platform data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/in.mabric.quote/quotes.db`
    /// - **Windows**: `%APPDATA%\mabric\quote\data\quotes.db`
    /// - **Linux**: `~/.local/share/quote/quotes.db`
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoProjectDirs)?;
        Ok(dirs.data_dir().join(DATABASE_FILE))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("in", "mabric", "quote")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export.currency_symbol, "Rs.");
        assert_eq!(config.company.name, "Mabric");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [export]
            currency_symbol = "INR"

            [company]
            name = "Acme Interiors"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.currency_symbol, "INR");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert_eq!(config.company.name, "Acme Interiors");
        assert_eq!(config.company.signatory_title, "Director");
        assert_eq!(config.database.path, None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("QUOTE_DB_PATH", "/tmp/q.db"),
            ("QUOTE_CURRENCY_SYMBOL", "INR"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/q.db"));
        assert_eq!(config.export.currency_symbol, "INR");
        assert_eq!(config.company.name, "Mabric");
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.export.currency_symbol = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.company.name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let scratch = tempfile::tempdir().unwrap();
        let path = scratch.path().join("quote-desk.toml");
        let mut config = AppConfig::default();
        config.export.output_dir = PathBuf::from("/srv/quotes");
        config.save(Some(path.clone())).unwrap();

        let loaded: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}
