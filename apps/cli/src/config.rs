//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                               │
//! │     --key, --name, --city, --label, --history                           │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     BILLSPLIT_PIX_KEY=11999999999                                       │
//! │     BILLSPLIT_HISTORY_PATH=/tmp/history.json                            │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     ~/.config/billsplit/config.toml (Linux)                             │
//! │     ~/Library/Application Support/app.billsplit.billsplit/... (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pix]
//! key = "11999999999"
//! payee_name = "Joao Silva"
//! city = "Sao Paulo"
//! reference_label = "***"
//!
//! [history]
//! path = "/home/joao/bills/history.json"
//! page_size = 5
//! ```

use std::path::{Path, PathBuf};

use billsplit_core::pix::{DEFAULT_REFERENCE_LABEL, MAX_CITY_LEN, MAX_PAYEE_NAME_LEN};
use billsplit_core::validation::validate_pix_key;
use billsplit_store::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

const CONFIG_FILE_NAME: &str = "config.toml";
const HISTORY_FILE_NAME: &str = "history.json";

/// Longest reference label Pix apps accept in field 62/05.
const MAX_REFERENCE_LABEL_LEN: usize = 25;

// =============================================================================
// Pix Settings
// =============================================================================

/// Who receives Pix charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixSettings {
    /// Pix key (phone, CPF, e-mail or random key). No default.
    #[serde(default)]
    pub key: Option<String>,

    /// Payee name used when the bill has no local user.
    #[serde(default = "default_payee_name")]
    pub payee_name: String,

    #[serde(default = "default_city")]
    pub city: String,

    #[serde(default = "default_reference_label")]
    pub reference_label: String,
}

fn default_payee_name() -> String {
    "BillSplitter User".to_string()
}

fn default_city() -> String {
    "Brasilia".to_string()
}

fn default_reference_label() -> String {
    DEFAULT_REFERENCE_LABEL.to_string()
}

impl Default for PixSettings {
    fn default() -> Self {
        PixSettings {
            key: None,
            payee_name: default_payee_name(),
            city: default_city(),
            reference_label: default_reference_label(),
        }
    }
}

// =============================================================================
// History Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// History file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Bills per `history list` page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for HistorySettings {
    fn default() -> Self {
        HistorySettings {
            path: None,
            page_size: default_page_size(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pix: PixSettings,

    #[serde(default)]
    pub history: HistorySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        Self::load_from(config_path, true)
    }

    /// Like [`AppConfig::load`], but a missing explicit file falls back to
    /// defaults. Used by `config init`, which is about to create that file.
    pub fn load_or_default(config_path: Option<PathBuf>) -> CliResult<Self> {
        Self::load_from(config_path, false)
    }

    fn load_from(config_path: Option<PathBuf>, require_explicit: bool) -> CliResult<Self> {
        let explicit = require_explicit && config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
                config = toml::from_str(&contents)?;
            } else if explicit {
                return Err(CliError::ConfigNotFound(path));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as TOML and returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CliError::io(&path, e))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if let Some(key) = &self.pix.key {
            validate_pix_key(key)?;
        }

        if self.pix.city.trim().is_empty() {
            return Err(CliError::Config("pix.city must not be empty".into()));
        }
        if self.pix.city.chars().count() > MAX_CITY_LEN {
            warn!(city = %self.pix.city, "pix.city will be cut to {} characters", MAX_CITY_LEN);
        }
        if self.pix.payee_name.chars().count() > MAX_PAYEE_NAME_LEN {
            warn!(
                name = %self.pix.payee_name,
                "pix.payee_name will be cut to {} characters", MAX_PAYEE_NAME_LEN
            );
        }

        let label_len = self.pix.reference_label.chars().count();
        if label_len == 0 || label_len > MAX_REFERENCE_LABEL_LEN {
            return Err(CliError::Config(format!(
                "pix.reference_label must be 1 to {} characters",
                MAX_REFERENCE_LABEL_LEN
            )));
        }

        if self.history.page_size == 0 {
            return Err(CliError::Config(
                "history.page_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BILLSPLIT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("BILLSPLIT_PIX_KEY") {
            debug!("Overriding Pix key from environment");
            self.pix.key = Some(key);
        }

        if let Some(name) = var("BILLSPLIT_PIX_NAME") {
            self.pix.payee_name = name;
        }

        if let Some(city) = var("BILLSPLIT_PIX_CITY") {
            self.pix.city = city;
        }

        if let Some(label) = var("BILLSPLIT_PIX_LABEL") {
            self.pix.reference_label = label;
        }

        if let Some(path) = var("BILLSPLIT_HISTORY_PATH") {
            debug!(path = %path, "Overriding history path from environment");
            self.history.path = Some(PathBuf::from(path));
        }

        if let Some(size) = var("BILLSPLIT_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(n) => self.history.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring non-numeric BILLSPLIT_PAGE_SIZE"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("app", "billsplit", "billsplit")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Where the history lives: configured path, else the platform data
    /// directory, else the working directory.
    pub fn history_path(&self) -> PathBuf {
        self.history
            .path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(HISTORY_FILE_NAME)))
            .unwrap_or_else(|| Path::new(HISTORY_FILE_NAME).to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pix.key, None);
        assert_eq!(config.pix.payee_name, "BillSplitter User");
        assert_eq!(config.pix.city, "Brasilia");
        assert_eq!(config.pix.reference_label, "***");
        assert_eq!(config.history.page_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [pix]
            key = "chave@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.pix.key.as_deref(), Some("chave@example.com"));
        assert_eq!(config.pix.city, "Brasilia");
        assert_eq!(config.history.page_size, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.history.page_size = 0;
        assert!(config.validate().is_err());
        config.history.page_size = 10;

        config.pix.key = Some("   ".into());
        assert!(config.validate().is_err());
        config.pix.key = Some("11999999999".into());
        assert!(config.validate().is_ok());

        config.pix.reference_label = String::new();
        assert!(config.validate().is_err());
        config.pix.reference_label = "x".repeat(26);
        assert!(config.validate().is_err());
        config.pix.reference_label = "RACHA01".into();

        config.pix.city = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BILLSPLIT_PIX_KEY", "11988887777"),
            ("BILLSPLIT_PIX_CITY", "Recife"),
            ("BILLSPLIT_HISTORY_PATH", "/tmp/bills.json"),
            ("BILLSPLIT_PAGE_SIZE", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.pix.key.as_deref(), Some("11988887777"));
        assert_eq!(config.pix.city, "Recife");
        assert_eq!(config.pix.payee_name, "BillSplitter User");
        assert_eq!(config.history_path(), PathBuf::from("/tmp/bills.json"));
        assert_eq!(config.history.page_size, 5);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.pix.key = Some("11999999999".into());
        config.history.page_size = 8;
        assert_eq!(config.save(Some(path.clone())).unwrap(), path);

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound(_)));

        let config = AppConfig::load_or_default(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.history.page_size, 5);
    }
}
