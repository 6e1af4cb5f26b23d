//! Clinic configuration and application paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dentasys_i18n::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::PdfOptions;

/// Application-level constants
pub const APP_NAME: &str = "DentaSys";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-user data directory, e.g. `~/.local/share/DentaSys` on Linux.
///
/// Falls back to the working directory when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join("dentasys.db")
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

pub fn default_log_filter() -> &'static str {
    "dentasys_core=info,dentasys_i18n=info"
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings stored in `config.json`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub database_path: PathBuf,
    /// Language shown at startup
    pub language: Language,
    pub search_debounce_ms: u64,
    pub currency_symbol: String,
    /// TrueType font for Arabic PDF reports
    pub pdf_font_path: Option<PathBuf>,
    /// Used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            language: Language::English,
            search_debounce_ms: 500,
            currency_symbol: "$".into(),
            pdf_font_path: None,
            log_filter: default_log_filter().into(),
        }
    }
}

impl ClinicConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            currency_symbol: self.currency_symbol.clone(),
            font_path: self.pdf_font_path.clone(),
        }
    }
}
