//! # Configuration
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`config.toml` in the platform config dir)
//! 3. Environment variables (`GELATO_*`)
//!
//! ## Example `config.toml`
//! ```toml
//! [store]
//! name = "Gelateria da Praça"
//! address_lines = ["Rua das Flores, 10", "Centro"]
//! currency_symbol = "R$"
//! utc_offset_minutes = -180
//!
//! [storage]
//! database_path = "/var/lib/gelato/gelato.db"
//!
//! [session]
//! login_delay_ms = 500
//! checkout_delay_ms = 500
//! operator_password_hash = "$argon2id$v=19$..."
//!
//! [report]
//! top_n = 10
//!
//! [receipt]
//! enabled = true
//! output_dir = "/var/lib/gelato/receipts"
//! ```
//!
//! Configuration is read-only after startup.

use std::path::PathBuf;
use std::time::Duration;

use gelato_core::receipt::ReceiptHeader;
use gelato_core::report::ReportOptions;
use gelato_core::DEFAULT_TOP_PRODUCTS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "gelato.db";

/// Widest real-world UTC offset, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Longest artificial delay accepted.
const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_name")]
    pub name: String,
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Offset from UTC used for receipts and hour-of-day reports.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Defaults to `gelato.db` in the platform data dir.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Keep everything in memory (demos, training).
    #[serde(default)]
    pub in_memory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_delay_ms")]
    pub login_delay_ms: u64,
    #[serde(default = "default_delay_ms")]
    pub checkout_delay_ms: u64,
    /// Argon2 PHC string. Unset: any non-empty password logs in.
    #[serde(default)]
    pub operator_password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Defaults to `receipts/` in the platform data dir.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_store_name() -> String {
    "Gelato".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_utc_offset() -> i32 {
    -180
}

fn default_delay_ms() -> u64 {
    500
}

fn default_top_n() -> usize {
    DEFAULT_TOP_PRODUCTS
}

fn default_true() -> bool {
    true
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: default_store_name(),
            address_lines: Vec::new(),
            currency_symbol: default_currency_symbol(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        SessionSection {
            login_delay_ms: default_delay_ms(),
            checkout_delay_ms: default_delay_ms(),
            operator_password_hash: None,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        ReportSection {
            top_n: default_top_n(),
        }
    }
}

impl Default for ReceiptSection {
    fn default() -> Self {
        ReceiptSection {
            enabled: true,
            output_dir: None,
        }
    }
}

// =============================================================================
// PdvConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdvConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub receipt: ReceiptSection,
}

impl PdvConfig {
    /// Loads configuration from file, environment, and defaults.
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

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }
        if self.store.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("store.currency_symbol must not be empty".into()));
        }
        if self.store.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "store.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.store.utc_offset_minutes
            )));
        }
        if self.session.login_delay_ms > MAX_DELAY_MS || self.session.checkout_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "session delays must be at most {} ms",
                MAX_DELAY_MS
            )));
        }
        if let Some(hash) = &self.session.operator_password_hash {
            argon2::PasswordHash::new(hash).map_err(|e| {
                ConfigError::Invalid(format!("session.operator_password_hash is not a PHC string: {}", e))
            })?;
        }
        if self.report.top_n == 0 {
            return Err(ConfigError::Invalid("report.top_n must be greater than 0".into()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `GELATO_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("GELATO_STORE_NAME") {
            self.store.name = name;
        }
        if let Some(symbol) = lookup("GELATO_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }
        if let Some(offset) = lookup("GELATO_UTC_OFFSET_MINUTES") {
            match offset.parse() {
                Ok(minutes) => self.store.utc_offset_minutes = minutes,
                Err(_) => warn!(value = %offset, "Ignoring invalid GELATO_UTC_OFFSET_MINUTES"),
            }
        }
        if let Some(path) = lookup("GELATO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("GELATO_IN_MEMORY") {
            self.storage.in_memory = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(ms) = lookup("GELATO_LOGIN_DELAY_MS") {
            if let Ok(ms) = ms.parse() {
                self.session.login_delay_ms = ms;
            }
        }
        if let Some(ms) = lookup("GELATO_CHECKOUT_DELAY_MS") {
            if let Ok(ms) = ms.parse() {
                self.session.checkout_delay_ms = ms;
            }
        }
        if let Some(hash) = lookup("GELATO_OPERATOR_PASSWORD_HASH") {
            self.session.operator_password_hash = Some(hash).filter(|h| !h.is_empty());
        }
        if let Some(top_n) = lookup("GELATO_TOP_N") {
            if let Ok(n) = top_n.parse() {
                self.report.top_n = n;
            }
        }
        if let Some(dir) = lookup("GELATO_RECEIPT_DIR") {
            self.receipt.output_dir = Some(PathBuf::from(dir));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("br", "gelato", "pdv")
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Database file to open: configured path, platform data dir, or the
    /// working directory as a last resort.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE)))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    /// Directory receipts are written to, `None` when printing is off.
    pub fn receipt_dir(&self) -> Option<PathBuf> {
        if !self.receipt.enabled {
            return None;
        }
        self.receipt
            .output_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("receipts")))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn receipt_header(&self) -> ReceiptHeader {
        ReceiptHeader {
            store_name: self.store.name.clone(),
            address_lines: self.store.address_lines.clone(),
            currency_symbol: self.store.currency_symbol.clone(),
            utc_offset_minutes: self.store.utc_offset_minutes,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.report.top_n,
            utc_offset_minutes: self.store.utc_offset_minutes,
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.session.login_delay_ms)
    }

    pub fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.session.checkout_delay_ms)
    }

    /// Formats centavos with the configured symbol.
    pub fn format_currency(&self, amount: gelato_core::Money) -> String {
        amount.format_with(&self.store.currency_symbol)
    }
}
