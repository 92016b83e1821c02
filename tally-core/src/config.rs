//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "logFilter": "warn,tally::notification=info" },
//!   "notifications": { "enabled": true },
//!   "accounts": [ { "accountId": "A1", "balance": "500" } ]
//! }
//! ```
//! Keys the library does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_LOG_FILTER: &str = "warn,tally::notification=info";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    notifications: NotificationSettings,
    #[serde(default)]
    accounts: Vec<OpeningAccount>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_filter: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationSettings {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            other: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// An account the ledger starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningAccount {
    pub account_id: String,
    pub balance: Decimal,
}

/// Tally configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub notifications_enabled: bool,
    pub opening_accounts: Vec<OpeningAccount>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            notifications_enabled: true,
            opening_accounts: Vec::new(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Notifications can be toggled via:
    /// 1. Settings file (`notifications.enabled`)
    /// 2. Environment variable TALLY_NOTIFICATIONS (overrides the file)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings in {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let notifications_enabled =
            match std::env::var("TALLY_NOTIFICATIONS").ok().as_deref() {
                Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
                Some("false" | "0" | "no" | "FALSE" | "NO") => false,
                _ => raw.notifications.enabled,
            };

        Ok(Self {
            log_filter: raw
                .app
                .log_filter
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            notifications_enabled,
            opening_accounts: raw.accounts.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that the library doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content)
                .unwrap_or_else(|_| self._raw_settings.clone())
        } else {
            self._raw_settings.clone()
        };

        settings.app.log_filter = Some(self.log_filter.clone());
        settings.notifications.enabled = self.notifications_enabled;
        settings.accounts = self.opening_accounts.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Add an opening account, replacing any existing one with the same id
    pub fn set_opening_account(&mut self, account_id: impl Into<String>, balance: Decimal) {
        let account_id = account_id.into();
        self.opening_accounts.retain(|a| a.account_id != account_id);
        self.opening_accounts.push(OpeningAccount {
            account_id,
            balance,
        });
    }
}
