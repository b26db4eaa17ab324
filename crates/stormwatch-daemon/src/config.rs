use anyhow::Context;
use serde::{Deserialize, Serialize};
use stormwatch_alert::config::RuleSet;
use stormwatch_weather::ApiConfig;

/// The single JSON configuration document for the daemon: data source,
/// storage, notification channels, plus the rule set (locations and
/// preferences) consumed by the alert engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(flatten)]
    pub rules: RuleSet,
}

impl AppConfig {
    /// Loads the configuration, failing loudly on a missing or malformed
    /// file. Every subcommand goes through this; there is no default
    /// substitution at startup.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let config: Self =
            serde_json::from_str(&content).with_context(|| format!("failed to parse config {path}"))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "data/weather_history.db".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub log: LogChannelConfig,
    #[serde(default)]
    pub webhook: WebhookChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogChannelConfig {
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
}

impl Default for LogChannelConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
        }
    }
}

fn default_log_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookChannelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub body_template: Option<String>,
}
