use crate::quiet::QuietHours;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use stormwatch_common::types::{CompareOp, Condition};

/// The full rule configuration: monitored locations, their alert rules, and
/// the evaluation preferences.
///
/// Loaded from a JSON document and treated as read-only by the engine; a
/// refresh swaps in a whole new `RuleSet` rather than mutating one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub locations: Vec<LocationRules>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl RuleSet {
    /// Reads and parses the rule configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or not valid JSON; there is no default
    /// substitution.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule config {path}"))?;
        let rules: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse rule config {path}"))?;
        tracing::debug!(
            locations = rules.locations.len(),
            "Loaded rule configuration"
        );
        Ok(rules)
    }

    /// Finds the location whose configured name matches `name`, comparing
    /// with leading/trailing whitespace trimmed on both sides. Lookup is
    /// case-sensitive.
    pub fn find_location(&self, name: &str) -> Option<&LocationRules> {
        let wanted = name.trim();
        self.locations.iter().find(|loc| loc.name.trim() == wanted)
    }
}

/// A monitored location: a name, coordinates for the data source, and an
/// ordered list of alert rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRules {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub alerts: Vec<AlertRule>,
}

/// One threshold rule. Identity for cooldown purposes is the whole
/// (location, condition, operator, value) tuple; changing any field makes a
/// logically distinct rule with its own cooldown window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub condition: Condition,
    pub operator: CompareOp,
    pub value: f64,
    /// Display message; when empty, a generic per-location message is used
    /// at trigger time.
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub quiet_hours: QuietHours,
    #[serde(default = "default_check_interval_minutes")]
    pub check_interval_minutes: u64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            quiet_hours: QuietHours::default(),
            check_interval_minutes: default_check_interval_minutes(),
            history_days: default_history_days(),
        }
    }
}

fn default_check_interval_minutes() -> u64 {
    30
}

fn default_history_days() -> u32 {
    30
}
