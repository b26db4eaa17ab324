use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Global quiet-hours window during which no alerts fire.
///
/// Start and end are wall-clock `HH:MM` strings with no date or timezone
/// component; the service is assumed to run in a single local zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietHours {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_start() -> String {
    "22:00".to_string()
}

fn default_end() -> String {
    "07:00".to_string()
}

impl QuietHours {
    /// Whether `now` falls inside the quiet window.
    ///
    /// An overnight window (`start > end`, e.g. 22:00-07:00) is quiet when
    /// `now >= start || now <= end`; a same-day window when
    /// `start <= now <= end`. Both boundaries are inclusive in both cases.
    ///
    /// A start or end that fails to parse as `HH:MM` is logged and treated
    /// as not-quiet, so a config typo can never silently swallow alerts.
    pub fn is_quiet(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }

        let (start, end) = match (parse_hhmm(&self.start), parse_hhmm(&self.end)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                tracing::warn!(
                    start = %self.start,
                    end = %self.end,
                    "Invalid quiet hours format, ignoring quiet hours"
                );
                return false;
            }
        };

        if start > end {
            now >= start || now <= end
        } else {
            start <= now && now <= end
        }
    }
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}
