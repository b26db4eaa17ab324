use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use stormwatch_common::types::{CompareOp, Condition};

/// Default minimum gap between two firings of the same rule: 6 hours.
pub const DEFAULT_COOLDOWN_SECS: i64 = 21_600;

/// Tracks the last-fired time per rule so a matching rule cannot fire again
/// until its cooldown has fully elapsed.
///
/// State is process-lifetime only and never evicted; the key space is
/// bounded by the configured rule count. Each engine instance owns its own
/// tracker.
pub struct CooldownTracker {
    cooldown: Duration,
    last_fired: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::with_cooldown(Duration::seconds(DEFAULT_COOLDOWN_SECS))
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: Mutex::new(HashMap::new()),
        }
    }

    /// The dedup key for a rule. Any field change produces a distinct key
    /// with its own cooldown window.
    pub fn key(location: &str, condition: &Condition, operator: &CompareOp, value: f64) -> String {
        format!("{location}_{condition}_{operator}_{value}")
    }

    /// Checks whether the rule behind `key` may fire at `now`, and if so
    /// records `now` as its new last-fired time.
    ///
    /// Check and set happen under one lock, so two concurrent evaluations of
    /// the same key can never both observe "allowed". Re-firing requires
    /// strictly more than the cooldown to have elapsed: at exactly the
    /// cooldown boundary the rule is still suppressed.
    pub fn should_fire(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut last_fired = self.last_fired.lock().unwrap();
        match last_fired.get(key) {
            Some(last) if now - *last <= self.cooldown => false,
            _ => {
                last_fired.insert(key.to_string(), now);
                true
            }
        }
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}
