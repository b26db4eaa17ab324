use crate::config::RuleSet;
use crate::cooldown::CooldownTracker;
use crate::evaluator;
use chrono::{DateTime, Local, NaiveTime, Utc};
use std::sync::{Arc, RwLock};
use stormwatch_common::types::{TriggeredAlert, WeatherSnapshot};

/// Orchestrates rule evaluation for incoming snapshots.
///
/// Per snapshot: gate on quiet hours, evaluate every rule configured for the
/// snapshot's location, consult the cooldown tracker for each match, and
/// return the fired alerts in rule order. A single `evaluate` call runs to
/// completion synchronously and performs no I/O.
pub struct AlertEngine {
    rules: RwLock<Arc<RuleSet>>,
    cooldowns: CooldownTracker,
}

impl AlertEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_tracker(rules, CooldownTracker::new())
    }

    pub fn with_tracker(rules: RuleSet, cooldowns: CooldownTracker) -> Self {
        Self {
            rules: RwLock::new(Arc::new(rules)),
            cooldowns,
        }
    }

    /// The rule set currently in effect.
    pub fn rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules.read().unwrap())
    }

    /// Atomically swaps in a new rule set. In-flight evaluations keep
    /// reading the set they started with; cooldown state carries over.
    pub fn refresh(&self, rules: RuleSet) {
        *self.rules.write().unwrap() = Arc::new(rules);
    }

    /// Evaluates a snapshot for a location at the current time.
    pub fn evaluate(&self, location_name: &str, snapshot: &WeatherSnapshot) -> Vec<TriggeredAlert> {
        self.evaluate_at(location_name, snapshot, Utc::now(), Local::now().time())
    }

    /// Evaluation core with explicit clocks: `now` drives cooldown state and
    /// alert timestamps, `wall_clock` drives the quiet-hours gate.
    pub fn evaluate_at(
        &self,
        location_name: &str,
        snapshot: &WeatherSnapshot,
        now: DateTime<Utc>,
        wall_clock: NaiveTime,
    ) -> Vec<TriggeredAlert> {
        let rules = self.rules();

        // Hard global veto: no rule evaluation, no cooldown bookkeeping.
        if rules.preferences.quiet_hours.is_quiet(wall_clock) {
            tracing::debug!(location = location_name, "Skipping evaluation, quiet hours");
            return Vec::new();
        }

        let Some(location) = rules.find_location(location_name) else {
            tracing::warn!(location = location_name, "Location not found in rule config");
            return Vec::new();
        };
        let name = location.name.trim();

        let mut triggered = Vec::new();

        for rule in &location.alerts {
            let Some(value) = evaluator::extract(snapshot, &rule.condition) else {
                continue;
            };

            if !evaluator::matches(value, &rule.operator, rule.value) {
                continue;
            }

            let key = CooldownTracker::key(name, &rule.condition, &rule.operator, rule.value);
            if !self.cooldowns.should_fire(&key, now) {
                tracing::debug!(
                    location = name,
                    condition = %rule.condition,
                    "Alert suppressed (cooldown)"
                );
                continue;
            }

            let message = if rule.message.is_empty() {
                format!("Weather alert for {name}")
            } else {
                rule.message.clone()
            };

            let alert = TriggeredAlert {
                location: name.to_string(),
                condition: rule.condition.clone(),
                threshold: rule.value,
                current_value: value,
                message,
                timestamp: now,
            };
            tracing::info!(
                location = %alert.location,
                condition = %alert.condition,
                value = alert.current_value,
                threshold = alert.threshold,
                "Alert triggered"
            );
            triggered.push(alert);
        }

        triggered
    }
}
