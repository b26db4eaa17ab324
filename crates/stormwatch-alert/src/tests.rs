use crate::config::{AlertRule, LocationRules, RuleSet};
use crate::cooldown::CooldownTracker;
use crate::engine::AlertEngine;
use crate::evaluator;
use crate::quiet::QuietHours;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use stormwatch_common::types::{
    CompareOp, Condition, PrecipitationReading, TemperatureReading, WeatherSnapshot,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn rule(condition: &str, operator: &str, value: f64, message: &str) -> AlertRule {
    AlertRule {
        condition: Condition::from(condition.to_string()),
        operator: CompareOp::from(operator.to_string()),
        value,
        message: message.to_string(),
    }
}

fn ruleset(name: &str, alerts: Vec<AlertRule>) -> RuleSet {
    RuleSet {
        locations: vec![LocationRules {
            name: name.to_string(),
            latitude: 44.0,
            longitude: -72.0,
            alerts,
        }],
        preferences: Default::default(),
    }
}

fn snapshot_with_temp(current: f64) -> WeatherSnapshot {
    let mut snap = WeatherSnapshot::empty(t0());
    snap.temperature = Some(TemperatureReading {
        current: Some(current),
        feels_like: Some(current - 1.0),
        min: None,
        max: None,
    });
    snap
}

fn snapshot_with_precipitation(rain: f64, snow: f64) -> WeatherSnapshot {
    let mut snap = WeatherSnapshot::empty(t0());
    snap.precipitation = Some(PrecipitationReading {
        rain: Some(rain),
        snow: Some(snow),
    });
    snap
}

// ---- evaluator ----

#[test]
fn matches_is_monotonic_for_above() {
    let value = 31.2;
    assert!(evaluator::matches(value, &CompareOp::Above, 30.0));
    // Any lower threshold must also match
    for threshold in [29.0, 0.0, -40.0] {
        assert!(evaluator::matches(value, &CompareOp::Above, threshold));
    }
    assert!(!evaluator::matches(value, &CompareOp::Above, 31.2));
}

#[test]
fn equals_is_exact_float_comparison() {
    assert!(evaluator::matches(50.0, &CompareOp::Equals, 50.0));
    assert!(!evaluator::matches(50.000001, &CompareOp::Equals, 50.0));
}

#[test]
fn unknown_operator_never_matches() {
    let op = CompareOp::from(">=".to_string());
    assert!(!evaluator::matches(100.0, &op, 0.0));
}

#[test]
fn extract_missing_field_is_absent() {
    let snap = WeatherSnapshot::empty(t0());
    assert_eq!(evaluator::extract(&snap, &Condition::Temperature), None);
    assert_eq!(evaluator::extract(&snap, &Condition::Humidity), None);
    assert_eq!(evaluator::extract(&snap, &Condition::Wind), None);
}

#[test]
fn extract_precipitation_sums_rain_and_snow() {
    let snap = snapshot_with_precipitation(2.0, 1.5);
    assert_eq!(
        evaluator::extract(&snap, &Condition::Precipitation),
        Some(3.5)
    );
}

#[test]
fn extract_precipitation_absent_when_block_absent() {
    let snap = WeatherSnapshot::empty(t0());
    assert_eq!(evaluator::extract(&snap, &Condition::Precipitation), None);
}

#[test]
fn extract_rain_and_snow_default_to_zero() {
    let snap = WeatherSnapshot::empty(t0());
    assert_eq!(evaluator::extract(&snap, &Condition::Rain), Some(0.0));
    assert_eq!(evaluator::extract(&snap, &Condition::Snow), Some(0.0));

    let mut partial = WeatherSnapshot::empty(t0());
    partial.precipitation = Some(PrecipitationReading {
        rain: Some(0.4),
        snow: None,
    });
    assert_eq!(evaluator::extract(&partial, &Condition::Snow), Some(0.0));
    assert_eq!(
        evaluator::extract(&partial, &Condition::Precipitation),
        Some(0.4)
    );
}

// ---- quiet hours ----

#[test]
fn quiet_hours_disabled_is_never_quiet() {
    let quiet = QuietHours {
        enabled: false,
        start: "22:00".to_string(),
        end: "07:00".to_string(),
    };
    assert!(!quiet.is_quiet(hm(23, 30)));
}

#[test]
fn quiet_hours_overnight_window() {
    let quiet = QuietHours {
        enabled: true,
        start: "22:00".to_string(),
        end: "07:00".to_string(),
    };
    assert!(quiet.is_quiet(hm(23, 30)));
    assert!(quiet.is_quiet(hm(6, 59)));
    assert!(quiet.is_quiet(hm(7, 0))); // inclusive end
    assert!(quiet.is_quiet(hm(22, 0))); // inclusive start
    assert!(!quiet.is_quiet(hm(7, 1)));
    assert!(!quiet.is_quiet(hm(21, 59)));
}

#[test]
fn quiet_hours_same_day_window() {
    let quiet = QuietHours {
        enabled: true,
        start: "09:00".to_string(),
        end: "17:00".to_string(),
    };
    assert!(quiet.is_quiet(hm(9, 0)));
    assert!(quiet.is_quiet(hm(17, 0)));
    assert!(quiet.is_quiet(hm(12, 30)));
    assert!(!quiet.is_quiet(hm(8, 59)));
    assert!(!quiet.is_quiet(hm(17, 1)));
}

#[test]
fn quiet_hours_malformed_time_fails_open() {
    let quiet = QuietHours {
        enabled: true,
        start: "25:99".to_string(),
        end: "07:00".to_string(),
    };
    assert!(!quiet.is_quiet(hm(3, 0)));
}

// ---- cooldown ----

#[test]
fn cooldown_fires_immediately_for_new_key() {
    let tracker = CooldownTracker::new();
    assert!(tracker.should_fire("k", t0()));
}

#[test]
fn cooldown_suppresses_until_strictly_elapsed() {
    let tracker = CooldownTracker::new();
    assert!(tracker.should_fire("k", t0()));
    assert!(!tracker.should_fire("k", t0() + Duration::hours(1)));
    // Exactly the cooldown is not yet enough
    assert!(!tracker.should_fire("k", t0() + Duration::hours(6)));
    assert!(tracker.should_fire("k", t0() + Duration::hours(6) + Duration::seconds(1)));
}

#[test]
fn cooldown_keys_are_independent() {
    let tracker = CooldownTracker::new();
    let a = CooldownTracker::key("Springfield", &Condition::Temperature, &CompareOp::Above, 30.0);
    let b = CooldownTracker::key("Springfield", &Condition::Temperature, &CompareOp::Above, 35.0);
    assert_ne!(a, b);
    assert!(tracker.should_fire(&a, t0()));
    assert!(tracker.should_fire(&b, t0()));
}

// ---- engine ----

#[test]
fn heat_warning_scenario() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    ));
    let snap = snapshot_with_temp(31.2);

    let alerts = engine.evaluate_at("Springfield", &snap, t0(), noon());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].location, "Springfield");
    assert_eq!(alerts[0].condition, Condition::Temperature);
    assert_eq!(alerts[0].current_value, 31.2);
    assert_eq!(alerts[0].threshold, 30.0);
    assert_eq!(alerts[0].message, "Heat warning");
    assert_eq!(alerts[0].timestamp, t0());

    // Identical snapshot one hour later: cooldown suppresses
    let alerts = engine.evaluate_at("Springfield", &snap, t0() + Duration::hours(1), noon());
    assert!(alerts.is_empty());

    // Seven hours later the cooldown has fully elapsed
    let alerts = engine.evaluate_at("Springfield", &snap, t0() + Duration::hours(7), noon());
    assert_eq!(alerts.len(), 1);
}

#[test]
fn quiet_hours_veto_skips_evaluation_and_cooldown() {
    let mut rules = ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    );
    rules.preferences.quiet_hours = QuietHours {
        enabled: true,
        start: "22:00".to_string(),
        end: "07:00".to_string(),
    };
    let engine = AlertEngine::new(rules);
    let snap = snapshot_with_temp(31.2);

    assert!(engine
        .evaluate_at("Springfield", &snap, t0(), hm(23, 30))
        .is_empty());

    // The quiet evaluation must not have consumed the cooldown
    let alerts = engine.evaluate_at("Springfield", &snap, t0() + Duration::minutes(5), noon());
    assert_eq!(alerts.len(), 1);
}

#[test]
fn unknown_location_yields_no_alerts() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    ));
    let snap = snapshot_with_temp(31.2);
    assert!(engine.evaluate_at("Shelbyville", &snap, t0(), noon()).is_empty());
}

#[test]
fn location_lookup_trims_whitespace() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    ));
    let snap = snapshot_with_temp(31.2);
    let alerts = engine.evaluate_at("Springfield ", &snap, t0(), noon());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].location, "Springfield");
}

#[test]
fn padded_and_exact_names_share_one_cooldown() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    ));
    let snap = snapshot_with_temp(31.2);

    assert_eq!(engine.evaluate_at("Springfield ", &snap, t0(), noon()).len(), 1);
    assert!(engine
        .evaluate_at("Springfield", &snap, t0() + Duration::minutes(1), noon())
        .is_empty());
}

#[test]
fn unknown_condition_does_not_block_later_rules() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![
            rule("foo", "above", 1.0, "Bogus"),
            rule("temperature", "above", 30.0, "Heat warning"),
        ],
    ));
    let snap = snapshot_with_temp(31.2);
    let alerts = engine.evaluate_at("Springfield", &snap, t0(), noon());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Heat warning");
}

#[test]
fn unknown_operator_does_not_block_later_rules() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![
            rule("temperature", ">=", 1.0, "Bogus"),
            rule("temperature", "above", 30.0, "Heat warning"),
        ],
    ));
    let snap = snapshot_with_temp(31.2);
    let alerts = engine.evaluate_at("Springfield", &snap, t0(), noon());
    assert_eq!(alerts.len(), 1);
}

#[test]
fn precipitation_aggregation_boundaries() {
    let snap = snapshot_with_precipitation(2.0, 1.5);

    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("precipitation", "above", 3.0, "Wet")],
    ));
    assert_eq!(engine.evaluate_at("Springfield", &snap, t0(), noon()).len(), 1);

    // Sum equals the threshold: above is strict, so no alert
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("precipitation", "above", 3.5, "Wet")],
    ));
    assert!(engine.evaluate_at("Springfield", &snap, t0(), noon()).is_empty());
}

#[test]
fn alerts_come_back_in_rule_order() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![
            rule("humidity", "above", 10.0, "first"),
            rule("temperature", "above", 30.0, "second"),
            rule("humidity", "below", 90.0, "third"),
        ],
    ));
    let mut snap = snapshot_with_temp(31.2);
    snap.humidity = Some(40.0);

    let alerts = engine.evaluate_at("Springfield", &snap, t0(), noon());
    let messages: Vec<&str> = alerts.iter().map(|a| a.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn empty_message_gets_generic_default() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "")],
    ));
    let snap = snapshot_with_temp(31.2);
    let alerts = engine.evaluate_at("Springfield", &snap, t0(), noon());
    assert_eq!(alerts[0].message, "Weather alert for Springfield");
}

#[test]
fn refresh_swaps_rules_but_keeps_cooldowns() {
    let engine = AlertEngine::new(ruleset(
        "Springfield",
        vec![rule("temperature", "above", 30.0, "Heat warning")],
    ));
    let snap = snapshot_with_temp(31.2);
    assert_eq!(engine.evaluate_at("Springfield", &snap, t0(), noon()).len(), 1);

    // Same rule after refresh: still within its cooldown window
    engine.refresh(ruleset(
        "Springfield",
        vec![
            rule("temperature", "above", 30.0, "Heat warning"),
            rule("humidity", "above", 10.0, "Humid"),
        ],
    ));
    let mut snap2 = snapshot_with_temp(31.2);
    snap2.humidity = Some(40.0);
    let alerts = engine.evaluate_at("Springfield", &snap2, t0() + Duration::hours(1), noon());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Humid");
}

// ---- config ----

#[test]
fn ruleset_parses_config_document() {
    let doc = r#"{
        "locations": [
            { "name": "Springfield", "latitude": 44.05, "longitude": -72.59,
              "alerts": [
                  { "condition": "temperature", "operator": "above", "value": 30, "message": "Heat warning" },
                  { "condition": "fog_density", "operator": "past", "value": 1, "message": "Typo" }
              ] }
        ],
        "preferences": {
            "quiet_hours": { "enabled": true, "start": "22:00", "end": "07:00" }
        }
    }"#;
    let rules: RuleSet = serde_json::from_str(doc).unwrap();
    assert_eq!(rules.locations.len(), 1);
    assert_eq!(rules.locations[0].alerts.len(), 2);
    assert_eq!(rules.locations[0].alerts[0].condition, Condition::Temperature);
    // Unknown strings load, carried verbatim
    assert!(matches!(
        rules.locations[0].alerts[1].condition,
        Condition::Unrecognized(_)
    ));
    assert!(rules.preferences.quiet_hours.enabled);
    assert_eq!(rules.preferences.check_interval_minutes, 30);
}

#[test]
fn ruleset_load_fails_loudly_on_missing_file() {
    assert!(RuleSet::load("/nonexistent/rules.json").is_err());
}

#[test]
fn ruleset_load_fails_loudly_on_bad_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(RuleSet::load(path.to_str().unwrap()).is_err());
}

#[test]
fn ruleset_load_reads_valid_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, r#"{"locations":[],"preferences":{}}"#).unwrap();
    let rules = RuleSet::load(path.to_str().unwrap()).unwrap();
    assert!(rules.locations.is_empty());
}
