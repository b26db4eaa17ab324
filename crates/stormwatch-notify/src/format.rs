//! Human-readable rendering of fired alerts.

use stormwatch_common::types::{Condition, TriggeredAlert};

/// Display name for a condition: snake_case becomes Title Case
/// (`feels_like` → `Feels Like`).
pub fn condition_display_name(condition: &Condition) -> String {
    condition
        .to_string()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Measurement unit for a condition under the given units system
/// (`"metric"` or `"imperial"`).
pub fn condition_units(condition: &Condition, units: &str) -> &'static str {
    let metric = units == "metric";
    match condition {
        Condition::Temperature | Condition::FeelsLike => {
            if metric {
                "°C"
            } else {
                "°F"
            }
        }
        Condition::Pressure => " hPa",
        Condition::Humidity | Condition::Clouds => "%",
        Condition::Wind => {
            if metric {
                " m/s"
            } else {
                " mph"
            }
        }
        Condition::Precipitation | Condition::Rain | Condition::Snow => {
            if metric {
                " mm"
            } else {
                " in"
            }
        }
        Condition::Unrecognized(_) => "",
    }
}

/// Renders the alert body shown alongside the rule's own message, e.g.
/// `"Temperature is 31.2°C (Threshold: 30°C)"`.
pub fn render_alert(alert: &TriggeredAlert, units: &str) -> String {
    let unit = condition_units(&alert.condition, units);
    format!(
        "{} is {}{} (Threshold: {}{})",
        condition_display_name(&alert.condition),
        alert.current_value,
        unit,
        alert.threshold,
        unit,
    )
}
