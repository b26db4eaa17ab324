//! Pure condition evaluation: snapshot field extraction and threshold
//! comparison. No state lives here.

use stormwatch_common::types::{CompareOp, Condition, WeatherSnapshot};

/// Extracts the numeric reading a condition refers to, or `None` when the
/// snapshot does not carry it.
///
/// `precipitation` is the sum of rain and snow with a missing sub-field
/// counted as 0, but is absent when the whole precipitation block is absent.
/// `rain` and `snow` individually default to 0 even without the block, so a
/// dry snapshot still satisfies `rain below 0.1`.
pub fn extract(snapshot: &WeatherSnapshot, condition: &Condition) -> Option<f64> {
    match condition {
        Condition::Temperature => snapshot.temperature.as_ref()?.current,
        Condition::FeelsLike => snapshot.temperature.as_ref()?.feels_like,
        Condition::Humidity => snapshot.humidity,
        Condition::Pressure => snapshot.pressure,
        Condition::Wind => snapshot.wind.as_ref()?.speed,
        Condition::Clouds => snapshot.clouds,
        Condition::Precipitation => snapshot
            .precipitation
            .as_ref()
            .map(|p| p.rain.unwrap_or(0.0) + p.snow.unwrap_or(0.0)),
        Condition::Rain => Some(
            snapshot
                .precipitation
                .as_ref()
                .and_then(|p| p.rain)
                .unwrap_or(0.0),
        ),
        Condition::Snow => Some(
            snapshot
                .precipitation
                .as_ref()
                .and_then(|p| p.snow)
                .unwrap_or(0.0),
        ),
        Condition::Unrecognized(name) => {
            tracing::warn!(condition = %name, "Unknown alert condition");
            None
        }
    }
}

/// Compares an extracted value against a rule threshold.
///
/// `equals` is exact floating-point equality, which is brittle for
/// non-integral thresholds.
pub fn matches(value: f64, operator: &CompareOp, threshold: f64) -> bool {
    match operator {
        CompareOp::Above => value > threshold,
        CompareOp::Below => value < threshold,
        CompareOp::Equals => value == threshold,
        CompareOp::Unrecognized(op) => {
            tracing::warn!(operator = %op, "Unknown comparison operator");
            false
        }
    }
}
