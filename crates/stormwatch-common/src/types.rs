use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped set of environmental readings for a location.
///
/// Every reading is optional: a provider that does not report a field leaves
/// it `None`, which is distinct from a reading of zero. Consumers treat a
/// missing field as "no data", never as a measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<TemperatureReading>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub wind: Option<WindReading>,
    #[serde(default)]
    pub clouds: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<PrecipitationReading>,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
}

impl WeatherSnapshot {
    /// A snapshot with no readings, useful as a starting point for builders.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: None,
            humidity: None,
            pressure: None,
            wind: None,
            clouds: None,
            precipitation: None,
            weather: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub current: Option<f64>,
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindReading {
    pub speed: Option<f64>,
    #[serde(default)]
    pub direction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecipitationReading {
    pub rain: Option<f64>,
    pub snow: Option<f64>,
}

/// Free-form description of the sky state (e.g. "Rain" / "light rain").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub condition: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A weather reading an alert rule can test against.
///
/// Unknown strings deserialize into [`Condition::Unrecognized`] instead of
/// failing, so a config document with a typo still loads; the affected rule
/// is skipped (and logged) at evaluation time.
///
/// # Examples
///
/// ```
/// use stormwatch_common::types::Condition;
///
/// let cond = Condition::from("feels_like".to_string());
/// assert_eq!(cond, Condition::FeelsLike);
/// assert_eq!(cond.to_string(), "feels_like");
///
/// let unknown = Condition::from("fog_density".to_string());
/// assert!(matches!(unknown, Condition::Unrecognized(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Temperature,
    FeelsLike,
    Humidity,
    Pressure,
    Wind,
    Clouds,
    Precipitation,
    Rain,
    Snow,
    Unrecognized(String),
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        match s.as_str() {
            "temperature" => Self::Temperature,
            "feels_like" => Self::FeelsLike,
            "humidity" => Self::Humidity,
            "pressure" => Self::Pressure,
            "wind" => Self::Wind,
            "clouds" => Self::Clouds,
            "precipitation" => Self::Precipitation,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        c.to_string()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::FeelsLike => write!(f, "feels_like"),
            Self::Humidity => write!(f, "humidity"),
            Self::Pressure => write!(f, "pressure"),
            Self::Wind => write!(f, "wind"),
            Self::Clouds => write!(f, "clouds"),
            Self::Precipitation => write!(f, "precipitation"),
            Self::Rain => write!(f, "rain"),
            Self::Snow => write!(f, "snow"),
            Self::Unrecognized(s) => write!(f, "{s}"),
        }
    }
}

/// Comparison operator of an alert rule.
///
/// Like [`Condition`], unknown strings land in
/// [`CompareOp::Unrecognized`] and make the rule inert rather than
/// unloadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompareOp {
    Above,
    Below,
    Equals,
    Unrecognized(String),
}

impl From<String> for CompareOp {
    fn from(s: String) -> Self {
        match s.as_str() {
            "above" => Self::Above,
            "below" => Self::Below,
            "equals" => Self::Equals,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<CompareOp> for String {
    fn from(op: CompareOp) -> Self {
        op.to_string()
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
            Self::Equals => write!(f, "equals"),
            Self::Unrecognized(s) => write!(f, "{s}"),
        }
    }
}

/// A fired alert, ready for delivery and archiving.
///
/// One is constructed per (rule, snapshot) pair that matches its condition
/// and clears both the quiet-hours gate and the cooldown window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub location: String,
    pub condition: Condition,
    pub threshold: f64,
    /// The reading extracted from the snapshot at trigger time.
    pub current_value: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
