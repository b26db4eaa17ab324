//! Weather data source clients.
//!
//! A [`WeatherProvider`] fetches current conditions for a coordinate pair
//! and normalizes the provider-specific payload into a
//! [`stormwatch_common::types::WeatherSnapshot`]. The only built-in
//! provider is OpenWeatherMap.

pub mod error;
pub mod openweather;

use crate::error::{ProviderError, Result};
use crate::openweather::OpenWeatherProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stormwatch_common::types::WeatherSnapshot;

/// A weather API client.
///
/// Implementations are `Send + Sync` so the polling loop can share one
/// client across concurrent per-location fetches.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name (e.g. `"openweathermap"`), used for logging.
    fn name(&self) -> &str;

    /// Fetches the current conditions for a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// non-success status.
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot>;
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_service")]
    pub service: String,
    /// `"metric"` or `"imperial"`; forwarded to the API and used for display
    /// units in notifications.
    #[serde(default = "default_units")]
    pub units: String,
    /// API key; the `OPENWEATHER_API_KEY` environment variable takes
    /// precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            units: default_units(),
            api_key: None,
        }
    }
}

fn default_service() -> String {
    "openweathermap".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

/// Builds the provider named by `config.service`.
///
/// # Errors
///
/// Returns [`ProviderError::UnsupportedService`] for an unknown service
/// name, or the provider's own construction error (e.g. missing API key).
pub fn provider_for(config: &ApiConfig) -> Result<Box<dyn WeatherProvider>> {
    match config.service.as_str() {
        "openweathermap" => Ok(Box::new(OpenWeatherProvider::new(config)?)),
        other => Err(ProviderError::UnsupportedService(other.to_string())),
    }
}
