use crate::error::{ProviderError, Result};
use crate::{ApiConfig, WeatherProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use stormwatch_common::types::{
    PrecipitationReading, TemperatureReading, WeatherSnapshot, WeatherSummary, WindReading,
};

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct OpenWeatherProvider {
    client: Client,
    api_key: String,
    units: String,
}

impl OpenWeatherProvider {
    /// Builds a client for the OpenWeatherMap current-weather endpoint.
    ///
    /// The API key comes from the `OPENWEATHER_API_KEY` environment variable
    /// when set, otherwise from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingApiKey`] when neither source has a
    /// key, or an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var("OPENWEATHER_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| config.api_key.clone())
            .ok_or(ProviderError::MissingApiKey)?;

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            units: config.units.clone(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let response = self
            .client
            .get(CURRENT_WEATHER_URL)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                provider: "openweathermap".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: OwmCurrent = response.json().await?;
        tracing::debug!(latitude, longitude, "Fetched current weather");
        Ok(to_snapshot(payload, Utc::now()))
    }
}

// ---- OpenWeatherMap wire types ----

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    main: Option<OwmMain>,
    wind: Option<OwmWind>,
    clouds: Option<OwmClouds>,
    rain: Option<OwmVolume>,
    snow: Option<OwmVolume>,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmVolume {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

/// Normalizes an OpenWeatherMap payload into the shared snapshot shape.
///
/// Rain and snow volumes default to 0 so the precipitation block is always
/// present for API-sourced snapshots; readings the API omitted stay `None`.
fn to_snapshot(payload: OwmCurrent, fetched_at: DateTime<Utc>) -> WeatherSnapshot {
    let mut snap = WeatherSnapshot::empty(fetched_at);

    if let Some(main) = payload.main {
        snap.humidity = main.humidity;
        snap.pressure = main.pressure;
        snap.temperature = Some(TemperatureReading {
            current: main.temp,
            feels_like: main.feels_like,
            min: main.temp_min,
            max: main.temp_max,
        });
    }

    if let Some(wind) = payload.wind {
        snap.wind = Some(WindReading {
            speed: wind.speed,
            direction: wind.deg,
        });
    }

    snap.clouds = payload.clouds.and_then(|c| c.all);

    snap.precipitation = Some(PrecipitationReading {
        rain: Some(payload.rain.and_then(|r| r.one_hour).unwrap_or(0.0)),
        snow: Some(payload.snow.and_then(|s| s.one_hour).unwrap_or(0.0)),
    });

    if let Some(weather) = payload.weather.into_iter().next() {
        snap.weather = Some(WeatherSummary {
            condition: weather.main,
            description: weather.description,
            icon: weather.icon,
        });
    }

    snap
}
