/// Errors that can occur when talking to a weather API.
///
/// # Examples
///
/// ```rust
/// use stormwatch_weather::error::ProviderError;
///
/// let err = ProviderError::UnsupportedService("darksky".to_string());
/// assert!(err.to_string().contains("darksky"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No API key in the environment or the configuration.
    #[error("weather API key is required (set OPENWEATHER_API_KEY or api.api_key)")]
    MissingApiKey,

    /// The API responded with a non-success status code.
    #[error("{provider} API HTTP error: status={status}, body={body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The requested weather service is not registered.
    #[error("Unsupported weather service: {0}")]
    UnsupportedService(String),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
