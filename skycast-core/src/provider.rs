use crate::{
    config::{ConfigError, Settings},
    error::Result,
    model::Observation,
    provider::{
        openweather::OpenWeatherProvider, visualcrossing::VisualCrossingProvider,
        weatherapi::WeatherApiProvider,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::{fmt::Debug, str::FromStr, time::Duration};
use tracing::warn;

pub mod openweather;
pub mod visualcrossing;
pub mod weatherapi;

/// Applied to every provider request. Not configurable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderId {
    #[default]
    OpenWeather,
    WeatherApi,
    VisualCrossing,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::VisualCrossing => "visualcrossing",
        }
    }

    /// Environment variable that holds this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::WeatherApi => "WEATHERAPI_API_KEY",
            ProviderId::VisualCrossing => "VISUALCROSSING_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenWeather,
            ProviderId::WeatherApi,
            ProviderId::VisualCrossing,
        ]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();

        ProviderId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownProvider(value.to_string()))
    }
}

/// A source of current conditions. Implementations issue exactly one request per call.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Current conditions for `city`, in metric units.
    async fn current(&self, city: &str) -> Result<Observation>;
}

/// Construct the provider selected by resolved settings.
pub fn provider_from_settings(settings: &Settings) -> Box<dyn WeatherProvider> {
    let api_key = settings.api_key.clone();

    match settings.provider {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key)),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key)),
        ProviderId::VisualCrossing => Box::new(VisualCrossingProvider::new(api_key)),
    }
}

fn http_client() -> Client {
    build_http_client(REQUEST_TIMEOUT)
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
        warn!(error = %err, "failed to build HTTP client, falling back to one without a request timeout");
        Client::new()
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

fn kph_to_mps(kph: f64) -> f64 {
    kph / 3.6
}
