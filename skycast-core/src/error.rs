use thiserror::Error;

use crate::{config::ConfigError, provider::ProviderId};

/// Everything that can go wrong between reading configuration and holding a reading.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("city name must not be empty")]
    EmptyCity,

    /// The provider does not recognize the city. Not worth retrying.
    #[error("{provider} does not know a city named '{city}'")]
    NotFound { provider: ProviderId, city: String },

    /// Transport-level failure: DNS, refused connection, timeout.
    #[error("request to {provider} failed: {source}")]
    Network {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    /// The body did not have the expected shape.
    #[error("could not parse {provider} response: {reason}")]
    Parse { provider: ProviderId, reason: String },

    /// Any other non-success status, e.g. an invalid API key or a server error.
    #[error("{provider} answered with HTTP {status}: {body}")]
    Rejected {
        provider: ProviderId,
        status: u16,
        body: String,
    },
}

impl WeatherError {
    pub(crate) fn network(provider: ProviderId, source: reqwest::Error) -> Self {
        WeatherError::Network { provider, source }
    }

    pub(crate) fn parse(provider: ProviderId, source: serde_json::Error) -> Self {
        WeatherError::Parse { provider, reason: source.to_string() }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
