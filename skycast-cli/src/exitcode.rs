//! Exit codes (BSD sysexits.h compatible)

use skycast_core::WeatherError;

/// Command line usage error
pub const USAGE: u8 = 64;

/// Data format error
pub const DATAERR: u8 = 65;

/// Cannot open input
pub const NOINPUT: u8 = 66;

/// Service unavailable
pub const UNAVAILABLE: u8 = 69;

/// Remote error in protocol
pub const PROTOCOL: u8 = 76;

/// Configuration error
pub const CONFIG: u8 = 78;

/// Exit code for a failed lookup.
pub fn for_error(err: &WeatherError) -> u8 {
    match err {
        WeatherError::Config(_) => CONFIG,
        WeatherError::EmptyCity => USAGE,
        WeatherError::NotFound { .. } => NOINPUT,
        WeatherError::Network { .. } => UNAVAILABLE,
        WeatherError::Parse { .. } => DATAERR,
        WeatherError::Rejected { .. } => PROTOCOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{
        ConfigError, ProviderId, WeatherProvider, provider::openweather::OpenWeatherProvider,
    };

    #[tokio::test]
    async fn each_failure_has_its_own_nonzero_code() {
        let network = OpenWeatherProvider::new("KEY".into())
            .with_base_url("http://127.0.0.1:1")
            .current("London")
            .await
            .unwrap_err();

        let cases = [
            (WeatherError::Config(ConfigError::InvalidUnit("k".into())), CONFIG),
            (WeatherError::EmptyCity, USAGE),
            (
                WeatherError::NotFound {
                    provider: ProviderId::WeatherApi,
                    city: "x".into(),
                },
                NOINPUT,
            ),
            (network, UNAVAILABLE),
            (
                WeatherError::Parse {
                    provider: ProviderId::WeatherApi,
                    reason: String::new(),
                },
                DATAERR,
            ),
            (
                WeatherError::Rejected {
                    provider: ProviderId::WeatherApi,
                    status: 503,
                    body: String::new(),
                },
                PROTOCOL,
            ),
        ];

        for (err, code) in &cases {
            assert_ne!(for_error(err), 0);
            assert_eq!(for_error(err), *code, "{err:?}");
        }
    }
}
