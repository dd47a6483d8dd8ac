use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::Observation,
};

use super::{ProviderId, WeatherProvider, http_client, truncate_body, unix_to_utc};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ID: ProviderId = ProviderId::OpenWeather;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: http_client(),
        }
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: Option<OwSys>,
}

/// OpenWeather sends `cod` as a number on success and as a string on errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is(&self, code: i64) -> bool {
        match self {
            OwCode::Number(n) => *n == code,
            OwCode::Text(s) => s.trim().parse::<i64>().ok() == Some(code),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: OwCode,
}

fn reports_not_found(status: StatusCode, body: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || serde_json::from_str::<OwStatus>(body).is_ok_and(|s| s.cod.is(404))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ID
    }

    async fn current(&self, city: &str) -> Result<Observation> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        debug!(provider = %ID, %url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::network(ID, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::network(ID, e))?;
        debug!(provider = %ID, status = status.as_u16(), bytes = body.len(), "response received");

        if reports_not_found(status, &body) {
            return Err(WeatherError::NotFound {
                provider: ID,
                city: city.to_string(),
            });
        }

        if !status.is_success() {
            return Err(WeatherError::Rejected {
                provider: ID,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::parse(ID, e))?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .ok_or_else(|| WeatherError::Parse {
                provider: ID,
                reason: "response has no weather conditions".to_string(),
            })?;

        let city = match parsed.sys.and_then(|s| s.country) {
            Some(country) if !country.is_empty() => format!("{}, {}", parsed.name, country),
            _ => parsed.name,
        };

        Ok(Observation {
            provider: ID,
            city,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            description,
            observed_at: parsed.dt.and_then(unix_to_utc),
        })
    }
}
