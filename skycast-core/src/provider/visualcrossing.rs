use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::ConfigError,
    error::{Result, WeatherError},
    model::Observation,
};

use super::{ProviderId, WeatherProvider, http_client, kph_to_mps, truncate_body, unix_to_utc};

const DEFAULT_BASE_URL: &str = "https://weather.visualcrossing.com";
const ID: ProviderId = ProviderId::VisualCrossing;

#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: http_client(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The location is a path segment here, so it has to be escaped as one.
    fn timeline_url(&self, city: &str) -> Result<Url> {
        let invalid = || WeatherError::Config(ConfigError::InvalidBaseUrl(self.base_url.clone()));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["VisualCrossingWebServices", "rest", "services", "timeline", city]);

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcConditions {
    datetime_epoch: Option<i64>,
    temp: f64,
    humidity: f64,
    windspeed: Option<f64>,
    conditions: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcResponse {
    resolved_address: Option<String>,
    address: String,
    current_conditions: VcConditions,
}

/// Visual Crossing answers an unknown location with a plain-text 400.
fn reports_not_found(status: StatusCode, body: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST && body.to_lowercase().contains("invalid location"))
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    fn id(&self) -> ProviderId {
        ID
    }

    async fn current(&self, city: &str) -> Result<Observation> {
        let url = self.timeline_url(city)?;
        debug!(provider = %ID, %url, city, "requesting current weather");

        let res = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", "metric"),
                ("key", self.api_key.as_str()),
                ("include", "current"),
                ("contentType", "json"),
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

        let parsed: VcResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::parse(ID, e))?;
        let current = parsed.current_conditions;

        Ok(Observation {
            provider: ID,
            city: parsed.resolved_address.unwrap_or(parsed.address),
            temperature_c: current.temp,
            humidity_pct: current.humidity.round().clamp(0.0, 100.0) as u8,
            // metric unit group reports km/h
            wind_speed_mps: kph_to_mps(current.windspeed.unwrap_or(0.0)),
            description: current.conditions,
            observed_at: current.datetime_epoch.and_then(unix_to_utc),
        })
    }
}
