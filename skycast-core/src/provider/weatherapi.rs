use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::Observation,
};

use super::{ProviderId, WeatherProvider, http_client, kph_to_mps, truncate_body, unix_to_utc};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
const ID: ProviderId = ProviderId::WeatherApi;

/// WeatherAPI.com error code for "No matching location found".
const NO_MATCHING_LOCATION: i64 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
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
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ID
    }

    async fn current(&self, city: &str) -> Result<Observation> {
        let url = format!("{}/v1/current.json", self.base_url);
        debug!(provider = %ID, %url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| WeatherError::network(ID, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::network(ID, e))?;
        debug!(provider = %ID, status = status.as_u16(), bytes = body.len(), "response received");

        // Errors come back as `{"error": {...}}`, sometimes with a 200.
        if let Ok(err) = serde_json::from_str::<WaErrorBody>(&body) {
            if err.error.code == NO_MATCHING_LOCATION {
                return Err(WeatherError::NotFound {
                    provider: ID,
                    city: city.to_string(),
                });
            }
            return Err(WeatherError::Rejected {
                provider: ID,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        if !status.is_success() {
            return Err(WeatherError::Rejected {
                provider: ID,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WaResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::parse(ID, e))?;

        let ts = parsed.current.last_updated_epoch.or(parsed.location.localtime_epoch);

        Ok(Observation {
            provider: ID,
            city: format!("{}, {}", parsed.location.name, parsed.location.country),
            temperature_c: parsed.current.temp_c,
            humidity_pct: parsed.current.humidity,
            wind_speed_mps: kph_to_mps(parsed.current.wind_kph),
            description: parsed.current.condition.text,
            observed_at: ts.and_then(unix_to_utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    #[tokio::test]
    async fn parses_current_weather_and_converts_wind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": {
                    "name": "Paris",
                    "country": "France",
                    "localtime_epoch": 1714564800
                },
                "current": {
                    "last_updated_epoch": 1714564500,
                    "temp_c": 18.0,
                    "temp_f": 64.4,
                    "humidity": 62,
                    "wind_kph": 18.0,
                    "condition": { "text": "Partly cloudy" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::new("KEY".into()).with_base_url(server.uri());
        let obs = provider.current("Paris").await.unwrap();

        assert_eq!(obs.city, "Paris, France");
        assert_eq!(obs.temperature_c, 18.0);
        assert_eq!(obs.humidity_pct, 62);
        assert!((obs.wind_speed_mps - 5.0).abs() < 1e-9);
        assert_eq!(obs.description, "Partly cloudy");
        assert_eq!(obs.observed_at, unix_to_utc(1714564500));
    }

    #[tokio::test]
    async fn no_matching_location_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current("Nowhereville").await.unwrap_err();

        assert!(matches!(err, WeatherError::NotFound { provider: ProviderId::WeatherApi, .. }));
    }

    #[tokio::test]
    async fn other_error_codes_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 2008, "message": "API key has been disabled." }
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current("Paris").await.unwrap_err();

        assert!(matches!(err, WeatherError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.current("Paris").await.unwrap_err();

        assert!(matches!(err, WeatherError::Parse { .. }));
    }
}
