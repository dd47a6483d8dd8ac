use tracing::{debug, info};

use crate::{
    error::{Result, WeatherError},
    model::{Unit, WeatherReading},
    provider::WeatherProvider,
};

/// Look up current conditions for `city` with a single request to `provider`.
///
/// The returned reading's temperature is already expressed in `unit`. Provider
/// errors are passed through unchanged; nothing is retried.
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    city: &str,
    unit: Unit,
) -> Result<WeatherReading> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::EmptyCity);
    }

    info!(provider = %provider.id(), city, %unit, "fetching current weather");

    let observation = provider.current(city).await.inspect_err(|err| {
        debug!(provider = %provider.id(), city, error = %err, "weather lookup failed");
    })?;

    let reading = observation.into_reading(unit);
    debug!(
        resolved = %reading.city,
        temperature = reading.temperature,
        %unit,
        "reading ready"
    );

    Ok(reading)
}
