//! Human-readable rendering of readings and errors. Pure string building, no I/O.

use skycast_core::{ConfigError, WeatherError, WeatherReading};

/// Multi-line summary of a reading. Temperature and wind use one decimal place.
pub fn format_success(reading: &WeatherReading) -> String {
    let mut lines = vec![
        format!("Weather for {} ({})", reading.city, reading.provider),
        format!(
            "  Temperature: {} {}",
            one_decimal(reading.temperature),
            reading.unit.symbol()
        ),
        format!("  Humidity:    {}%", reading.humidity_pct),
        format!("  Wind:        {} m/s", one_decimal(reading.wind_speed_mps)),
        format!("  Conditions:  {}", title_case(&reading.description)),
    ];

    if let Some(at) = reading.observed_at {
        lines.push(format!("  Observed:    {}", at.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.join("\n")
}

/// One line per error kind. Details beyond the kind go to the debug log, not here.
pub fn format_error(err: &WeatherError) -> String {
    match err {
        WeatherError::Config(ConfigError::Parse { path, .. }) => {
            format!("error: configuration problem: invalid config file {}", path.display())
        }
        WeatherError::Config(e) => {
            format!("error: configuration problem: {}", first_line(&e.to_string()))
        }
        WeatherError::EmptyCity => "error: city name must not be empty".to_string(),
        WeatherError::NotFound { city, .. } => format!("error: city not found: {city}"),
        WeatherError::Network { .. } => {
            "error: could not reach the weather service; check your network connection"
                .to_string()
        }
        WeatherError::Parse { .. } => "error: unexpected response from weather service".to_string(),
        WeatherError::Rejected { status, .. } => {
            format!("error: weather service rejected the request (HTTP {status})")
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim_end()
}

fn one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid printing "-0.0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}")
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skycast_core::{
        Config, ProviderId, Unit, WeatherProvider, provider::openweather::OpenWeatherProvider,
    };
    use std::io::Write;

    fn reading() -> WeatherReading {
        WeatherReading {
            provider: ProviderId::OpenWeather,
            city: "London, GB".into(),
            temperature: 21.46,
            unit: Unit::Celsius,
            humidity_pct: 40,
            wind_speed_mps: 3.25,
            description: "clear sky".into(),
            observed_at: None,
        }
    }

    #[test]
    fn success_block_layout() {
        let expected = "Weather for London, GB (openweather)\n\
                        \x20 Temperature: 21.5 °C\n\
                        \x20 Humidity:    40%\n\
                        \x20 Wind:        3.3 m/s\n\
                        \x20 Conditions:  Clear Sky";

        assert_eq!(format_success(&reading()), expected);
    }

    #[test]
    fn success_is_deterministic() {
        let r = reading();
        assert_eq!(format_success(&r), format_success(&r));
    }

    #[test]
    fn fahrenheit_symbol_and_observed_line() {
        let mut r = reading();
        r.unit = Unit::Fahrenheit;
        r.temperature = 70.6;
        r.observed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();

        let out = format_success(&r);
        assert!(out.contains("Temperature: 70.6 °F"));
        assert!(out.ends_with("Observed:    2024-05-01 12:00 UTC"));
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(one_decimal(-0.04), "0.0");
        assert_eq!(one_decimal(-3.96), "-4.0");
    }

    #[test]
    fn title_case_collapses_whitespace() {
        assert_eq!(title_case("  light   rain "), "Light Rain");
        assert_eq!(title_case(""), "");
    }

    /// A real transport failure from a refused connection.
    async fn network_error() -> WeatherError {
        OpenWeatherProvider::new("KEY".into())
            .with_base_url("http://127.0.0.1:1")
            .current("London")
            .await
            .unwrap_err()
    }

    #[test]
    fn malformed_config_file_is_one_line() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "default_provider = ").unwrap();

        let err = WeatherError::Config(Config::load_from(tmp.path()).unwrap_err());
        let msg = format_error(&err);

        assert!(!msg.contains('\n'), "{msg:?}");
        assert_eq!(
            msg,
            format!(
                "error: configuration problem: invalid config file {}",
                tmp.path().display()
            )
        );
    }

    #[tokio::test]
    async fn error_messages_are_distinct() {
        let errors = [
            network_error().await,
            WeatherError::Config(ConfigError::InvalidUnit("k".into())),
            WeatherError::EmptyCity,
            WeatherError::NotFound {
                provider: ProviderId::OpenWeather,
                city: "Atlantis".into(),
            },
            WeatherError::Parse {
                provider: ProviderId::OpenWeather,
                reason: "missing field `temp`".into(),
            },
            WeatherError::Rejected {
                provider: ProviderId::OpenWeather,
                status: 401,
                body: String::new(),
            },
        ];

        let messages: Vec<String> = errors.iter().map(format_error).collect();
        for (i, a) in messages.iter().enumerate() {
            assert!(!a.contains('\n'), "{a}");
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }

        assert_eq!(
            messages[0],
            "error: could not reach the weather service; check your network connection"
        );
        assert_eq!(messages[3], "error: city not found: Atlantis");
        assert_eq!(messages[4], "error: unexpected response from weather service");
    }
}
