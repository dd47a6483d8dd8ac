use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{config::ConfigError, provider::ProviderId};

/// Temperature scale requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    /// Convert a Celsius value into this unit.
    pub fn convert_from_celsius(&self, celsius: f64) -> f64 {
        match self {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Unit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Unit::Fahrenheit),
            _ => Err(ConfigError::InvalidUnit(value.to_string())),
        }
    }
}

/// Raw, provider-neutral observation. Always metric: °C and m/s.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub provider: ProviderId,
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// The only place a temperature is converted into the requested unit.
    pub fn into_reading(self, unit: Unit) -> WeatherReading {
        WeatherReading {
            provider: self.provider,
            city: self.city,
            temperature: unit.convert_from_celsius(self.temperature_c),
            unit,
            humidity_pct: self.humidity_pct.min(100),
            wind_speed_mps: self.wind_speed_mps.max(0.0),
            description: self.description,
            observed_at: self.observed_at,
        }
    }
}

/// One unit-normalized weather observation for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub provider: ProviderId,
    /// Location name as resolved by the provider.
    pub city: String,
    /// Expressed in `unit`.
    pub temperature: f64,
    pub unit: Unit,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub observed_at: Option<DateTime<Utc>>,
}
