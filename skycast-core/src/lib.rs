//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration loading from the environment and an optional config file
//! - Abstraction over weather providers, plus the providers themselves
//! - Shared domain models (units, observations, readings) and the error taxonomy
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use client::fetch_weather;
pub use config::{Config, ConfigError, Settings, load_config};
pub use error::WeatherError;
pub use model::{Observation, Unit, WeatherReading};
pub use provider::{ProviderId, WeatherProvider, provider_from_settings};
