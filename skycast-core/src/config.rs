use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

use crate::{model::Unit, provider::ProviderId};

/// Environment variable selecting the provider when `--provider` is absent.
pub const PROVIDER_ENV: &str = "SKYCAST_PROVIDER";

/// Environment variable holding the default temperature unit.
pub const UNIT_ENV: &str = "SKYCAST_UNIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured for provider '{provider}'; set {env_var} or add it to a .env file")]
    MissingApiKey {
        provider: ProviderId,
        env_var: &'static str,
    },

    #[error("unknown provider '{0}'. Supported providers: openweather, weatherapi, visualcrossing.")]
    UnknownProvider(String),

    #[error("invalid unit '{0}'. Expected celsius (c) or fahrenheit (f).")]
    InvalidUnit(String),

    #[error("invalid provider base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Optional on-disk configuration. Environment variables take precedence.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// e.g. "openweather" or "weatherapi".
    pub default_provider: Option<String>,

    /// e.g. "celsius" or "f".
    pub default_unit: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Load config from the platform location, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_optional(Self::config_file_path().as_deref())
    }

    /// No platform directory (e.g. no home) or no file at `path` both mean defaults.
    fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no platform config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(path)
    }

    /// Load config from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let cfg = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    /// Path to the config file, if the platform has a config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_provider_id(&self) -> Result<Option<ProviderId>, ConfigError> {
        self.default_provider.as_deref().map(str::parse).transpose()
    }

    pub fn default_unit(&self) -> Result<Option<Unit>, ConfigError> {
        self.default_unit.as_deref().map(str::parse).transpose()
    }

    /// Returns API key for a provider, if present and non-blank.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: ProviderId,
    pub api_key: String,
    pub default_unit: Unit,
}

impl Settings {
    /// Resolve settings from an environment lookup and the file config.
    ///
    /// Precedence: `provider` argument, then environment, then file, then defaults.
    /// Fails with [`ConfigError::MissingApiKey`] when the chosen provider has no key.
    pub fn resolve<F>(
        file: &Config,
        env: F,
        provider: Option<ProviderId>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match provider {
            Some(id) => id,
            None => match lookup(PROVIDER_ENV) {
                Some(value) => value.parse()?,
                None => file.default_provider_id()?.unwrap_or_default(),
            },
        };

        let default_unit = match lookup(UNIT_ENV) {
            Some(value) => value.parse()?,
            None => file.default_unit()?.unwrap_or_default(),
        };

        let env_var = provider.api_key_env();
        let api_key = lookup(env_var)
            .or_else(|| file.provider_api_key(provider).map(str::to_owned))
            .ok_or(ConfigError::MissingApiKey { provider, env_var })?;

        debug!(%provider, %default_unit, "resolved settings");

        Ok(Self {
            provider,
            api_key,
            default_unit,
        })
    }
}

/// Resolve settings against the process environment.
pub fn load_config(file: &Config, provider: Option<ProviderId>) -> Result<Settings, ConfigError> {
    Settings::resolve(file, |name| std::env::var(name).ok(), provider)
}
