use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{ArgAction, Parser, builder::NonEmptyStringValueParser};
use skycast_core::{
    Config, ConfigError, ProviderId, Settings, Unit, WeatherError, WeatherProvider,
    WeatherReading, fetch_weather, load_config, provider_from_settings,
};
use tracing::{debug, warn};

use crate::{exitcode, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather for a city")]
pub struct Cli {
    /// City name, e.g. "London" or "Paris,FR".
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub city: String,

    /// Temperature unit: celsius (c) or fahrenheit (f). Defaults to $SKYCAST_UNIT, then celsius.
    #[arg(short, long, visible_alias = "units")]
    pub unit: Option<Unit>,

    /// Provider: openweather, weatherapi or visualcrossing. Defaults to $SKYCAST_PROVIDER.
    #[arg(short, long)]
    pub provider: Option<ProviderId>,

    /// Config file to read instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Env file to load instead of ./.env.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Populate the process environment from an env file. Existing variables are kept.
    pub fn load_env_file(&self) -> anyhow::Result<()> {
        match &self.env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .with_context(|| format!("Failed to load env file: {}", path.display()))?;
                debug!(path = %path.display(), "loaded env file");
            }
            None => match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "loaded .env"),
                Err(e) if e.not_found() => debug!("no .env file"),
                Err(e) => warn!(error = %e, "ignoring unreadable .env file"),
            },
        }

        Ok(())
    }

    pub async fn run(self) -> ExitCode {
        match self.lookup().await {
            Ok(reading) => {
                println!("{}", output::format_success(&reading));
                ExitCode::SUCCESS
            }
            Err(err) => {
                debug!(error = ?err, "lookup failed");
                eprintln!("{}", output::format_error(&err));
                ExitCode::from(exitcode::for_error(&err))
            }
        }
    }

    async fn lookup(&self) -> Result<WeatherReading, WeatherError> {
        let file = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        self.lookup_with(&file, load_config, provider_from_settings).await
    }

    /// Resolve settings, then build the provider and query it. A configuration
    /// failure returns before the provider is ever constructed.
    async fn lookup_with<R, B>(
        &self,
        file: &Config,
        resolve: R,
        build: B,
    ) -> Result<WeatherReading, WeatherError>
    where
        R: FnOnce(&Config, Option<ProviderId>) -> Result<Settings, ConfigError>,
        B: FnOnce(&Settings) -> Box<dyn WeatherProvider>,
    {
        let settings = resolve(file, self.provider)?;
        let unit = self.unit.unwrap_or(settings.default_unit);
        let provider = build(&settings);

        fetch_weather(provider.as_ref(), &self.city, unit).await
    }
}
