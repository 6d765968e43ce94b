use std::{io, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text, validator::Validation};
use tokio::{sync::watch, task::JoinHandle};
use weather_core::{
    Config, FetchState, ForecastDay, ForecastOrchestrator, MAX_FORECAST_DAYS, MIN_FORECAST_DAYS,
};

use crate::render;

/// Used when neither `--days` nor the config file set a day count.
const FALLBACK_DAYS: u32 = 3;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit service endpoints and defaults.
    Configure,

    /// Show the morning/day/evening forecast for a city.
    Show {
        /// City name, e.g. "Paris".
        #[arg(value_parser = non_blank)]
        city: String,

        /// Number of forecast days (1-14); defaults to the configured value.
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=14))]
        days: Option<u32>,
    },
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("city name must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, days } => show(city, days).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let days = CustomType::<u32>::new("Default number of forecast days:")
        .with_default(config.default_days.unwrap_or(FALLBACK_DAYS))
        .with_error_message("Please enter a whole number")
        .with_validator(|days: &u32| {
            if (MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(days) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Forecast days must be between 1 and 14".into()))
            }
        })
        .prompt()?;
    config.set_default_days(days)?;

    config.forecast.timezone =
        Text::new("Forecast timezone (\"auto\", an IANA name, or empty for GMT):")
            .with_default(&config.forecast.timezone)
            .prompt()?;

    config.geocoder.base_url = Text::new("Geocoding service URL:")
        .with_default(&config.geocoder.base_url)
        .prompt()?;

    config.forecast.base_url = Text::new("Forecast service URL:")
        .with_default(&config.forecast.base_url)
        .prompt()?;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(city: String, days: Option<u32>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let days = days.or(config.default_days).unwrap_or(FALLBACK_DAYS);

    let orchestrator = Arc::new(ForecastOrchestrator::from_config(&config)?);
    let mut state = orchestrator.subscribe();

    tracing::debug!(%city, days, "starting fetch");
    let fetch = orchestrator.spawn_fetch(city, days);

    let forecast = follow_fetch(&mut state, fetch).await?;
    render::render_forecast(&mut io::stdout().lock(), &forecast)?;

    Ok(())
}

/// Wait for the fetch to settle, or for its task to end without settling.
async fn follow_fetch(
    state: &mut watch::Receiver<FetchState>,
    mut fetch: JoinHandle<()>,
) -> anyhow::Result<Vec<ForecastDay>> {
    let settled = tokio::select! {
        settled = wait_for_result(state) => settled,
        joined = &mut fetch => {
            joined.context("Forecast task panicked")?;
            settled_outcome(&state.borrow())
        }
    };

    // anyhow prints this as "Error: <message>".
    settled.map_err(anyhow::Error::msg)
}

fn settled_outcome(state: &FetchState) -> Result<Vec<ForecastDay>, String> {
    match state {
        FetchState::Success(days) => Ok(days.clone()),
        FetchState::Error(message) => Err(message.clone()),
        FetchState::Idle | FetchState::Loading => {
            Err("Forecast pipeline stopped unexpectedly".to_string())
        }
    }
}

/// Follow state transitions until the fetch settles.
async fn wait_for_result(
    state: &mut watch::Receiver<FetchState>,
) -> Result<Vec<ForecastDay>, String> {
    loop {
        if state.changed().await.is_err() {
            return Err("Forecast pipeline stopped unexpectedly".to_string());
        }

        let current = state.borrow_and_update();
        if current.is_terminal() {
            return settled_outcome(&current);
        }
        if current.is_loading() {
            eprintln!("Loading forecast...");
        }
    }
}
