//! Drives geocode → forecast → aggregation and publishes a single `FetchState`.
//!
//! The orchestrator owns the only `watch::Sender`; consumers get receivers and
//! can never write. Every call bumps a generation counter, and a terminal
//! state is published only while its call is still the latest one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    Config, FetchError, FetchState, ForecastDay,
    aggregate::aggregate,
    model::validate_days,
    provider::{ForecastClient, GeocodeClient, clients_from_config},
};

#[derive(Debug)]
pub struct ForecastOrchestrator {
    geocoder: Arc<dyn GeocodeClient>,
    forecaster: Arc<dyn ForecastClient>,
    state: watch::Sender<FetchState>,
    generation: AtomicU64,
}

impl ForecastOrchestrator {
    pub fn new(geocoder: Arc<dyn GeocodeClient>, forecaster: Arc<dyn ForecastClient>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            geocoder,
            forecaster,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Orchestrator backed by the HTTP clients configured in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (geocoder, forecaster) = clients_from_config(config)?;
        Ok(Self::new(geocoder, forecaster))
    }

    /// Read-only view of the state; sees every transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Run the whole pipeline for `city`, publishing `Loading` and then
    /// exactly one terminal state (unless a newer call has superseded this one).
    pub async fn fetch_weather(&self, city: &str, days: u32) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(FetchState::Loading);

        let next = match self.run(city, days).await {
            Ok(forecast) => FetchState::Success(forecast),
            Err(err) => FetchState::Error(err.to_string()),
        };

        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        });

        if !published {
            tracing::debug!(city, generation, "dropping result of superseded fetch");
        }
    }

    /// Start `fetch_weather` on the runtime and return immediately.
    pub fn spawn_fetch(self: &Arc<Self>, city: impl Into<String>, days: u32) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let city = city.into();
        tokio::spawn(async move { this.fetch_weather(&city, days).await })
    }

    async fn run(&self, city: &str, days: u32) -> Result<Vec<ForecastDay>, FetchError> {
        let days = validate_days(days)?;

        let coord = self.geocoder.resolve(city).await?;
        let series = self.forecaster.fetch(coord, days).await?;

        let hourly = series.hourly.as_ref();
        let forecast: Vec<ForecastDay> = series
            .daily
            .days()
            .map(|(date, min, max)| aggregate(date, min, max, hourly))
            .collect();

        tracing::info!(city, days = forecast.len(), "forecast ready");
        Ok(forecast)
    }
}
