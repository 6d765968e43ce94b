//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration (service endpoints, timeouts, default day count)
//! - Geocoding and forecast clients behind async traits
//! - Per-day morning/day/evening aggregation of hourly temperatures
//! - The orchestrator that runs the pipeline and publishes a single `FetchState`
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;

pub use config::{Config, ForecastConfig, GeocoderConfig};
pub use error::FetchError;
pub use model::{
    Coordinate, DailySeries, FetchState, ForecastDay, ForecastSeries, HourlySeries,
    MAX_FORECAST_DAYS, MIN_FORECAST_DAYS,
};
pub use orchestrator::ForecastOrchestrator;
pub use provider::{ForecastClient, GeocodeClient};
