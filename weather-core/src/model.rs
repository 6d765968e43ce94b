use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Smallest and largest number of forecast days the pipeline accepts.
pub const MIN_FORECAST_DAYS: u32 = 1;
pub const MAX_FORECAST_DAYS: u32 = 14;

/// Reject a day count outside `MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS`.
pub fn validate_days(days: u32) -> Result<u32, FetchError> {
    if (MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(FetchError::Validation(format!(
            "Invalid number of days: {days} (expected {MIN_FORECAST_DAYS}..={MAX_FORECAST_DAYS})"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Daily min/max series; index `i` of every vector refers to the same calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<String>,
    temp_min: Vec<f64>,
    temp_max: Vec<f64>,
}

impl DailySeries {
    pub fn new(
        dates: Vec<String>,
        temp_min: Vec<f64>,
        temp_max: Vec<f64>,
    ) -> anyhow::Result<Self> {
        if dates.len() != temp_min.len() || dates.len() != temp_max.len() {
            anyhow::bail!(
                "daily series length mismatch: {} dates, {} minimums, {} maximums",
                dates.len(),
                temp_min.len(),
                temp_max.len()
            );
        }

        Ok(Self { dates, temp_min, temp_max })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(date, min, max)` for each day, in service order.
    pub fn days(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(&self.temp_min)
            .zip(&self.temp_max)
            .map(|((date, min), max)| (date.as_str(), *min, *max))
    }
}

/// Hourly temperature samples keyed by local `YYYY-MM-DDTHH:MM` timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    timestamps: Vec<String>,
    temperature: Vec<f64>,
}

impl HourlySeries {
    /// Arrays of different lengths are kept as-is; a timestamp without a
    /// temperature only spoils the day it belongs to.
    pub fn new(timestamps: Vec<String>, temperature: Vec<f64>) -> Self {
        Self { timestamps, temperature }
    }

    /// Each timestamp with its temperature, `None` where the temperature array ran short.
    pub fn samples(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.timestamps
            .iter()
            .enumerate()
            .map(|(i, timestamp)| (timestamp.as_str(), self.temperature.get(i).copied()))
    }
}

/// Everything the forecast service returns for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub daily: DailySeries,
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub display_date: String,
    pub morning_temp: f64,
    pub day_temp: f64,
    pub evening_temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// The observable outcome of the most recent `fetch_weather` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<ForecastDay>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// `true` for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Success(_) | FetchState::Error(_))
    }
}
