use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{Coordinate, DailySeries, FetchError, ForecastSeries, HourlySeries};

use super::{ForecastClient, endpoint, get_json};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";
const HOURLY_FIELDS: &str = "temperature_2m";

/// Daily and hourly temperature forecast from an Open-Meteo `/v1/forecast` endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    forecast_url: String,
    timezone: Option<String>,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            forecast_url: endpoint(base_url, "v1/forecast"),
            timezone: None,
        }
    }

    /// Ask for timestamps in `timezone` ("auto" = the location's own). Empty keeps GMT.
    pub fn with_timezone(mut self, timezone: &str) -> Self {
        let timezone = timezone.trim();
        self.timezone = (!timezone.is_empty()).then(|| timezone.to_string());
        self
    }

    async fn fetch_series(&self, coord: Coordinate, days: u32) -> Result<ForecastSeries> {
        let mut query = vec![
            ("latitude", coord.latitude.to_string()),
            ("longitude", coord.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("forecast_days", days.to_string()),
        ];
        if let Some(tz) = &self.timezone {
            query.push(("timezone", tz.clone()));
        }

        let request = self.http.get(&self.forecast_url).query(&query);
        let parsed: OmResponse = get_json(request, "Open-Meteo").await?;

        parsed.into_series()
    }
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    daily: OmDaily,
    #[serde(default)]
    hourly: Option<OmHourly>,
}

impl OmResponse {
    fn into_series(self) -> Result<ForecastSeries> {
        let daily = DailySeries::new(
            self.daily.time,
            self.daily.temperature_2m_min,
            self.daily.temperature_2m_max,
        )
        .context("Malformed Open-Meteo daily data")?;

        let hourly = self.hourly.map(|h| HourlySeries::new(h.time, h.temperature_2m));

        Ok(ForecastSeries { daily, hourly })
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    async fn fetch(&self, coord: Coordinate, days: u32) -> Result<ForecastSeries, FetchError> {
        tracing::debug!(lat = coord.latitude, lon = coord.longitude, days, "fetching forecast");

        let series = self
            .fetch_series(coord, days)
            .await
            .map_err(FetchError::transport)?;

        tracing::debug!(
            days = series.daily.len(),
            hourly = series.hourly.is_some(),
            "forecast received"
        );
        Ok(series)
    }
}
