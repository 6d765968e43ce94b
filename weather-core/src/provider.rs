use crate::{
    Config, Coordinate, FetchError, ForecastSeries,
    provider::{nominatim::NominatimGeocoder, openmeteo::OpenMeteoClient},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod nominatim;
pub mod openmeteo;

/// Resolves a free-text city name to coordinates.
#[async_trait]
pub trait GeocodeClient: Send + Sync + Debug {
    /// First match in the service's own ranking, `FetchError::NotFound` when
    /// there is none, `FetchError::Transport` on network or parse failure.
    async fn resolve(&self, city: &str) -> Result<Coordinate, FetchError>;
}

/// Fetches `days` days of daily min/max and hourly temperatures.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn fetch(&self, coord: Coordinate, days: u32) -> Result<ForecastSeries, FetchError>;
}

/// Construct both HTTP clients from config.
pub fn clients_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn GeocodeClient>, Arc<dyn ForecastClient>)> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.geocoder.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;

    let geocoder = NominatimGeocoder::new(http.clone(), &config.geocoder.base_url);
    let forecast = OpenMeteoClient::new(http, &config.forecast.base_url)
        .with_timezone(config.forecast.timezone.as_str());

    Ok((Arc::new(geocoder), Arc::new(forecast)))
}

/// Send a prepared request and decode a successful JSON body.
async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    service: &str,
) -> anyhow::Result<T> {
    let res = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {service}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {service} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{service} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {service} JSON"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(endpoint("http://h/", "/search"), "http://h/search");
        assert_eq!(endpoint("http://h", "v1/forecast"), "http://h/v1/forecast");
    }

    #[test]
    fn clients_from_default_config() {
        let cfg = Config::default();
        assert!(clients_from_config(&cfg).is_ok());
    }
}
