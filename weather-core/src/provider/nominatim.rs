use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{Coordinate, FetchError};

use super::{GeocodeClient, endpoint, get_json};

/// Forward geocoding against a Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            search_url: endpoint(base_url, "search"),
        }
    }

    async fn search(&self, city: &str) -> Result<Vec<NmPlace>> {
        let request = self
            .http
            .get(&self.search_url)
            .query(&[("city", city), ("format", "json")]);

        get_json(request, "Nominatim").await
    }
}

/// Nominatim sends coordinates as strings; other geocoders send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NmDegrees {
    Number(f64),
    Text(String),
}

impl NmDegrees {
    fn to_f64(&self) -> Result<f64> {
        match self {
            NmDegrees::Number(value) => Ok(*value),
            NmDegrees::Text(text) => text
                .trim()
                .parse()
                .with_context(|| format!("Invalid coordinate '{text}' in Nominatim response")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: NmDegrees,
    lon: NmDegrees,
}

#[async_trait]
impl GeocodeClient for NominatimGeocoder {
    async fn resolve(&self, city: &str) -> Result<Coordinate, FetchError> {
        tracing::debug!(city, "geocoding city");

        let places = self.search(city).await.map_err(FetchError::transport)?;
        let Some(best) = places.first() else {
            tracing::info!(city, "geocoder returned no matches");
            return Err(FetchError::NotFound);
        };

        let coord = Coordinate {
            latitude: best.lat.to_f64().map_err(FetchError::transport)?,
            longitude: best.lon.to_f64().map_err(FetchError::transport)?,
        };

        tracing::debug!(city, lat = coord.latitude, lon = coord.longitude, "resolved city");
        Ok(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_accept_strings_and_numbers() {
        let places: Vec<NmPlace> = serde_json::from_str(
            r#"[{"lat": "48.8566", "lon": 2.3522, "display_name": "Paris"}]"#,
        )
        .unwrap();

        assert_eq!(places[0].lat.to_f64().unwrap(), 48.8566);
        assert_eq!(places[0].lon.to_f64().unwrap(), 2.3522);
    }

    #[test]
    fn unparseable_degrees_are_errors() {
        let err = NmDegrees::Text("north".into()).to_f64().unwrap_err();
        assert!(err.to_string().contains("Invalid coordinate 'north'"));
    }
}
