use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{config::Config, model::Coordinates};

/// Resolves free-text city names through the OpenWeather direct geocoding API.
#[derive(Debug, Clone)]
pub struct Geocoder {
    api_key: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    lat: f64,
    lon: f64,
}

impl Geocoder {
    pub fn new(api_key: String, endpoint: String, http: Client) -> Self {
        Self { api_key, endpoint, http }
    }

    pub fn from_config(config: &Config, http: Client) -> Result<Self> {
        let api_key = config
            .weather_api_key()
            .ok_or_else(|| anyhow!("No OpenWeather API key configured"))?;

        Ok(Self::new(api_key.to_owned(), config.weather.geocoding_url.clone(), http))
    }

    /// Look up `city_name` as typed. `Ok(None)` means the provider had no match
    /// or refused the request; only transport and decoding faults are errors.
    pub async fn resolve(&self, city_name: &str) -> Result<Option<Coordinates>> {
        debug!(city = city_name, "Geocoding city");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city_name), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to OpenWeather (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            debug!(%status, "Geocoding request was not successful, treating as not found");
            return Ok(None);
        }

        let value: Value =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        // `null` and `{}` carry no match, same as `[]`.
        if value.is_null() || value.as_object().is_some_and(|o| o.is_empty()) {
            debug!(city = city_name, "Geocoding returned an empty body");
            return Ok(None);
        }

        let places: Vec<GeoPlace> =
            serde_json::from_value(value).context("Failed to parse OpenWeather geocoding JSON")?;

        let coords = places.into_iter().next().map(|p| Coordinates {
            latitude: p.lat,
            longitude: p.lon,
        });

        match coords {
            Some(c) => debug!(lat = c.latitude, lon = c.longitude, "Resolved city"),
            None => debug!(city = city_name, "Geocoding returned no matches"),
        }

        Ok(coords)
    }
}
