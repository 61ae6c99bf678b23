use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::WeatherError,
    geocoder::Geocoder,
    model::{WeatherLookup, WeatherReport},
};

/// Geocodes a city and fetches its current conditions from OpenWeather.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    geocoder: Geocoder,
    api_key: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl WeatherFetcher {
    pub fn new(geocoder: Geocoder, api_key: String, endpoint: String, http: Client) -> Self {
        Self { geocoder, api_key, endpoint, http }
    }

    /// Build a fetcher and its geocoder from config, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::new();
        let geocoder = Geocoder::from_config(config, http.clone())?;
        let api_key = config
            .weather_api_key()
            .ok_or_else(|| anyhow!("No OpenWeather API key configured"))?;

        Ok(Self::new(geocoder, api_key.to_owned(), config.weather.weather_url.clone(), http))
    }

    /// The outer `Result` carries transport faults; the inner one is the
    /// lookup outcome that gets reported back to the model.
    pub async fn fetch(&self, city_name: &str) -> Result<WeatherLookup> {
        let Some(coords) = self.geocoder.resolve(city_name).await? else {
            info!(city = city_name, "City not found");
            return Ok(Err(WeatherError::CityNotFound { city: city_name.to_string() }));
        };

        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            info!(%status, city = city_name, "OpenWeather current request failed");
            return Ok(Err(WeatherError::ProviderFailed { city: city_name.to_string() }));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("Unknown");

        let report = WeatherReport {
            city: capitalize_first(city_name),
            temperature_celsius: parsed.main.temp,
            temperature_fahrenheit: celsius_to_fahrenheit(parsed.main.temp),
            description: capitalize_first(description),
        };
        debug!(?report, "Fetched current weather");

        Ok(Ok(report))
    }
}

/// `c * 9/5 + 32`, rounded to one decimal place, halves away from zero.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    ((celsius * 9.0 / 5.0 + 32.0) * 10.0).round() / 10.0
}

/// Uppercase the first character and leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::OpenWeatherFixture;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn fetcher_for(fixture: &OpenWeatherFixture) -> WeatherFetcher {
        let cfg = fixture.start().await;
        WeatherFetcher::from_config(&cfg).expect("keys configured")
    }

    #[test]
    fn fahrenheit_conversion() {
        assert_eq!(celsius_to_fahrenheit(20.0), 68.0);
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_fahrenheit(15.0), 59.0);
        assert_eq!(celsius_to_fahrenheit(21.37), 70.5);
    }

    #[test]
    fn capitalizes_first_character_only() {
        assert_eq!(capitalize_first("clear sky"), "Clear sky");
        assert_eq!(capitalize_first("new york"), "New york");
        assert_eq!(capitalize_first("sAN jose"), "SAN jose");
        assert_eq!(capitalize_first("ödeshög"), "Ödeshög");
        assert_eq!(capitalize_first(""), "");
    }

    #[tokio::test]
    async fn paris_light_rain() {
        let fixture = OpenWeatherFixture::city(48.8566, 2.3522, 15.0, "light rain");
        let fetcher = fetcher_for(&fixture).await;

        let lookup = fetcher.fetch("Paris").await.expect("no transport fault");

        assert_eq!(
            lookup,
            Ok(WeatherReport {
                city: "Paris".into(),
                temperature_celsius: 15.0,
                temperature_fahrenheit: 59.0,
                description: "Light rain".into(),
            })
        );
        assert_eq!(fixture.geo_hits(), 1);
        assert_eq!(fixture.weather_hits(), 1);
    }

    #[tokio::test]
    async fn unknown_city_skips_weather_call() {
        let mut fixture = OpenWeatherFixture::city(0.0, 0.0, 0.0, "");
        fixture.geo_body = json!([]);
        let fetcher = fetcher_for(&fixture).await;

        let err = fetcher.fetch("Atlantis").await.expect("no transport fault").unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert_eq!(err, WeatherError::CityNotFound { city: "Atlantis".into() });
        assert_eq!(fixture.weather_hits(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let mut fixture = OpenWeatherFixture::city(52.52, 13.405, 0.0, "");
        fixture.weather_status = StatusCode::INTERNAL_SERVER_ERROR;
        fixture.weather_body = json!({ "cod": 500 });
        let fetcher = fetcher_for(&fixture).await;

        let err = fetcher.fetch("Berlin").await.expect("no transport fault").unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch weather data for 'Berlin'.");
    }

    #[tokio::test]
    async fn lowercase_city_is_capitalized_in_report() {
        let fixture = OpenWeatherFixture::city(40.7128, -74.006, -3.5, "broken clouds");
        let fetcher = fetcher_for(&fixture).await;

        let report = fetcher.fetch("new york").await.expect("no fault").expect("found");

        assert_eq!(report.city, "New york");
        assert_eq!(report.description, "Broken clouds");
        assert_eq!(report.temperature_fahrenheit, 25.7);
    }

    #[tokio::test]
    async fn missing_description_falls_back() {
        let mut fixture = OpenWeatherFixture::city(1.0, 1.0, 10.0, "");
        fixture.weather_body = json!({ "main": { "temp": 10.0 }, "weather": [] });
        let fetcher = fetcher_for(&fixture).await;

        let report = fetcher.fetch("Oslo").await.expect("no fault").expect("found");

        assert_eq!(report.description, "Unknown");
    }

    #[test]
    fn from_config_requires_weather_key() {
        let err = WeatherFetcher::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key"));
    }
}
