use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A resolved place on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for a city, as handed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub description: String,
}

/// Outcome of a weather lookup: either a report or the reason there is none.
pub type WeatherLookup = Result<WeatherReport, WeatherError>;
