//! Core library for the `askweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - OpenWeather geocoding and current-weather lookups
//! - A chat-completion client and the `get_weather` tool declaration
//! - The orchestrator that runs one tool-calling round trip
//!
//! It is used by `askweather-cli`, but can also be reused by other binaries or services.

pub mod chat;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod orchestrator;
pub mod tool;
pub mod weather;

#[cfg(test)]
mod test_support;

pub use chat::{AssistantReply, ChatMessage, ChatProvider, openai::OpenAiChat};
pub use config::Config;
pub use error::{ConfigError, WeatherError};
pub use geocoder::Geocoder;
pub use model::{Coordinates, WeatherLookup, WeatherReport};
pub use orchestrator::{Outcome, ToolOrchestrator};
pub use weather::WeatherFetcher;
