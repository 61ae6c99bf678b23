use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::model::WeatherLookup;

pub const GET_WEATHER: &str = "get_weather";

/// A tool declaration in the chat-completion `tools` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Arguments the model must supply to `get_weather`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetWeatherArgs {
    pub city_name: String,
}

impl GetWeatherArgs {
    pub fn parse(arguments: &str) -> Result<Self> {
        serde_json::from_str(arguments)
            .with_context(|| format!("Invalid {GET_WEATHER} arguments: {arguments}"))
    }
}

pub fn get_weather_tool() -> ToolDefinition {
    ToolDefinition {
        kind: "function".to_string(),
        function: FunctionDefinition {
            name: GET_WEATHER.to_string(),
            description: "Get current temperature for a given city.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "city_name": { "type": "string" }
                },
                "required": ["city_name"]
            }),
        },
    }
}

/// Tool message content: the report itself, or `{"error": "..."}`.
pub fn lookup_content(lookup: &WeatherLookup) -> Result<String> {
    let value = match lookup {
        Ok(report) => serde_json::to_value(report).context("Failed to serialize weather report")?,
        Err(err) => json!({ "error": err.to_string() }),
    };
    Ok(value.to_string())
}
