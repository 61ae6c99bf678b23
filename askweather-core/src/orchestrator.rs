use anyhow::Result;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{
    chat::{AssistantReply, ChatMessage, ChatProvider, openai::OpenAiChat},
    config::Config,
    tool::{GET_WEATHER, GetWeatherArgs, ToolDefinition, get_weather_tool, lookup_content},
    weather::WeatherFetcher,
};

pub const NO_TOOL_CALL_MESSAGE: &str = "Model did not call the function.";

/// What a single question produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered without asking for weather data.
    NoToolCall,
    /// The model's final answer after seeing the tool result.
    Answer(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoToolCall => f.write_str(NO_TOOL_CALL_MESSAGE),
            Outcome::Answer(text) => f.write_str(text),
        }
    }
}

#[derive(Debug)]
enum Stage {
    AwaitingToolCall,
    AwaitingFinalAnswer,
    Done(Outcome),
}

/// Runs one tool-calling round trip: question, `get_weather`, final answer.
#[derive(Debug)]
pub struct ToolOrchestrator {
    chat: Box<dyn ChatProvider>,
    weather: WeatherFetcher,
    tools: Vec<ToolDefinition>,
}

impl ToolOrchestrator {
    pub fn new(chat: Box<dyn ChatProvider>, weather: WeatherFetcher) -> Self {
        Self { chat, weather, tools: vec![get_weather_tool()] }
    }

    /// Validates credentials before building any client.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let chat = OpenAiChat::from_config(config)?;
        let weather = WeatherFetcher::from_config(config)?;

        Ok(Self::new(Box::new(chat), weather))
    }

    pub fn user_prompt(city: &str, question: &str) -> String {
        format!("What's the weather like in {city} today? {question}")
    }

    pub async fn ask(&self, city: &str, question: &str) -> Result<Outcome> {
        let mut messages = vec![ChatMessage::user(Self::user_prompt(city, question))];
        let mut stage = Stage::AwaitingToolCall;

        loop {
            debug!(?stage, "Orchestrator step");
            stage = match stage {
                Stage::AwaitingToolCall => self.request_tool_call(&mut messages).await?,
                Stage::AwaitingFinalAnswer => self.request_answer(&messages).await?,
                Stage::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn request_tool_call(&self, messages: &mut Vec<ChatMessage>) -> Result<Stage> {
        let reply = self.chat.complete(messages, &self.tools).await?;

        let Some(call) = reply.tool_calls.first().cloned() else {
            info!("Model answered without calling {GET_WEATHER}");
            return Ok(Stage::Done(Outcome::NoToolCall));
        };

        if reply.tool_calls.len() > 1 {
            debug!(ignored = reply.tool_calls.len() - 1, "Only the first tool call is executed");
        }
        if call.function.name != GET_WEATHER {
            warn!(name = %call.function.name, "Unexpected tool name, running {GET_WEATHER}");
        }

        let args = GetWeatherArgs::parse(&call.function.arguments)?;
        info!(city = %args.city_name, "Model requested weather");

        let lookup = self.weather.fetch(&args.city_name).await?;
        let content = lookup_content(&lookup)?;

        // The echo carries only the executed call so every call id has a result.
        let echo = AssistantReply { content: reply.content, tool_calls: vec![call.clone()] };
        messages.push(echo.to_message());
        messages.push(ChatMessage::tool_result(call.id, content));

        Ok(Stage::AwaitingFinalAnswer)
    }

    async fn request_answer(&self, messages: &[ChatMessage]) -> Result<Stage> {
        let reply = self.chat.complete(messages, &self.tools).await?;
        Ok(Stage::Done(Outcome::Answer(reply.content.unwrap_or_default())))
    }
}
