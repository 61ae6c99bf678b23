use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::Config, tool::ToolDefinition};

use super::{AssistantReply, ChatMessage, ChatProvider, ToolCall};

/// Chat-completion client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    api_key: String,
    base_url: String,
    model: String,
    http: Client,
}

impl OpenAiChat {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self { api_key, base_url, model, http: Client::new() }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .chat_api_key()
            .ok_or_else(|| anyhow!("No chat-completion API key configured"))?;

        Ok(Self::new(api_key.to_owned(), config.chat.base_url.clone(), config.chat.model.clone()))
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
        };
        debug!(model = %self.model, messages = messages.len(), "Sending chat completion");

        let res = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read chat completion response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Chat completion request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).context("Failed to parse chat completion JSON")?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Chat completion response contained no choices"))?
            .message;

        let reply = AssistantReply {
            content: message.content,
            tool_calls: message.tool_calls.unwrap_or_default(),
        };
        debug!(tool_calls = reply.tool_calls.len(), "Received chat completion");

        Ok(reply)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
