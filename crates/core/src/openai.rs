//! Chat-completion client for article drafting.

use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::error::{MediaError, MediaResult};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Token counts reported by the generation service for one call.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: i64,
    #[serde(default)]
    pub completion_tokens: i64,
    #[serde(default)]
    pub total_tokens: i64,
}

/// One completed generation: the text, plus usage when the service
/// reported it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Thin client over the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::MissingConfig`] when no generation API key is
    /// configured.
    pub fn new(cfg: &CoreConfig) -> MediaResult<Self> {
        let api_key = cfg
            .openai_api_key
            .clone()
            .ok_or(MediaError::MissingConfig("OPENAI_API_KEY"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model: cfg.openai_model.clone(),
        })
    }

    /// Model name requests are made with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Requests one completion for a system/user prompt pair.
    ///
    /// An answer with no choices yields an empty completion text rather
    /// than an error; the converter downstream is total over any text.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::GenerationRequest`] on transport or decode
    /// failure and [`MediaError::GenerationStatus`] on a non-success
    /// response.
    pub async fn complete(&self, system: &str, user: &str) -> MediaResult<Completion> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.7,
            max_tokens: 4000,
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(MediaError::GenerationRequest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::GenerationStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(MediaError::GenerationRequest)?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion {
            text,
            usage: body.usage,
        })
    }
}
