use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use paperweave_core::{ChatLlm, ChatRequest, ChatResponse, Message, PaperweaveError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiChatClient {
    base_url: String,
    api_key: SecretString,
    http: Client,
}

impl OpenAiChatClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, PaperweaveError> {
        // The HTTP layer gets a generous fixed deadline; per-call budgets are
        // enforced above this client by the timeout guard.
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| PaperweaveError::LlmProvider(err.to_string()))?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Reads `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL` override.
    pub fn from_env() -> Result<Self, PaperweaveError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            PaperweaveError::InvalidConfig("OPENAI_API_KEY is not set".to_string())
        })?;
        let client = Self::new(api_key)?;
        match std::env::var("OPENAI_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => Ok(client.with_base_url(base_url)),
            _ => Ok(client),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: String,
}

#[async_trait::async_trait]
impl ChatLlm for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, PaperweaveError> {
        let body = WireRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response: WireResponse = self
            .http
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| PaperweaveError::LlmProvider(err.to_string()))?
            .error_for_status()
            .map_err(|err| PaperweaveError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| PaperweaveError::LlmProvider(err.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PaperweaveError::LlmProvider("response had no choices".to_string()))?;

        Ok(ChatResponse {
            content: choice.message.content,
        })
    }
}
