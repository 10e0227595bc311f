//! OpenAI adapter (chat completions).
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint and maps every
//! failure into the closed `CompletionErrorKind` set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use telebot_core::{
    config::{Config, DEFAULT_OPENAI_BASE_URL},
    errors::Error,
    model::{
        client::CompletionClient,
        types::{CompletionError, CompletionErrorKind, CompletionRequest, CompletionResult},
    },
    Result,
};

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("openai client build failed: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(cfg.openai_api_key.clone(), cfg.openai_timeout)?
            .with_base_url(cfg.openai_base_url()))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn provider(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, req: CompletionRequest) -> CompletionResult<String> {
        let body = ChatCompletionBody {
            model: &req.model,
            messages: [ChatMessage {
                role: "user",
                content: &req.prompt,
            }],
            temperature: req.temperature,
            max_tokens: req.max_output_tokens,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::new(
                classify_status(status),
                format!(
                    "openai request failed: {status} {}",
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                classify_transport_error(e)
            } else {
                CompletionError::new(
                    CompletionErrorKind::MalformedResponse,
                    format!("openai json error: {e}"),
                )
            }
        })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(CompletionError::new(
                CompletionErrorKind::MalformedResponse,
                "openai response has no choices",
            ));
        };

        let text = choice.message.content.unwrap_or_default();
        debug!(model = %req.model, chars = text.chars().count(), "openai completion received");
        Ok(text)
    }
}

fn classify_transport_error(e: reqwest::Error) -> CompletionError {
    let kind = if e.is_timeout() {
        CompletionErrorKind::Timeout
    } else if e.is_builder() {
        CompletionErrorKind::InvalidRequest
    } else {
        CompletionErrorKind::Network
    };
    CompletionError::new(kind, format!("openai request error: {e}"))
}

fn classify_status(status: StatusCode) -> CompletionErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionErrorKind::Authentication,
        StatusCode::TOO_MANY_REQUESTS => CompletionErrorKind::RateLimited,
        s if s.is_server_error() => CompletionErrorKind::Provider,
        s if s.is_client_error() => CompletionErrorKind::InvalidRequest,
        _ => CompletionErrorKind::Provider,
    }
}
