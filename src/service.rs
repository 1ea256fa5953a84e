//! Chat-completions transport shared by visual analysis and synthesis.
//!
//! Speaks the OpenAI-compatible wire shape: a `messages` array of content
//! blocks, bearer-token auth, and a `choices[0].message.content` envelope on
//! the way back.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::error::Result;

pub const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service credential is not configured")]
    Unconfigured,
    #[error("service returned {0}")]
    Status(u16),
    #[error("service transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service response carried no message content")]
    MissingContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

impl ChatMessage {
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: vec![ContentBlock::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentBlock::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    config: ServiceConfig,
}

impl ServiceClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Underlying HTTP client, shared with page fetching.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            COMPLETIONS_PATH
        )
    }

    /// Send one completion request and return the assistant's text.
    ///
    /// A body that is not a JSON envelope at all is returned verbatim so
    /// callers can still attempt tolerant parsing.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, ServiceError> {
        let key = self.config.credential().ok_or(ServiceError::Unconfigured)?;
        let request = ChatRequest {
            model,
            messages,
            temperature: 0.2,
        };

        let start = std::time::Instant::now();
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            model,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            body_len = body.len(),
            "chat completion finished"
        );

        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(root) => assistant_content(&root).ok_or(ServiceError::MissingContent),
            Err(_) => Ok(body),
        }
    }
}

/// `choices[0].message.content`, accepting either a string or an array of
/// text parts.
pub fn assistant_content(root: &Value) -> Option<String> {
    let content = root
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?;
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let joined: String = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
