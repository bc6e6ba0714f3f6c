//! Text-generation collaborator used for slogans.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::dao::error::{LookupError, LookupResult};

/// Abstraction over a free-text generator.
pub trait SloganWriter: Send + Sync {
    /// Produce free text for `prompt`.
    fn write(&self, prompt: &str) -> BoxFuture<'static, LookupResult<String>>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatSloganWriter {
    client: Client,
    endpoint: Arc<str>,
    model: Arc<str>,
    api_key: Arc<str>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
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
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

impl ChatSloganWriter {
    /// Build a writer posting to `endpoint` with bearer `api_key`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LookupError::ClientBuilder { source })?;
        Ok(Self {
            client,
            endpoint: Arc::<str>::from(endpoint.into()),
            model: Arc::<str>::from(model.into()),
            api_key: Arc::<str>::from(api_key.into()),
        })
    }

    async fn complete(&self, prompt: String) -> LookupResult<String> {
        let url = self.endpoint.to_string();
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: 40,
            temperature: 0.8,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.as_ref())
            .json(&request)
            .send()
            .await
            .map_err(|source| LookupError::RequestSend {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(LookupError::RequestStatus {
                url,
                status: response.status(),
            });
        }

        let payload = response
            .json::<ChatResponse>()
            .await
            .map_err(|source| LookupError::DecodeResponse {
                url: url.clone(),
                source,
            })?;

        payload
            .choices
            .into_iter()
            .map(|choice| choice.message.content.trim().to_string())
            .find(|content| !content.is_empty())
            .ok_or(LookupError::Empty { url })
    }
}

impl SloganWriter for ChatSloganWriter {
    fn write(&self, prompt: &str) -> BoxFuture<'static, LookupResult<String>> {
        let writer = self.clone();
        let prompt = prompt.to_string();
        Box::pin(async move { writer.complete(prompt).await })
    }
}
