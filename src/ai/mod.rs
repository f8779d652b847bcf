pub mod prompt;

use crate::core::config::ReconcilerConfig;
use crate::error::ReconcileError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// One completion request as the generation endpoint expects it.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    generated_text: Option<String>,
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// The external AI completion collaborator. Implementations suspend on
/// the network; failures are transport errors and propagate unchanged,
/// with no retry at this layer.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ReconcileError>;
}

/// `reqwest`-backed client for the generation endpoint. Understands
/// both the local service's `generated_text` shape and an OpenAI-style
/// `choices[0].text` fallback.
pub struct HttpCompletionClient {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl HttpCompletionClient {
    pub fn new(config: &ReconcilerConfig) -> Self {
        HttpCompletionClient {
            client: Client::new(),
            endpoint: config.completion_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ReconcileError> {
        log::debug!(
            "completion request to {} ({} prompt bytes, model {})",
            self.endpoint,
            request.prompt.len(),
            request.model
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: CompletionResponse = response.json().await?;
        let text = body
            .generated_text
            .or_else(|| body.choices.into_iter().next().map(|choice| choice.text))
            .unwrap_or_default();
        log::debug!("completion response: {} bytes", text.len());

        Ok(text)
    }
}
