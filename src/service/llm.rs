//! Shared LLM client and the remote analysis boundary
//!
//! The analysis service talks to the grading model only through
//! [`AnalysisBackend`], so tests can substitute an in-memory reply.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::service::analysis::prompts::AnalysisRequest;

/// Error type for the remote model call
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
}

/// Remote service that grades a story and replies with raw JSON text
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Submit the request and return the model's raw reply
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key)
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying OpenAI client
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}

/// [`AnalysisBackend`] backed by an OpenAI chat model
pub struct OpenAiBackend {
    llm_client: LlmClient,
    model: String,
}

impl OpenAiBackend {
    pub fn new(llm_client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for OpenAiBackend {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, LlmError> {
        let agent = self
            .llm_client
            .openai_client()
            .agent(&self.model)
            .preamble(&request.preamble)
            .temperature(request.temperature)
            .build();

        agent
            .prompt(request.prompt.as_str())
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
