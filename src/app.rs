//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::model::Config;
use crate::service::session::ExaminerSession;
use crate::service::{AnalysisBackend, LlmClient, OpenAiBackend, StoryAnalysisService};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Story grading service
    pub analysis_service: Arc<StoryAnalysisService>,
    /// The single examiner session shown on the page
    pub session: Arc<Mutex<ExaminerSession>>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Requires OPENAI_API_KEY; the model comes from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        if api_key.trim().is_empty() {
            return Err(AppError::InvalidConfig("OPENAI_API_KEY is empty"));
        }

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let backend = Arc::new(OpenAiBackend::new(llm_client, config.llm.model.clone()));

        Ok(Self::with_backend(backend, config))
    }

    /// Build application state around an existing analysis backend
    pub fn with_backend(backend: Arc<dyn AnalysisBackend>, config: &Config) -> Self {
        let analysis_service = Arc::new(StoryAnalysisService::new(
            backend,
            &config.llm,
            config.analysis.clone(),
        ));

        Self {
            analysis_service,
            session: Arc::new(Mutex::new(ExaminerSession::default())),
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
