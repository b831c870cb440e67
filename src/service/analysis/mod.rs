//! Story analysis service using LLM
//!
//! Builds the grading request, calls the remote model and turns its raw reply
//! into a validated [`AnalysisResult`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::{AnalysisConfig, AnalysisResult, LlmConfig};
use crate::service::analysis::converters::convert_analysis;
use crate::service::analysis::prompts::{AnalysisRequest, build_analysis_request};
use crate::service::analysis::validation::{parse_reply, validate_extracted_analysis};
use crate::service::llm::AnalysisBackend;

pub mod converters;
pub mod error;
pub mod prompts;
pub mod schema;
pub mod validation;

pub use error::{AnalysisError, USER_FACING_MESSAGE};

/// Service for grading stories
pub struct StoryAnalysisService {
    backend: Arc<dyn AnalysisBackend>,
    temperature: f64,
    config: AnalysisConfig,
}

impl StoryAnalysisService {
    pub fn new(backend: Arc<dyn AnalysisBackend>, llm: &LlmConfig, config: AnalysisConfig) -> Self {
        tracing::info!(
            model = %backend.model(),
            temperature = llm.temperature,
            max_attempts = config.max_attempts,
            segmentation = ?config.segmentation,
            "Story analysis service initialized"
        );

        Self {
            backend,
            temperature: llm.temperature,
            config,
        }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Grade a story
    ///
    /// Blank stories are rejected before any remote call is made.
    pub async fn analyze_story(&self, story: &str) -> Result<AnalysisResult, AnalysisError> {
        if story.trim().is_empty() {
            return Err(AnalysisError::EmptyStory);
        }

        let request = build_analysis_request(story, self.temperature);
        let raw = self.request_analysis(&request).await?;

        let extracted = parse_reply(&raw).inspect_err(|e| {
            tracing::error!(
                model = %self.model(),
                reply_length = raw.len(),
                kind = e.kind(),
                error = %e,
                "LLM reply could not be parsed"
            );
        })?;

        let validation = validate_extracted_analysis(&extracted, story, self.config.segmentation);

        if !validation.warnings.is_empty() {
            tracing::warn!(
                model = %self.model(),
                warnings = ?validation.warnings,
                "Story analysis produced quality warnings"
            );
        }

        if let Some(err) = validation.into_error() {
            tracing::error!(
                model = %self.model(),
                kind = err.kind(),
                error = %err,
                "Story analysis validation failed"
            );
            return Err(err);
        }

        let result = convert_analysis(extracted);

        tracing::debug!(
            total_score = result.total_score,
            segments = result.inline_feedback.len(),
            errors_flagged = result.error_count(),
            "Converted extracted analysis to domain model"
        );

        Ok(result)
    }

    /// Call the backend, retrying remote failures up to the configured attempts
    async fn request_analysis(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempt = 1;

        loop {
            let start_time = Instant::now();

            tracing::debug!(
                model = %self.model(),
                attempt = attempt,
                prompt_length = request.prompt.len(),
                "Initiating LLM call for story analysis"
            );

            let reply = self
                .backend
                .complete(request)
                .await
                .map_err(|e| AnalysisError::RemoteCall(e.to_string()));

            match reply {
                Ok(reply) => {
                    tracing::info!(
                        model = %self.model(),
                        attempt = attempt,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        prompt_length = request.prompt.len(),
                        reply_length = reply.len(),
                        "LLM call for story analysis completed successfully"
                    );
                    return Ok(reply);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    tracing::warn!(
                        model = %self.model(),
                        attempt = attempt,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        backoff_ms = backoff.as_millis(),
                        error = %e,
                        "LLM call for story analysis failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        model = %self.model(),
                        attempt = attempt,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        prompt_length = request.prompt.len(),
                        error = %e,
                        "LLM call for story analysis failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::model::{ErrorType, FeedbackSegment, SegmentationPolicy};
    use crate::service::llm::LlmError;

    pub const SCENARIO_STORY: &str =
        "When Pat opened the book, an old letter fell out of it. He saw a photo insde.";

    /// Backend replaying canned replies in order
    pub struct MockBackend {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
    }

    impl MockBackend {
        pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn replying(reply: impl Into<String>) -> Self {
            Self::new(vec![Ok(reply.into())])
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(LlmError::RequestFailed(
                "connection refused".to_string(),
            ))])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisBackend for MockBackend {
        async fn complete(&self, _request: &AnalysisRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::RequestFailed("no reply queued".to_string())))
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    pub fn scenario_reply() -> String {
        json!({
            "scores": {
                "content": 3,
                "communicativeAchievement": 3,
                "organization": 2,
                "language": 3
            },
            "totalScore": 11,
            "generalFeedback": "Relevant but very short.",
            "goodPoints": ["Starts with the given sentence"],
            "badPoints": ["The story needs more development"],
            "revisedText": "When Pat opened the book, an old letter fell out of it. He saw a photo inside.",
            "inlineFeedback": [
                {"text": "When Pat opened the book, an old letter fell out of it. He saw a photo ", "isError": false},
                {"text": "insde", "isError": true, "correction": "inside", "explanation": "spelling error", "type": "spelling"},
                {"text": ".", "isError": false}
            ]
        })
        .to_string()
    }

    pub fn service_with(backend: Arc<MockBackend>, config: AnalysisConfig) -> StoryAnalysisService {
        StoryAnalysisService::new(backend, &LlmConfig::default(), config)
    }

    #[tokio::test]
    async fn test_scenario_reply_is_converted() {
        let backend = Arc::new(MockBackend::replying(scenario_reply()));
        let service = service_with(backend.clone(), AnalysisConfig::default());

        let result = service.analyze_story(SCENARIO_STORY).await.unwrap();

        assert_eq!(backend.calls(), 1);
        assert_eq!(result.reconstructed_text(), SCENARIO_STORY);
        assert_eq!(result.total_score, 11);
        assert_eq!(
            result.inline_feedback[1],
            FeedbackSegment::error("insde", "inside", "spelling error", Some(ErrorType::Spelling))
        );
    }

    #[tokio::test]
    async fn test_blank_story_never_calls_backend() {
        let backend = Arc::new(MockBackend::replying(scenario_reply()));
        let service = service_with(backend.clone(), AnalysisConfig::default());

        for story in ["", "   ", "\n\t \n"] {
            let err = service.analyze_story(story).await.unwrap_err();
            assert!(matches!(err, AnalysisError::EmptyStory));
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_single_shot_by_default() {
        let backend = Arc::new(MockBackend::new(vec![
            Err(LlmError::RequestFailed("timeout".to_string())),
            Ok(scenario_reply()),
        ]));
        let service = service_with(backend.clone(), AnalysisConfig::default());

        let err = service.analyze_story(SCENARIO_STORY).await.unwrap_err();

        assert!(matches!(err, AnalysisError::RemoteCall(_)));
        assert!(err.is_transient());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_retried_when_configured() {
        let backend = Arc::new(MockBackend::new(vec![
            Err(LlmError::RequestFailed("timeout".to_string())),
            Ok(scenario_reply()),
        ]));
        let config = AnalysisConfig {
            max_attempts: 3,
            retry_backoff_ms: 0,
            ..AnalysisConfig::default()
        };
        let service = service_with(backend.clone(), config);

        let result = service.analyze_story(SCENARIO_STORY).await.unwrap();

        assert_eq!(result.total_score, 11);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_not_retried() {
        let backend = Arc::new(MockBackend::new(vec![
            Ok("not json".to_string()),
            Ok(scenario_reply()),
        ]));
        let config = AnalysisConfig {
            max_attempts: 3,
            retry_backoff_ms: 0,
            ..AnalysisConfig::default()
        };
        let service = service_with(backend.clone(), config);

        let err = service.analyze_story(SCENARIO_STORY).await.unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidJson(_)));
        assert!(err.is_malformed_reply());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_reply_for_different_story_is_rejected() {
        let backend = Arc::new(MockBackend::replying(scenario_reply()));
        let service = service_with(backend, AnalysisConfig::default());

        let err = service
            .analyze_story("When Pat opened the book, an old letter fell out of it.")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::SegmentationMismatch { .. }));
    }

    #[tokio::test]
    async fn test_reply_for_different_story_tolerated_by_policy() {
        let backend = Arc::new(MockBackend::replying(scenario_reply()));
        let config = AnalysisConfig {
            segmentation: SegmentationPolicy::Tolerate,
            ..AnalysisConfig::default()
        };
        let service = service_with(backend, config);

        let result = service
            .analyze_story("When Pat opened the book, an old letter fell out of it.")
            .await
            .unwrap();

        assert_eq!(result.inline_feedback.len(), 3);
    }
}
