//! Error types for story analysis

use thiserror::Error;

/// Message shown on the page for any failed analysis
pub const USER_FACING_MESSAGE: &str =
    "Failed to analyze the story. Please ensure your API key is valid and try again.";

/// Error type for story analysis
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Story is empty")]
    EmptyStory,

    #[error("LLM analysis failed: {0}")]
    RemoteCall(String),

    #[error("LLM returned an empty reply")]
    EmptyReply,

    #[error("LLM reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Malformed upstream reply: {}", .0.join("; "))]
    MalformedReply(Vec<String>),

    #[error("Segments do not reconstruct the story (first difference at byte {offset})")]
    SegmentationMismatch { offset: usize },
}

impl AnalysisError {
    /// Failures worth another attempt under a retry policy
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::RemoteCall(_))
    }

    /// True when the remote call succeeded but its reply could not be used
    pub fn is_malformed_reply(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyReply
                | AnalysisError::InvalidJson(_)
                | AnalysisError::MalformedReply(_)
                | AnalysisError::SegmentationMismatch { .. }
        )
    }

    /// Short identifier for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::EmptyStory => "empty_story",
            AnalysisError::RemoteCall(_) => "remote_call",
            AnalysisError::EmptyReply => "empty_reply",
            AnalysisError::InvalidJson(_) => "invalid_json",
            AnalysisError::MalformedReply(_) => "malformed_reply",
            AnalysisError::SegmentationMismatch { .. } => "segmentation_mismatch",
        }
    }
}
