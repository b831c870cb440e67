//! Examiner session state
//!
//! One explicit record holds everything the page shows: the story being
//! edited and the phase of the current analysis. Every analysis is tagged with
//! a request id so a completion that no longer matches the in-flight request
//! is discarded instead of overwriting newer state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::AnalysisResult;
use crate::service::analysis::{AnalysisError, USER_FACING_MESSAGE};

/// Story the page is pre-populated with
pub const SAMPLE_STORY: &str = "When Pat opened the book, an old letter fell out of it. There was his dad wrote that and had 35231.2 pounds in it.

 He saw the letter, that about \u{201c}How are you today\u{ff1f}There are some money, you have to take care of you by yourself.\u{201d}

Pat was very sad so he wrote a letter.

Hi dad,
  Well...... I was fine. Look! I married her last year, now I had a son, which was cute. I knew you couldn\u{2019}t saw that. Secondly could take care of my parents by myself.

I was very missed you. Could you come back? No, I knew you couldn\u{2019}t.
Love,
Pat";

/// Result of the last successful analysis, with the text it was produced for
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedAnalysis {
    pub request_id: u64,
    pub analyzed_story: String,
    pub completed_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

/// Where the session is in the analyze cycle
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        request_id: u64,
    },
    Ready(Box<CompletedAnalysis>),
    Failed {
        message: String,
    },
}

/// An analysis the caller must run and report back through [`ExaminerSession::complete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub request_id: u64,
    pub story: String,
}

/// What happened to a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The completion belonged to a superseded request
    Discarded,
}

/// Session state for the examiner page
#[derive(Debug, Clone)]
pub struct ExaminerSession {
    story: String,
    phase: Phase,
    next_request_id: u64,
}

impl Default for ExaminerSession {
    fn default() -> Self {
        Self::new(SAMPLE_STORY)
    }
}

impl ExaminerSession {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            phase: Phase::Idle,
            next_request_id: 1,
        }
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Replace the story text; allowed in every phase, including while loading
    pub fn edit_story(&mut self, story: impl Into<String>) {
        self.story = story.into();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn completed(&self) -> Option<&CompletedAnalysis> {
        match &self.phase {
            Phase::Ready(completed) => Some(completed),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.completed().map(|c| &c.result)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// True when the story was edited after the shown result was produced
    pub fn is_stale(&self) -> bool {
        self.completed()
            .is_some_and(|c| c.analyzed_story != self.story)
    }

    /// Enter Loading for the current story
    ///
    /// Returns `None` and leaves the state untouched when the story is blank
    /// or an analysis is already in flight. Any previous result or error is
    /// discarded.
    pub fn begin_analysis(&mut self) -> Option<PendingAnalysis> {
        if self.story.trim().is_empty() || self.is_loading() {
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.phase = Phase::Loading { request_id };

        Some(PendingAnalysis {
            request_id,
            story: self.story.clone(),
        })
    }

    /// Apply the outcome of a pending analysis
    pub fn complete(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Completion {
        match self.phase {
            Phase::Loading { request_id } if request_id == pending.request_id => {}
            _ => {
                tracing::debug!(
                    request_id = pending.request_id,
                    "Discarding completion for superseded analysis request"
                );
                return Completion::Discarded;
            }
        }

        self.phase = match outcome {
            Ok(result) => Phase::Ready(Box::new(CompletedAnalysis {
                request_id: pending.request_id,
                analyzed_story: pending.story,
                completed_at: Utc::now(),
                result,
            })),
            Err(e) => {
                tracing::warn!(
                    request_id = pending.request_id,
                    kind = e.kind(),
                    error = %e,
                    "Story analysis failed"
                );
                Phase::Failed {
                    message: USER_FACING_MESSAGE.to_string(),
                }
            }
        };

        Completion::Applied
    }
}
