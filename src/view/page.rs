//! Askama template struct for the examiner page

use askama::Template;

use crate::model::AnalysisResult;
use crate::model::analysis::MAX_TOTAL_SCORE;
use crate::service::analysis::prompts::TASK_OPENING_SENTENCE;
use crate::service::session::ExaminerSession;
use crate::view::marking::{SegmentView, marking_traces};
use crate::view::scores::{ScoreItemView, score_items};

/// Everything shown once an analysis succeeded
pub struct ResultView {
    pub total_score: u8,
    pub max_total: u8,
    pub score_items: Vec<ScoreItemView>,
    pub segments: Vec<SegmentView>,
    pub good_points: Vec<String>,
    pub bad_points: Vec<String>,
    pub revised_text: String,
    pub general_feedback: String,
}

impl ResultView {
    pub fn new(result: &AnalysisResult) -> Self {
        Self {
            total_score: result.total_score,
            max_total: MAX_TOTAL_SCORE,
            score_items: score_items(&result.scores),
            segments: marking_traces(&result.inline_feedback),
            good_points: result.good_points.clone(),
            bad_points: result.bad_points.clone(),
            revised_text: result.revised_text.clone(),
            general_feedback: result.general_feedback.clone(),
        }
    }
}

/// The single examiner screen
#[derive(Template)]
#[template(path = "index.html")]
pub struct ExaminerPage {
    pub story: String,
    pub word_count: usize,
    pub task_sentence: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub stale: bool,
    pub result: Option<ResultView>,
    pub model: String,
}

impl ExaminerPage {
    pub fn from_session(session: &ExaminerSession, model: &str) -> Self {
        Self {
            story: session.story().to_string(),
            word_count: word_count(session.story()),
            task_sentence: TASK_OPENING_SENTENCE,
            loading: session.is_loading(),
            error: session.error().map(str::to_string),
            stale: session.is_stale(),
            result: session.result().map(ResultView::new),
            model: model.to_string(),
        }
    }
}

/// Whitespace-separated word count
pub fn word_count(story: &str) -> usize {
    story.split_whitespace().count()
}
