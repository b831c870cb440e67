//! Domain model for a graded story

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Highest mark for a single assessment criterion
pub const MAX_CRITERION_SCORE: u8 = 5;

/// Highest total mark (four criteria)
pub const MAX_TOTAL_SCORE: u8 = MAX_CRITERION_SCORE * 4;

/// Complete assessment of one story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub scores: ScoreBreakdown,
    /// Always the sum of the four sub-scores
    pub total_score: u8,
    pub general_feedback: String,
    pub good_points: Vec<String>,
    pub bad_points: Vec<String>,
    pub revised_text: String,
    pub inline_feedback: Vec<FeedbackSegment>,
}

impl AnalysisResult {
    /// Concatenation of every segment's text, in order
    pub fn reconstructed_text(&self) -> String {
        self.inline_feedback
            .iter()
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Number of segments flagged as errors
    pub fn error_count(&self) -> usize {
        self.inline_feedback.iter().filter(|s| s.is_error).count()
    }
}

/// Marks for the four Writing Part 2 criteria, each 0-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub content: u8,
    pub communicative_achievement: u8,
    pub organization: u8,
    pub language: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.content + self.communicative_achievement + self.organization + self.language
    }
}

/// One contiguous piece of the original story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSegment {
    pub text: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
}

impl FeedbackSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            correction: None,
            explanation: None,
            error_type: None,
        }
    }
}

#[cfg(test)]
impl FeedbackSegment {
    pub fn error(
        text: impl Into<String>,
        correction: impl Into<String>,
        explanation: impl Into<String>,
        error_type: Option<ErrorType>,
    ) -> Self {
        Self {
            text: text.into(),
            is_error: true,
            correction: Some(correction.into()),
            explanation: Some(explanation.into()),
            error_type,
        }
    }
}

/// Category of a flagged error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Grammar,
    Vocabulary,
    Spelling,
    Punctuation,
    Style,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Grammar => "grammar",
            ErrorType::Vocabulary => "vocabulary",
            ErrorType::Spelling => "spelling",
            ErrorType::Punctuation => "punctuation",
            ErrorType::Style => "style",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_and_type_key() {
        let result = AnalysisResult {
            scores: ScoreBreakdown {
                content: 4,
                communicative_achievement: 3,
                organization: 3,
                language: 2,
            },
            total_score: 12,
            general_feedback: "Fine".to_string(),
            good_points: vec![],
            bad_points: vec![],
            revised_text: "x".to_string(),
            inline_feedback: vec![
                FeedbackSegment::plain("a "),
                FeedbackSegment::error("b", "c", "d", Some(ErrorType::Spelling)),
            ],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalScore"], 12);
        assert_eq!(json["scores"]["communicativeAchievement"], 3);
        assert_eq!(json["inlineFeedback"][1]["type"], "spelling");
        assert_eq!(json["inlineFeedback"][1]["isError"], true);
        // plain segments carry no annotation keys
        assert!(json["inlineFeedback"][0].get("correction").is_none());
        assert!(json["inlineFeedback"][0].get("type").is_none());
    }

    #[test]
    fn test_reconstructed_text_and_error_count() {
        let result = AnalysisResult {
            scores: ScoreBreakdown {
                content: 0,
                communicative_achievement: 0,
                organization: 0,
                language: 0,
            },
            total_score: 0,
            general_feedback: String::new(),
            good_points: vec![],
            bad_points: vec![],
            revised_text: String::new(),
            inline_feedback: vec![
                FeedbackSegment::plain("He saw a photo "),
                FeedbackSegment::error("insde", "inside", "spelling error", None),
                FeedbackSegment::plain(".\n"),
            ],
        };

        assert_eq!(result.reconstructed_text(), "He saw a photo insde.\n");
        assert_eq!(result.error_count(), 1);
    }
}
