//! LLM-extractable models for story analysis
//!
//! These types mirror the reply the grading model is asked to produce. Their
//! JSON Schema (doc comments become field descriptions) is sent with every
//! request, and raw replies are deserialized into them before validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// LLM-extractable story analysis
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedAnalysis {
    pub scores: ExtractedScores,
    /// Sum of the 4 sub-scores (max 20)
    pub total_score: f64,
    /// A brief summary of the examiner's thoughts.
    pub general_feedback: String,
    /// List of strengths in the writing.
    pub good_points: Vec<String>,
    /// List of weaknesses or errors.
    pub bad_points: Vec<String>,
    /// The full story rewritten to be perfect B1/B2 level English.
    pub revised_text: String,
    /// The complete original story split into segments. Concatenating the 'text'
    /// fields must reconstruct the exact original story, including whitespace and newlines.
    pub inline_feedback: Vec<ExtractedSegment>,
}

/// Extracted sub-scores
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedScores {
    /// Score out of 5 based on Cambridge PET criteria
    pub content: f64,
    /// Score out of 5 based on Cambridge PET criteria
    pub communicative_achievement: f64,
    /// Score out of 5 based on Cambridge PET criteria
    pub organization: f64,
    /// Score out of 5 based on Cambridge PET criteria
    pub language: f64,
}

/// Extracted text segment
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSegment {
    /// The segment of original text. Keep original whitespace/newlines.
    pub text: String,
    /// True if this segment contains an error.
    pub is_error: bool,
    /// The corrected text for this segment (if error).
    #[serde(default)]
    pub correction: Option<String>,
    /// Brief explanation of the error (if error).
    #[serde(default)]
    pub explanation: Option<String>,
    /// Category of the error (if error).
    #[serde(rename = "type", default)]
    pub error_type: Option<ExtractedErrorType>,
}

/// Extracted error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractedErrorType {
    Grammar,
    Vocabulary,
    Spelling,
    Punctuation,
    Style,
}

impl ExtractedErrorType {
    /// Wire names accepted for the `type` field
    pub const NAMES: [&'static str; 5] = ["grammar", "vocabulary", "spelling", "punctuation", "style"];
}
