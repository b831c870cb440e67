//! Converters from extracted LLM models to domain models
//!
//! Callers validate first; scores are assumed to be whole numbers in range.

use crate::model::extracted::{
    ExtractedAnalysis, ExtractedErrorType, ExtractedScores, ExtractedSegment,
};
use crate::model::{AnalysisResult, ErrorType, FeedbackSegment, ScoreBreakdown};

/// Convert a validated extracted analysis to the domain model
///
/// The total is recomputed from the sub-scores.
pub fn convert_analysis(extracted: ExtractedAnalysis) -> AnalysisResult {
    let scores = convert_scores(&extracted.scores);

    AnalysisResult {
        scores,
        total_score: scores.total(),
        general_feedback: extracted.general_feedback,
        good_points: extracted.good_points,
        bad_points: extracted.bad_points,
        revised_text: extracted.revised_text,
        inline_feedback: extracted
            .inline_feedback
            .into_iter()
            .map(convert_segment)
            .collect(),
    }
}

fn convert_scores(extracted: &ExtractedScores) -> ScoreBreakdown {
    ScoreBreakdown {
        content: to_score(extracted.content),
        communicative_achievement: to_score(extracted.communicative_achievement),
        organization: to_score(extracted.organization),
        language: to_score(extracted.language),
    }
}

fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 5.0) as u8
}

/// Convert an extracted segment; annotations on plain segments are dropped
pub fn convert_segment(extracted: ExtractedSegment) -> FeedbackSegment {
    if !extracted.is_error {
        return FeedbackSegment::plain(extracted.text);
    }

    FeedbackSegment {
        text: extracted.text,
        is_error: true,
        correction: extracted.correction,
        explanation: extracted.explanation,
        error_type: extracted.error_type.map(convert_error_type),
    }
}

fn convert_error_type(extracted: ExtractedErrorType) -> ErrorType {
    match extracted {
        ExtractedErrorType::Grammar => ErrorType::Grammar,
        ExtractedErrorType::Vocabulary => ErrorType::Vocabulary,
        ExtractedErrorType::Spelling => ErrorType::Spelling,
        ExtractedErrorType::Punctuation => ErrorType::Punctuation,
        ExtractedErrorType::Style => ErrorType::Style,
    }
}
