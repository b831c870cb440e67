//! Parsing and validation of raw LLM replies
//!
//! The reply is first walked as untyped JSON so that every missing or
//! mistyped field is reported with its path, then deserialized and checked
//! against the scoring rules and the segmentation invariant.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::model::SegmentationPolicy;
use crate::model::analysis::MAX_CRITERION_SCORE;
use crate::model::extracted::{ExtractedAnalysis, ExtractedErrorType};
use crate::service::analysis::error::AnalysisError;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("valid code fence regex")
});

/// Parse the raw reply text into an [`ExtractedAnalysis`]
///
/// Fails with `EmptyReply` for blank input, `InvalidJson` when the text is not
/// JSON, and `MalformedReply` listing every shape problem otherwise.
pub fn parse_reply(raw: &str) -> Result<ExtractedAnalysis, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyReply);
    }

    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let value: Value =
        serde_json::from_str(body).map_err(|e| AnalysisError::InvalidJson(e.to_string()))?;

    let shape_errors = check_shape(&value);
    if !shape_errors.is_empty() {
        return Err(AnalysisError::MalformedReply(shape_errors));
    }

    serde_json::from_value(value).map_err(|e| AnalysisError::MalformedReply(vec![e.to_string()]))
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Boolean => value.is_boolean(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn required<'a>(
    errors: &mut Vec<String>,
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
    kind: Kind,
) -> Option<&'a Value> {
    let field_path = join_path(path, key);
    match object.get(key) {
        None | Some(Value::Null) => {
            errors.push(format!("{}: missing required field", field_path));
            None
        }
        Some(value) if kind.matches(value) => Some(value),
        Some(value) => {
            errors.push(format!(
                "{}: expected {}, found {}",
                field_path,
                kind.name(),
                describe(value)
            ));
            None
        }
    }
}

fn optional<'a>(
    errors: &mut Vec<String>,
    object: &'a Map<String, Value>,
    path: &str,
    key: &str,
    kind: Kind,
) -> Option<&'a Value> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(_) => required(errors, object, path, key, kind),
    }
}

fn check_string_array(errors: &mut Vec<String>, root: &Map<String, Value>, key: &str) {
    if let Some(items) = required(errors, root, "", key, Kind::Array).and_then(Value::as_array) {
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                errors.push(format!(
                    "{}[{}]: expected string, found {}",
                    key,
                    i,
                    describe(item)
                ));
            }
        }
    }
}

/// Walk the untyped reply and report every missing or mistyped field
fn check_shape(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        errors.push(format!("reply: expected object, found {}", describe(value)));
        return errors;
    };

    if let Some(scores) = required(&mut errors, root, "", "scores", Kind::Object).and_then(Value::as_object) {
        for key in ["content", "communicativeAchievement", "organization", "language"] {
            required(&mut errors, scores, "scores", key, Kind::Number);
        }
    }

    required(&mut errors, root, "", "totalScore", Kind::Number);
    required(&mut errors, root, "", "generalFeedback", Kind::String);
    check_string_array(&mut errors, root, "goodPoints");
    check_string_array(&mut errors, root, "badPoints");
    required(&mut errors, root, "", "revisedText", Kind::String);

    let segments = required(&mut errors, root, "", "inlineFeedback", Kind::Array)
        .and_then(Value::as_array);
    for (i, segment) in segments.into_iter().flatten().enumerate() {
        let path = format!("inlineFeedback[{}]", i);
        let Some(segment) = segment.as_object() else {
            errors.push(format!("{}: expected object, found {}", path, describe(segment)));
            continue;
        };

        required(&mut errors, segment, &path, "text", Kind::String);
        required(&mut errors, segment, &path, "isError", Kind::Boolean);
        optional(&mut errors, segment, &path, "correction", Kind::String);
        optional(&mut errors, segment, &path, "explanation", Kind::String);
        if let Some(kind) = optional(&mut errors, segment, &path, "type", Kind::String)
            .and_then(Value::as_str)
            && !ExtractedErrorType::NAMES.contains(&kind)
        {
            errors.push(format!(
                "{}.type: '{}' is not one of {}",
                path,
                kind,
                ExtractedErrorType::NAMES.join("|")
            ));
        }
    }

    errors
}

/// Result of analysis validation
#[derive(Debug)]
pub struct AnalysisValidationResult {
    /// Whether the analysis passed validation
    pub is_valid: bool,
    /// Critical errors that indicate invalid output
    pub errors: Vec<String>,
    /// Warnings that indicate potential quality issues
    pub warnings: Vec<String>,
    /// Byte offset where rebuilt text first departs from the story, when rejected
    pub segmentation_mismatch: Option<usize>,
}

impl AnalysisValidationResult {
    /// Create a new validation result with no issues
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            segmentation_mismatch: None,
        }
    }

    /// Add an error to the validation result
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the validation result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Error to report when validation failed
    pub fn into_error(self) -> Option<AnalysisError> {
        if self.is_valid {
            return None;
        }
        match self.segmentation_mismatch {
            Some(offset) if self.errors.len() == 1 => {
                Some(AnalysisError::SegmentationMismatch { offset })
            }
            _ => Some(AnalysisError::MalformedReply(self.errors)),
        }
    }
}

/// Validate extracted analysis against the scoring rules and the original story
///
/// Checks:
/// 1. Each sub-score is a whole number in 0-5
/// 2. totalScore equals the sum of sub-scores (warning; the total is recomputed)
/// 3. Error segments carry a correction and an explanation
/// 4. Concatenated segment text reproduces the story byte-for-byte
pub fn validate_extracted_analysis(
    analysis: &ExtractedAnalysis,
    story: &str,
    policy: SegmentationPolicy,
) -> AnalysisValidationResult {
    let mut result = AnalysisValidationResult::valid();

    let scores = [
        ("content", analysis.scores.content),
        (
            "communicativeAchievement",
            analysis.scores.communicative_achievement,
        ),
        ("organization", analysis.scores.organization),
        ("language", analysis.scores.language),
    ];

    let mut scores_ok = true;
    for (name, score) in scores {
        if score.fract() != 0.0 {
            scores_ok = false;
            result.add_error(format!("scores.{} must be a whole number, got {}", name, score));
        } else if !(0.0..=f64::from(MAX_CRITERION_SCORE)).contains(&score) {
            scores_ok = false;
            result.add_error(format!(
                "scores.{} must be between 0 and {}, got {}",
                name, MAX_CRITERION_SCORE, score
            ));
        }
    }

    if scores_ok {
        let sum: f64 = scores.iter().map(|(_, s)| s).sum();
        if analysis.total_score != sum {
            result.add_warning(format!(
                "totalScore {} does not match sum of sub-scores {}; using the sum",
                analysis.total_score, sum
            ));
        }
    }

    for (i, segment) in analysis.inline_feedback.iter().enumerate() {
        if segment.is_error {
            if is_blank(segment.correction.as_deref()) {
                result.add_error(format!("inlineFeedback[{}]: error segment has no correction", i));
            }
            if is_blank(segment.explanation.as_deref()) {
                result.add_error(format!("inlineFeedback[{}]: error segment has no explanation", i));
            }
            if segment.error_type.is_none() {
                result.add_warning(format!("inlineFeedback[{}]: error segment has no type", i));
            }
        } else if segment.correction.is_some()
            || segment.explanation.is_some()
            || segment.error_type.is_some()
        {
            result.add_warning(format!(
                "inlineFeedback[{}]: annotation on a segment without error is ignored",
                i
            ));
        }
    }

    let rebuilt: String = analysis
        .inline_feedback
        .iter()
        .map(|s| s.text.as_str())
        .collect();
    if let Some(offset) = first_divergence(&rebuilt, story) {
        let message = format!(
            "inlineFeedback does not reconstruct the story (rebuilt {} bytes, story {} bytes, first difference at byte {})",
            rebuilt.len(),
            story.len(),
            offset
        );
        match policy {
            SegmentationPolicy::Reject => {
                result.segmentation_mismatch = Some(offset);
                result.add_error(message);
            }
            SegmentationPolicy::Tolerate => result.add_warning(message),
        }
    }

    result
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Byte offset of the first difference between two strings, if any
pub fn first_divergence(a: &str, b: &str) -> Option<usize> {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}
