//! Marking traces: the story rendered segment by segment

use crate::model::FeedbackSegment;

/// Hover detail for an error segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationView {
    pub correction: String,
    pub explanation: String,
    pub kind: Option<&'static str>,
}

/// One segment as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    pub text: String,
    /// Present only for error segments
    pub annotation: Option<AnnotationView>,
}

impl SegmentView {
    pub fn from_segment(segment: &FeedbackSegment) -> Self {
        let annotation = segment.is_error.then(|| AnnotationView {
            correction: segment.correction.clone().unwrap_or_default(),
            explanation: segment.explanation.clone().unwrap_or_default(),
            kind: segment.error_type.map(|t| t.as_str()),
        });

        Self {
            text: segment.text.clone(),
            annotation,
        }
    }
}

/// Segments in story order
pub fn marking_traces(segments: &[FeedbackSegment]) -> Vec<SegmentView> {
    segments.iter().map(SegmentView::from_segment).collect()
}
