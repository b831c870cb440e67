pub mod analysis;
pub mod config;
pub mod extracted;

pub use analysis::{AnalysisResult, ErrorType, FeedbackSegment, ScoreBreakdown};
pub use config::{AnalysisConfig, Config, LlmConfig, SegmentationPolicy};
