pub mod analysis;
pub mod llm;
pub mod session;

pub use analysis::StoryAnalysisService;
pub use llm::{AnalysisBackend, LlmClient, OpenAiBackend};
