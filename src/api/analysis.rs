//! REST API endpoints for story analysis

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AnalysisResult, ErrorType, FeedbackSegment, ScoreBreakdown};
use crate::service::StoryAnalysisService;
use crate::service::session::{CompletedAnalysis, ExaminerSession, Phase};
use crate::view::page::word_count;

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze,
        session_state,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        AnalyzeRequest,
        AnalysisResult,
        ScoreBreakdown,
        FeedbackSegment,
        ErrorType,
        SessionSnapshot,
        SessionPhase,
        CompletedAnalysis,
        ErrorResponse
    )),
    tags(
        (name = "analysis", description = "Cambridge PET story assessment"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Story submitted for grading
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// The student's story, exactly as written
    pub story: String,
}

/// Coarse phase of the examiner session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Loading,
    Result,
    Error,
}

/// Snapshot of the examiner session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub story: String,
    pub word_count: usize,
    pub phase: SessionPhase,
    pub error: Option<String>,
    /// Story edited after the current result was produced
    pub stale: bool,
    pub analysis: Option<CompletedAnalysis>,
}

impl SessionSnapshot {
    pub fn new(session: &ExaminerSession) -> Self {
        let phase = match session.phase() {
            Phase::Idle => SessionPhase::Idle,
            Phase::Loading { .. } => SessionPhase::Loading,
            Phase::Ready(_) => SessionPhase::Result,
            Phase::Failed { .. } => SessionPhase::Error,
        };

        Self {
            story: session.story().to_string(),
            word_count: word_count(session.story()),
            phase,
            error: session.error().map(str::to_string),
            stale: session.is_stale(),
            analysis: session.completed().cloned(),
        }
    }
}

/// Grade a story
///
/// Stateless: the examiner session is not touched.
#[utoipa::path(
    post,
    path = "/v1/analyses",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Story graded", body = AnalysisResult),
        (status = 400, description = "Story is empty", body = ErrorResponse),
        (status = 502, description = "Grading service failed or replied with malformed data", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/v1/analyses")]
pub async fn analyze(
    service: web::Data<StoryAnalysisService>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = service.analyze_story(&body.story).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Current examiner session state
#[utoipa::path(
    get,
    path = "/v1/session",
    responses(
        (status = 200, description = "Session snapshot", body = SessionSnapshot)
    ),
    tag = "analysis"
)]
#[get("/v1/session")]
pub async fn session_state(session: web::Data<Mutex<ExaminerSession>>) -> HttpResponse {
    let snapshot = SessionSnapshot::new(&*session.lock().await);
    HttpResponse::Ok().json(snapshot)
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze).service(session_state);
}
