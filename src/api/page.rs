//! HTML endpoints for the examiner page

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::api::error::ApiError;
use crate::service::StoryAnalysisService;
use crate::service::session::{ExaminerSession, PendingAnalysis};
use crate::view::ExaminerPage;

/// Form body posted by the story textarea
#[derive(Debug, Deserialize)]
pub struct StoryForm {
    pub story: String,
}

impl StoryForm {
    /// Browsers submit textarea line breaks as CRLF
    fn into_story(self) -> String {
        self.story.replace("\r\n", "\n")
    }
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Render the examiner page from the current session
#[get("/")]
pub async fn index(
    service: web::Data<StoryAnalysisService>,
    session: web::Data<Mutex<ExaminerSession>>,
) -> Result<HttpResponse, ApiError> {
    let page = ExaminerPage::from_session(&*session.lock().await, service.model());
    let html = page
        .render()
        .map_err(|e| ApiError::Internal(format!("Failed to render page: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Save the edited story without analyzing it
#[post("/story")]
pub async fn save_story(
    session: web::Data<Mutex<ExaminerSession>>,
    form: web::Form<StoryForm>,
) -> HttpResponse {
    session.lock().await.edit_story(form.into_inner().into_story());
    redirect_home()
}

/// Save the story and run an analysis on it
///
/// The session lock is released while the grading service is called, so the
/// page keeps rendering (in its Loading state) and the text stays editable.
/// The call runs on its own task: a client that disconnects drops only the
/// wait, and the session still leaves Loading once the call finishes.
#[post("/analyze")]
pub async fn analyze_story(
    service: web::Data<StoryAnalysisService>,
    session: web::Data<Mutex<ExaminerSession>>,
    form: web::Form<StoryForm>,
) -> HttpResponse {
    let pending = {
        let mut session = session.lock().await;
        session.edit_story(form.into_inner().into_story());
        session.begin_analysis()
    };

    let Some(pending) = pending else {
        tracing::debug!("Analyze ignored: story is blank or an analysis is in flight");
        return redirect_home();
    };

    let request_id = pending.request_id;
    let task = actix_web::rt::spawn(run_analysis(service, session, pending));

    if let Err(e) = task.await {
        tracing::error!(request_id = request_id, error = %e, "Story analysis task failed");
    }

    redirect_home()
}

/// Grade a pending story and report the outcome to the session
async fn run_analysis(
    service: web::Data<StoryAnalysisService>,
    session: web::Data<Mutex<ExaminerSession>>,
    pending: PendingAnalysis,
) {
    let request_id = pending.request_id;
    let outcome = service.analyze_story(&pending.story).await;
    let completion = session.lock().await.complete(pending, outcome);

    tracing::info!(
        request_id = request_id,
        completion = ?completion,
        "Story analysis finished"
    );
}

/// Configure page routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(save_story).service(analyze_story);
}
