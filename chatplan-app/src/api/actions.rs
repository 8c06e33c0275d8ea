//! Form actions
//!
//! Every action mutates one session and answers with `303 See Other` back to
//! the session page, where pending notices are shown. Pipeline failures are
//! user-visible notices, not HTTP errors; only an unknown session (404) or an
//! impossible page move (400) surfaces as an error response.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Redirect,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Notice, Page};
use crate::services::PipelineError;
use crate::AppState;

/// Multipart field carrying the transcript file
pub const TRANSCRIPT_FIELD: &str = "transcript";

/// Upload ceiling for a transcript (axum's default is 2 MB)
pub const MAX_TRANSCRIPT_BYTES: usize = 20 * 1024 * 1024;

const REGENERATE_PENDING_MESSAGE: &str = "재생성 기능은 아직 구현되지 않았습니다.";

/// Location of the HTML page for a session
pub fn session_path(session_id: Uuid) -> String {
    format!("/session/{}", session_id)
}

/// Hint edit form
#[derive(Debug, Deserialize)]
pub struct HintForm {
    #[serde(default)]
    pub hint: String,
}

/// Remove/restore form
///
/// `hint` carries whatever is in the hint field at the time of the click, so
/// unsaved edits survive the toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub name: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// POST /sessions
pub async fn create_session(State(state): State<AppState>) -> Redirect {
    let session_id = state.sessions.create().await;
    Redirect::to(&session_path(session_id))
}

/// POST /session/:session_id/extract
///
/// Multipart upload; an absent or empty `transcript` part reuses the
/// transcript stored by an earlier upload.
pub async fn extract_keywords(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    if !state.sessions.contains(session_id).await {
        return Err(ApiError::session_not_found(session_id));
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(TRANSCRIPT_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        if !bytes.is_empty() {
            upload = Some(bytes.to_vec());
        }
    }

    tracing::debug!(
        session_id = %session_id,
        upload_bytes = upload.as_ref().map(Vec::len),
        "Extract requested"
    );

    let result = state.pipeline().extract_keywords(session_id, upload).await;
    settle(&state, session_id, result).await
}

/// POST /session/:session_id/plan
///
/// Form with repeated `keyword` fields (the kept keywords) and one `extra`.
pub async fn generate_plan(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<Redirect> {
    let mut selected = Vec::new();
    let mut extra = String::new();
    for (key, value) in fields {
        match key.as_str() {
            "keyword" => selected.push(value),
            "extra" => extra = value,
            _ => {}
        }
    }

    let result = state
        .pipeline()
        .generate_plan(session_id, selected, extra)
        .await;
    settle(&state, session_id, result).await
}

/// POST /session/:session_id/toggle
pub async fn toggle_place(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<ToggleForm>,
) -> ApiResult<Redirect> {
    let removed = state
        .sessions
        .update(session_id, |session| {
            if let Some(hint) = &form.hint {
                session.edit_hint(hint);
            }
            session.toggle_removed(&form.name)
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    tracing::debug!(session_id = %session_id, name = %form.name, removed, "Place toggled");
    Ok(Redirect::to(&session_path(session_id)))
}

/// POST /session/:session_id/hint
pub async fn update_hint(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<HintForm>,
) -> ApiResult<Redirect> {
    state
        .sessions
        .update(session_id, |session| session.edit_hint(&form.hint))
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    Ok(Redirect::to(&session_path(session_id)))
}

/// POST /session/:session_id/regenerate
///
/// Keeps the submitted hint text; generation from the hint is not wired yet.
pub async fn regenerate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<HintForm>,
) -> ApiResult<Redirect> {
    state
        .sessions
        .update(session_id, |session| {
            session.edit_hint(&form.hint);
            session.push_notice(Notice::info(REGENERATE_PENDING_MESSAGE));
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    tracing::info!(session_id = %session_id, "Regenerate requested (not implemented)");
    Ok(Redirect::to(&session_path(session_id)))
}

/// POST /session/:session_id/back
pub async fn back_to_refine(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Redirect> {
    state
        .sessions
        .update(session_id, |session| session.transition_to(Page::Refine))
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Redirect::to(&session_path(session_id)))
}

/// Turn a pipeline outcome into the redirect (or 404)
///
/// The pipeline has already queued a notice for every failure it reports.
async fn settle(
    state: &AppState,
    session_id: Uuid,
    result: Result<(), PipelineError>,
) -> ApiResult<Redirect> {
    match result {
        Ok(()) => {}
        Err(e @ PipelineError::SessionNotFound(_)) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Pipeline stage failed");
            state.record_error(e.to_string()).await;
        }
    }
    Ok(Redirect::to(&session_path(session_id)))
}

/// Build form action routes
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route(
            "/session/:session_id/extract",
            post(extract_keywords).layer(DefaultBodyLimit::max(MAX_TRANSCRIPT_BYTES)),
        )
        .route("/session/:session_id/plan", post(generate_plan))
        .route("/session/:session_id/toggle", post(toggle_place))
        .route("/session/:session_id/hint", post(update_hint))
        .route("/session/:session_id/regenerate", post(regenerate))
        .route("/session/:session_id/back", post(back_to_refine))
}
