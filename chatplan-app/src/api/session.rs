//! JSON snapshot of a session
//!
//! Read-only view used for diagnostics and tests. Pending notices are
//! included but not consumed; only the HTML page drains them.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Notice, Page, ResolvedPlace, SessionRecord};
use crate::services::{build_map_view, MapView};
use crate::AppState;

/// Session snapshot response
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub page: Page,
    pub has_transcript: bool,
    pub keywords: Vec<String>,
    pub selected_keywords: Vec<String>,
    pub extra_requirements: String,
    pub generated_queries: Vec<String>,
    pub places: Vec<ResolvedPlace>,
    /// Display names currently marked as removed
    pub removed: Vec<String>,
    /// Composed exclude hint as shown in the edit field
    pub exclude_hint: String,
    /// Present once a plan exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
    pub notices: Vec<Notice>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SessionRecord> for SessionSnapshot {
    fn from(session: SessionRecord) -> Self {
        let map = (session.page == Page::Result)
            .then(|| build_map_view(&session.places, &session.hint));

        Self {
            session_id: session.session_id,
            page: session.page,
            has_transcript: session.transcript.is_some(),
            removed: session.hint.removed().to_vec(),
            exclude_hint: session.hint.compose(),
            map,
            keywords: session.keywords,
            selected_keywords: session.selected_keywords,
            extra_requirements: session.extra_requirements,
            generated_queries: session.generated_queries,
            places: session.places,
            notices: session.notices,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// GET /api/session/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    Ok(Json(SessionSnapshot::from(session)))
}

/// Build session API routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/api/session/:session_id", get(get_session))
}
