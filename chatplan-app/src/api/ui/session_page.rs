//! Session page handler
//!
//! Renders whichever page the session is on and consumes its pending notices.

use axum::{
    extract::{Path, State},
    response::Html,
};
use uuid::Uuid;

use super::{refine, result, upload};
use crate::error::{ApiError, ApiResult};
use crate::models::Page;
use crate::AppState;

/// GET /session/:session_id
pub async fn session_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Html<String>> {
    let (session, notices) = state
        .sessions
        .update(session_id, |session| {
            let notices = session.take_notices();
            (session.clone(), notices)
        })
        .await
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    Ok(match session.page {
        Page::Upload => upload::render(&session, &notices),
        Page::Refine => refine::render(&session, &notices),
        Page::Result => result::render(&session, &notices),
    })
}
