//! Static asset handlers
//!
//! Embeds the stylesheet at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const CHATPLAN_CSS: &str = include_str!("../../../static/chatplan.css");

/// GET /static/chatplan.css
pub async fn serve_chatplan_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        CHATPLAN_CSS,
    )
        .into_response()
}
