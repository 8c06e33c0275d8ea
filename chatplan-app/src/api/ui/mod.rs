//! UI routes - HTML pages for the chatplan web interface
//!
//! # Structure
//!
//! - **Static Assets** (`static_assets`): stylesheet serving
//! - **Root Page** (`root`): landing page that starts a session
//! - **Session Page** (`session_page`): dispatches to the page the session is on
//!   - `upload`: transcript upload
//!   - `refine`: keyword selection and extra requirements
//!   - `result`: map, place list and exclude hint

use axum::{routing::get, Router};

use crate::AppState;

pub mod layout;
mod refine;
mod result;
mod root;
mod session_page;
mod static_assets;
mod upload;

use root::root_page;
use session_page::session_page;
use static_assets::serve_chatplan_css;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/session/:session_id", get(session_page))
        .route("/static/chatplan.css", get(serve_chatplan_css))
}
