//! HTTP handlers for chatplan
//!
//! HTML pages live under `ui`, form posts under `actions`, and the JSON
//! endpoints under `session` and `health`.

pub mod actions;
pub mod health;
pub mod session;
pub mod ui;

pub use actions::action_routes;
pub use health::health_routes;
pub use session::session_routes;
pub use ui::ui_routes;
