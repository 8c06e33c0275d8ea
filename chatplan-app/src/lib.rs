//! chatplan-app library interface for testing
//!
//! Exposes the router, application state and pipeline services.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::services::{CompletionClient, PlaceSearch, PlanPipeline, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Live sessions
    pub sessions: SessionStore,
    /// Language-model client
    pub llm: Arc<dyn CompletionClient>,
    /// Place-search client
    pub places: Arc<dyn PlaceSearch>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last pipeline error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionClient>, places: Arc<dyn PlaceSearch>) -> Self {
        Self {
            sessions: SessionStore::new(),
            llm,
            places,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Pipeline bound to this state's sessions and clients
    pub fn pipeline(&self) -> PlanPipeline {
        PlanPipeline::new(self.sessions.clone(), self.llm.clone(), self.places.clone())
    }

    /// Remember the most recent failure for `/health`
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // Form actions (POST, redirect back to the session page)
        .merge(api::action_routes())
        // JSON API
        .merge(api::session_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
