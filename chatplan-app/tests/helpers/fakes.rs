//! In-process stand-ins for the language model and place search
//!
//! Both record every call so tests can assert on what the pipeline sent.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use chatplan_app::services::places_client::{LatLng, LocalizedText};
use chatplan_app::services::{CompletionClient, LlmError, PlaceCandidate, PlaceSearch, PlacesError};
use chatplan_app::AppState;

/// One recorded completion request
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub system_prompt: String,
    pub user_content: String,
}

/// Replies with scripted results in order
#[derive(Default)]
pub struct FakeCompletionClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<CompletionCall>>,
}

impl FakeCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn reply(self, content: &str) -> Self {
        self.push(Ok(content.to_string()));
        self
    }

    /// Queue a failure
    pub fn fail(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete_json(&self, system_prompt: &str, user_content: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(CompletionCall {
            system_prompt: system_prompt.to_string(),
            user_content: user_content.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::NetworkError("no scripted reply".to_string())))
    }
}

/// Answers per query; unknown queries yield no candidates
#[derive(Default)]
pub struct FakePlaceSearch {
    results: Mutex<HashMap<String, Vec<PlaceCandidate>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakePlaceSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit for `query`
    pub fn hit(self, query: &str, name: &str, lat: f64, lng: f64) -> Self {
        self.results
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push(candidate(name, lat, lng));
        self
    }

    /// Make `query` fail with a provider error
    pub fn failing(self, query: &str) -> Self {
        self.failing.lock().unwrap().insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearch for FakePlaceSearch {
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.failing.lock().unwrap().contains(query) {
            return Err(PlacesError::ApiError(500, "boom".to_string()));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Candidate with a display name, location and a derived map link
pub fn candidate(name: &str, lat: f64, lng: f64) -> PlaceCandidate {
    PlaceCandidate {
        display_name: Some(LocalizedText {
            text: name.to_string(),
        }),
        location: Some(LatLng {
            latitude: lat,
            longitude: lng,
        }),
        google_maps_uri: Some(format!("https://maps.google.com/?q={}", name)),
    }
}

/// App state wired to the given fakes
pub fn app_state(llm: Arc<FakeCompletionClient>, places: Arc<FakePlaceSearch>) -> AppState {
    AppState::new(llm, places)
}
