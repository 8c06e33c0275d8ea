//! Session record and page state machine
//!
//! Pages: UPLOAD → REFINE → RESULT, with the back-edge RESULT → REFINE.
//! Stage outputs are written through the `apply_*` methods only after the
//! corresponding external calls have fully succeeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{ExcludeHint, ResolvedPlace};

/// Page the session is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Transcript intake
    Upload,
    /// Keyword selection and extra requirements
    Refine,
    /// Map and place list
    Result,
}

impl Page {
    /// Whether `self → next` is an edge of the page graph
    pub fn can_transition_to(&self, next: Page) -> bool {
        matches!(
            (self, next),
            (Page::Upload, Page::Refine) | (Page::Refine, Page::Result) | (Page::Result, Page::Refine)
        )
    }
}

/// Rejected page transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid page transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: Page,
    pub to: Page,
}

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Warning,
    Info,
}

/// Message shown once on the next page render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// State of one interactive session (in-memory only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub page: Page,
    /// Last uploaded transcript
    pub transcript: Option<String>,
    /// Keywords from the latest extraction
    pub keywords: Vec<String>,
    /// Subset of `keywords` chosen on the refine page
    pub selected_keywords: Vec<String>,
    /// Free-text extra requirements from the refine page
    pub extra_requirements: String,
    /// Queries of the current plan (display only)
    pub generated_queries: Vec<String>,
    /// One entry per generated query, same order
    pub places: Vec<ResolvedPlace>,
    /// Removed-place set and regeneration hint
    pub hint: ExcludeHint,
    /// Pending user-visible messages
    pub notices: Vec<Notice>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            page: Page::Upload,
            transcript: None,
            keywords: Vec::new(),
            selected_keywords: Vec::new(),
            extra_requirements: String::new(),
            generated_queries: Vec::new(),
            places: Vec::new(),
            hint: ExcludeHint::new(),
            notices: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next` if the page graph allows it
    pub fn transition_to(&mut self, next: Page) -> Result<(), InvalidTransition> {
        if !self.page.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.page,
                to: next,
            });
        }
        self.page = next;
        self.touch();
        Ok(())
    }

    pub fn set_transcript(&mut self, transcript: String) {
        self.transcript = Some(transcript);
        self.touch();
    }

    /// Store extraction output; every keyword starts selected
    ///
    /// `advance` moves the session to the refine page.
    pub fn apply_extraction(&mut self, keywords: Vec<String>, advance: bool) {
        self.selected_keywords = keywords.clone();
        self.keywords = keywords;
        if advance && self.page == Page::Upload {
            self.page = Page::Refine;
        }
        self.touch();
    }

    /// Record the refine-page inputs
    ///
    /// Selections that are not among the extracted keywords are ignored and the
    /// result follows keyword order.
    pub fn set_refinement(&mut self, selected: &[String], extra: &str) {
        self.selected_keywords = self
            .keywords
            .iter()
            .filter(|k| selected.contains(k))
            .cloned()
            .collect();
        self.extra_requirements = extra.to_string();
        self.touch();
    }

    /// Store a new plan, reset removals and show the result page
    pub fn apply_plan(&mut self, queries: Vec<String>, places: Vec<ResolvedPlace>) {
        self.generated_queries = queries;
        self.places = places;
        self.hint.clear();
        self.page = Page::Result;
        self.touch();
    }

    /// Flip removal of a place name; returns true when it is now removed
    pub fn toggle_removed(&mut self, name: &str) -> bool {
        let removed = self.hint.toggle(name);
        self.touch();
        removed
    }

    /// Take a hand-edited hint string from the result page
    pub fn edit_hint(&mut self, text: &str) {
        self.hint.absorb_edit(text);
        self.touch();
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.hint.is_removed(name)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.touch();
    }

    /// Drain pending notices for rendering
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}
