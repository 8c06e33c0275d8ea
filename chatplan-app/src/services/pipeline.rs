//! Pipeline orchestration: transcript → keywords → queries → places
//!
//! Each stage reads what it needs from the session, performs its external
//! calls without holding the session lock, then writes its output in a single
//! update. A failed stage leaves the session as it was apart from the notice
//! describing the failure.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::keyword_extractor::{self, Extraction};
use super::llm_client::{CompletionClient, LlmError};
use super::place_resolver;
use super::places_client::{PlaceSearch, PlacesError};
use super::query_planner;
use super::session_store::SessionStore;
use crate::models::{InvalidTransition, Notice, Page};

/// Pipeline failures (every one is also reported to the user as a notice)
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("No transcript uploaded")]
    MissingTranscript,

    #[error("Transcript is not valid UTF-8: {0}")]
    InvalidUpload(String),

    #[error(transparent)]
    InvalidPage(#[from] InvalidTransition),

    #[error("Language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("No search queries generated")]
    NoQueries,

    #[error("Place search failed: {0}")]
    Places(#[from] PlacesError),
}

/// Runs the extraction and planning stages against one session
pub struct PlanPipeline {
    sessions: SessionStore,
    llm: Arc<dyn CompletionClient>,
    places: Arc<dyn PlaceSearch>,
}

impl PlanPipeline {
    pub fn new(
        sessions: SessionStore,
        llm: Arc<dyn CompletionClient>,
        places: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            sessions,
            llm,
            places,
        }
    }

    /// Upload → refine
    ///
    /// `upload` is the raw file content; `None` reuses the transcript already
    /// stored on the session.
    pub async fn extract_keywords(
        &self,
        session_id: Uuid,
        upload: Option<Vec<u8>>,
    ) -> Result<(), PipelineError> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or(PipelineError::SessionNotFound(session_id))?;

        if session.page != Page::Upload {
            let err = InvalidTransition {
                from: session.page,
                to: Page::Refine,
            };
            self.notify(session_id, Notice::warning("키워드 추출은 업로드 화면에서만 할 수 있습니다."))
                .await;
            return Err(err.into());
        }

        let transcript = match upload {
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(text) => {
                    let stored = text.clone();
                    self.sessions
                        .update(session_id, move |s| s.set_transcript(stored))
                        .await;
                    text
                }
                Err(e) => {
                    self.notify(
                        session_id,
                        Notice::error(format!("업로드한 파일을 UTF-8 텍스트로 읽을 수 없습니다: {}", e)),
                    )
                    .await;
                    return Err(PipelineError::InvalidUpload(e.to_string()));
                }
            },
            None => match session.transcript {
                Some(text) => text,
                None => {
                    self.notify(session_id, Notice::warning("파일을 먼저 업로드해줘!")).await;
                    return Err(PipelineError::MissingTranscript);
                }
            },
        };

        tracing::info!(
            session_id = %session_id,
            transcript_len = transcript.len(),
            "Extracting keywords from transcript"
        );

        let extraction = match keyword_extractor::extract_keywords(self.llm.as_ref(), &transcript).await {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Keyword extraction call failed");
                self.notify(
                    session_id,
                    Notice::error(format!("채팅 분석 중 오류가 발생했습니다: {}", e)),
                )
                .await;
                return Err(e.into());
            }
        };

        match extraction {
            Extraction::Keywords(keywords) => {
                tracing::info!(
                    session_id = %session_id,
                    count = keywords.len(),
                    "Keywords extracted"
                );
                self.sessions
                    .update(session_id, move |s| s.apply_extraction(keywords, true))
                    .await
                    .ok_or(PipelineError::SessionNotFound(session_id))?;
                Ok(())
            }
            Extraction::UnexpectedShape => {
                tracing::warn!(session_id = %session_id, "Extraction response has no keyword list");
                self.sessions
                    .update(session_id, |s| {
                        s.push_notice(Notice::error("AI가 예상치 못한 형식으로 키워드를 반환했습니다."));
                        s.apply_extraction(Vec::new(), true);
                    })
                    .await
                    .ok_or(PipelineError::SessionNotFound(session_id))?;
                Err(PipelineError::MalformedResponse(
                    "response has no keywords list".to_string(),
                ))
            }
            Extraction::InvalidJson(msg) => {
                tracing::warn!(session_id = %session_id, error = %msg, "Extraction response is not JSON");
                self.sessions
                    .update(session_id, |s| {
                        s.push_notice(Notice::error(
                            "AI가 키워드 리스트를 만드는 데 실패했습니다. (JSON 변환 오류)",
                        ));
                        s.apply_extraction(Vec::new(), false);
                    })
                    .await
                    .ok_or(PipelineError::SessionNotFound(session_id))?;
                Err(PipelineError::MalformedResponse(msg))
            }
        }
    }

    /// Refine → result
    ///
    /// Plans queries from the selection, then resolves every query. The plan
    /// is stored only if both steps succeed.
    pub async fn generate_plan(
        &self,
        session_id: Uuid,
        selected: Vec<String>,
        extra: String,
    ) -> Result<(), PipelineError> {
        let keywords = self
            .sessions
            .update(session_id, |s| {
                if s.page != Page::Refine {
                    return Err(InvalidTransition {
                        from: s.page,
                        to: Page::Result,
                    });
                }
                s.set_refinement(&selected, &extra);
                Ok(s.selected_keywords.clone())
            })
            .await
            .ok_or(PipelineError::SessionNotFound(session_id))?;

        let keywords = match keywords {
            Ok(k) => k,
            Err(e) => {
                self.notify(session_id, Notice::warning("플랜 생성은 키워드 화면에서만 할 수 있습니다."))
                    .await;
                return Err(e.into());
            }
        };

        tracing::info!(
            session_id = %session_id,
            keywords = ?keywords,
            extra = %extra,
            "Generating search queries"
        );

        let queries = match query_planner::plan_queries(self.llm.as_ref(), &keywords, &extra).await {
            Ok(queries) => queries,
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Query planning failed");
                self.notify(session_id, Notice::error(planning_message(&e))).await;
                return Err(e);
            }
        };

        tracing::info!(session_id = %session_id, queries = ?queries, "Resolving places");

        let places = match place_resolver::resolve_places(self.places.as_ref(), &queries).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Place resolution failed");
                self.notify(session_id, Notice::error(format!("Google Maps API 호출 오류: {}", e)))
                    .await;
                return Err(e.into());
            }
        };

        let found = places.iter().filter(|p| p.is_found()).count();
        self.sessions
            .update(session_id, move |s| s.apply_plan(queries, places))
            .await
            .ok_or(PipelineError::SessionNotFound(session_id))?;

        tracing::info!(session_id = %session_id, found, "Plan stored");
        Ok(())
    }

    async fn notify(&self, session_id: Uuid, notice: Notice) {
        self.sessions
            .update(session_id, move |s| s.push_notice(notice))
            .await;
    }
}

/// User-facing text for a planning-stage failure
fn planning_message(err: &PipelineError) -> String {
    match err {
        PipelineError::NoQueries => "AI가 검색어를 생성하지 못했습니다.".to_string(),
        PipelineError::MalformedResponse(msg) => {
            format!("AI 응답 처리 중 JSON 오류가 발생했습니다: {}", msg)
        }
        PipelineError::Llm(e) => format!("검색어 생성 중 오류가 발생했습니다: {}", e),
        other => format!("알 수 없는 오류가 발생했습니다: {}", other),
    }
}
