//! Pipeline integration tests
//!
//! Drive extraction and planning against scripted fakes and check the
//! session state each stage leaves behind.

mod helpers;

use std::sync::Arc;

use chatplan_app::models::{NoticeLevel, Page, ResolvedPlace};
use chatplan_app::services::{build_map_view, LlmError, PipelineError};
use chatplan_app::AppState;
use helpers::fakes::{app_state, FakeCompletionClient, FakePlaceSearch};
use uuid::Uuid;

const TRANSCRIPT: &str = "민지: 이번 주말 강남역에서 볼까?\n준호: 좋아 파스타 먹자";

fn three_queries() -> &'static str {
    r#"{"plan": ["강남역 파스타 맛집", "강남역 조용한 카페", "강남역 보드게임카페"]}"#
}

fn three_hits() -> FakePlaceSearch {
    FakePlaceSearch::new()
        .hit("강남역 파스타 맛집", "파스타집", 37.4981, 127.0276)
        .hit("강남역 조용한 카페", "조용한카페", 37.4990, 127.0290)
        .hit("강남역 보드게임카페", "보드게임천국", 37.5001, 127.0301)
}

async fn session_on_refine(state: &AppState) -> Uuid {
    let id = state.sessions.create().await;
    state
        .pipeline()
        .extract_keywords(id, Some(TRANSCRIPT.as_bytes().to_vec()))
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn test_greetings_only_transcript_yields_empty_refine_page() {
    let llm = Arc::new(FakeCompletionClient::new().reply(r#"{"keywords": []}"#));
    let state = app_state(llm.clone(), Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    state
        .pipeline()
        .extract_keywords(id, Some("안녕 ㅎㅎ 😀".as_bytes().to_vec()))
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert!(session.keywords.is_empty());
    assert!(session.selected_keywords.is_empty());
    assert_eq!(llm.calls()[0].user_content, "안녕 ㅎㅎ 😀");
}

#[tokio::test]
async fn test_plan_with_three_hits() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역", "파스타"]}"#)
            .reply(three_queries()),
    );
    let places = Arc::new(three_hits());
    let state = app_state(llm.clone(), places.clone());
    let id = session_on_refine(&state).await;

    state
        .pipeline()
        .generate_plan(id, vec!["강남역".into(), "파스타".into()], String::new())
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Result);
    assert_eq!(session.generated_queries.len(), 3);
    assert_eq!(session.places.len(), 3);
    assert!(session.places.iter().all(ResolvedPlace::is_found));
    assert_eq!(
        places.calls(),
        vec!["강남역 파스타 맛집", "강남역 조용한 카페", "강남역 보드게임카페"]
    );

    let plan_request = &llm.calls()[1].user_content;
    assert!(plan_request.contains("[사용자 키워드]\n강남역, 파스타"));
    assert!(plan_request.contains("[추가 요청사항]\n"));

    let view = build_map_view(&session.places, &session.hint);
    assert_eq!(view.center.latitude, 37.4981);
    assert_eq!(view.center.longitude, 127.0276);
    assert_eq!(view.markers.len(), 3);
    assert!(view.markers.iter().all(|m| m.color == "blue"));
}

#[tokio::test]
async fn test_removing_second_place_updates_hint_and_view() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역", "파스타"]}"#)
            .reply(three_queries()),
    );
    let state = app_state(llm, Arc::new(three_hits()));
    let id = session_on_refine(&state).await;
    state
        .pipeline()
        .generate_plan(id, vec!["강남역".into(), "파스타".into()], String::new())
        .await
        .unwrap();

    state
        .sessions
        .update(id, |s| s.toggle_removed("조용한카페"))
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.hint.compose(), "조용한카페 제외");

    let view = build_map_view(&session.places, &session.hint);
    assert_eq!(view.markers[1].color, "gray");
    assert_eq!(view.markers[0].color, "blue");
    match &view.rows[1] {
        chatplan_app::services::presenter::PlaceRow::Place { removed, link, .. } => {
            assert!(*removed);
            assert!(link.is_none());
        }
        other => panic!("unexpected row {:?}", other),
    }
}

#[tokio::test]
async fn test_search_error_aborts_whole_plan() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역", "파스타"]}"#)
            .reply(three_queries()),
    );
    let places = Arc::new(three_hits().failing("강남역 조용한 카페"));
    let state = app_state(llm, places.clone());
    let id = session_on_refine(&state).await;

    let result = state
        .pipeline()
        .generate_plan(id, vec!["강남역".into()], String::new())
        .await;
    assert!(matches!(result, Err(PipelineError::Places(_))));

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert!(session.places.is_empty());
    assert!(session.generated_queries.is_empty());
    assert_eq!(session.notices.len(), 1);
    assert_eq!(session.notices[0].level, NoticeLevel::Error);
    assert!(session.notices[0].message.starts_with("Google Maps API 호출 오류"));
    // third query never sent
    assert_eq!(places.calls().len(), 2);
}

#[tokio::test]
async fn test_empty_plan_makes_no_search_calls() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["카페"]}"#)
            .reply(r#"{"plan": []}"#),
    );
    let places = Arc::new(FakePlaceSearch::new());
    let state = app_state(llm, places.clone());
    let id = session_on_refine(&state).await;

    let result = state
        .pipeline()
        .generate_plan(id, vec!["카페".into()], String::new())
        .await;

    assert!(matches!(result, Err(PipelineError::NoQueries)));
    assert!(places.calls().is_empty());
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert_eq!(session.notices[0].message, "AI가 검색어를 생성하지 못했습니다.");
}

#[tokio::test]
async fn test_unmatched_query_becomes_not_found_entry() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역"]}"#)
            .reply(r#"{"plan": ["강남역 파스타 맛집", "없는 장소"]}"#),
    );
    let places = Arc::new(FakePlaceSearch::new().hit("강남역 파스타 맛집", "파스타집", 37.5, 127.0));
    let state = app_state(llm, places);
    let id = session_on_refine(&state).await;

    state
        .pipeline()
        .generate_plan(id, vec!["강남역".into()], String::new())
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(
        session.places[1],
        ResolvedPlace::not_found("없는 장소")
    );
    assert_eq!(session.places[0].display_name(), Some("파스타집"));
}

#[tokio::test]
async fn test_first_candidate_wins() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["카페"]}"#)
            .reply(r#"{"plan": ["카페"]}"#),
    );
    let places = Arc::new(
        FakePlaceSearch::new()
            .hit("카페", "첫번째", 37.1, 127.1)
            .hit("카페", "두번째", 37.2, 127.2),
    );
    let state = app_state(llm, places);
    let id = session_on_refine(&state).await;

    state
        .pipeline()
        .generate_plan(id, vec!["카페".into()], String::new())
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.places.len(), 1);
    assert_eq!(session.places[0].display_name(), Some("첫번째"));
}

#[tokio::test]
async fn test_extract_without_upload_warns() {
    let llm = Arc::new(FakeCompletionClient::new());
    let state = app_state(llm.clone(), Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    let result = state.pipeline().extract_keywords(id, None).await;

    assert!(matches!(result, Err(PipelineError::MissingTranscript)));
    assert!(llm.calls().is_empty());
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Upload);
    assert_eq!(session.notices[0].level, NoticeLevel::Warning);
    assert_eq!(session.notices[0].message, "파일을 먼저 업로드해줘!");
}

#[tokio::test]
async fn test_extract_reuses_stored_transcript() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .fail(LlmError::NetworkError("timeout".into()))
            .reply(r#"{"keywords": ["강남역"]}"#),
    );
    let state = app_state(llm.clone(), Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    let first = state
        .pipeline()
        .extract_keywords(id, Some(TRANSCRIPT.as_bytes().to_vec()))
        .await;
    assert!(matches!(first, Err(PipelineError::Llm(_))));
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Upload);
    assert!(session.notices[0].message.starts_with("채팅 분석 중 오류가 발생했습니다"));

    state.pipeline().extract_keywords(id, None).await.unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].user_content, TRANSCRIPT);
    assert_eq!(state.sessions.get(id).await.unwrap().keywords, vec!["강남역"]);
}

#[tokio::test]
async fn test_invalid_utf8_upload_is_rejected() {
    let llm = Arc::new(FakeCompletionClient::new());
    let state = app_state(llm.clone(), Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    let result = state
        .pipeline()
        .extract_keywords(id, Some(vec![0xff, 0xfe, 0x00]))
        .await;

    assert!(matches!(result, Err(PipelineError::InvalidUpload(_))));
    assert!(llm.calls().is_empty());
    assert!(state.sessions.get(id).await.unwrap().transcript.is_none());
}

#[tokio::test]
async fn test_non_json_extraction_stays_on_upload() {
    let llm = Arc::new(FakeCompletionClient::new().reply("sorry, I can't"));
    let state = app_state(llm, Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    let result = state
        .pipeline()
        .extract_keywords(id, Some(TRANSCRIPT.as_bytes().to_vec()))
        .await;

    assert!(matches!(result, Err(PipelineError::MalformedResponse(_))));
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Upload);
    assert!(session.keywords.is_empty());
}

#[tokio::test]
async fn test_missing_keywords_field_advances_with_empty_list() {
    let llm = Arc::new(FakeCompletionClient::new().reply(r#"{"tags": ["카페"]}"#));
    let state = app_state(llm, Arc::new(FakePlaceSearch::new()));
    let id = state.sessions.create().await;

    let result = state
        .pipeline()
        .extract_keywords(id, Some(TRANSCRIPT.as_bytes().to_vec()))
        .await;

    assert!(result.is_err());
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert!(session.keywords.is_empty());
    assert_eq!(
        session.notices[0].message,
        "AI가 예상치 못한 형식으로 키워드를 반환했습니다."
    );
}

#[tokio::test]
async fn test_new_plan_clears_removed_places() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역", "파스타"]}"#)
            .reply(three_queries())
            .reply(three_queries()),
    );
    let state = app_state(llm, Arc::new(three_hits()));
    let id = session_on_refine(&state).await;
    let pipeline = state.pipeline();

    pipeline
        .generate_plan(id, vec!["강남역".into()], String::new())
        .await
        .unwrap();
    state
        .sessions
        .update(id, |s| {
            s.toggle_removed("파스타집");
            s.transition_to(Page::Refine).unwrap();
        })
        .await
        .unwrap();

    pipeline
        .generate_plan(id, vec!["강남역".into()], "주차 가능".into())
        .await
        .unwrap();

    let session = state.sessions.get(id).await.unwrap();
    assert!(session.hint.removed().is_empty());
    assert_eq!(session.hint.compose(), "");
    assert_eq!(session.extra_requirements, "주차 가능");
}

#[tokio::test]
async fn test_unknown_session() {
    let state = app_state(
        Arc::new(FakeCompletionClient::new()),
        Arc::new(FakePlaceSearch::new()),
    );
    let missing = Uuid::new_v4();

    let result = state.pipeline().extract_keywords(missing, None).await;
    assert!(matches!(result, Err(PipelineError::SessionNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_planner_transport_error_stays_on_refine() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역"]}"#)
            .fail(LlmError::ApiError(503, "overloaded".into())),
    );
    let places = Arc::new(three_hits());
    let state = app_state(llm, places.clone());
    let id = session_on_refine(&state).await;

    let result = state
        .pipeline()
        .generate_plan(id, vec!["강남역".into()], String::new())
        .await;

    assert!(matches!(result, Err(PipelineError::Llm(LlmError::ApiError(503, _)))));
    assert!(places.calls().is_empty());
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert!(session.generated_queries.is_empty());
    assert_eq!(session.notices.len(), 1);
    assert_eq!(session.notices[0].level, NoticeLevel::Error);
    assert!(session.notices[0].message.starts_with("검색어 생성 중 오류가 발생했습니다"));
}

#[tokio::test]
async fn test_planner_non_json_reply_stays_on_refine() {
    let llm = Arc::new(
        FakeCompletionClient::new()
            .reply(r#"{"keywords": ["강남역"]}"#)
            .reply("here are three queries: a, b, c"),
    );
    let places = Arc::new(three_hits());
    let state = app_state(llm, places.clone());
    let id = session_on_refine(&state).await;

    let result = state
        .pipeline()
        .generate_plan(id, vec!["강남역".into()], String::new())
        .await;

    assert!(matches!(result, Err(PipelineError::MalformedResponse(_))));
    assert!(places.calls().is_empty());
    let session = state.sessions.get(id).await.unwrap();
    assert_eq!(session.page, Page::Refine);
    assert!(session.places.is_empty());
    assert_eq!(session.notices.len(), 1);
    assert_eq!(session.notices[0].level, NoticeLevel::Error);
    assert!(session.notices[0]
        .message
        .starts_with("AI 응답 처리 중 JSON 오류가 발생했습니다"));
}
