//! Root page handler - landing page

use axum::response::IntoResponse;

use super::layout::page_shell;

/// GET /
///
/// Explains the flow and offers a button that creates a fresh session.
pub async fn root_page() -> impl IntoResponse {
    let body = r#"
        <p>카카오톡 대화 내용을 올리면 AI가 대화 속 키워드를 찾아내고, 그 키워드로 갈 만한 장소를 지도에 표시해 드립니다.</p>
        <ol>
            <li>대화 파일(.txt)을 업로드합니다.</li>
            <li>추출된 키워드를 확인하고 추가 요청사항을 적습니다.</li>
            <li>지도에서 추천 장소를 보고 마음에 들지 않는 곳은 제외합니다.</li>
        </ol>
        <form method="post" action="/sessions">
            <button type="submit">시작하기</button>
        </form>
"#;

    page_shell(
        "카카오톡 채팅 기반 계획 생성기",
        "대화에서 약속 장소까지",
        "",
        body,
    )
}
