//! Upload page

use axum::response::Html;

use super::layout::{page_shell, render_notices};
use crate::models::{Notice, SessionRecord};

pub fn render(session: &SessionRecord, notices: &[Notice]) -> Html<String> {
    let stored = match &session.transcript {
        Some(text) => format!(
            r#"<p class="muted">이전에 업로드한 대화({}자)가 있습니다. 파일을 고르지 않으면 그 대화를 다시 분석합니다.</p>"#,
            text.chars().count()
        ),
        None => String::new(),
    };

    let body = format!(
        r#"
        {notices}
        <form method="post" action="/session/{id}/extract" enctype="multipart/form-data">
            <label for="transcript">카카오톡 대화 내용(.txt)을 업로드하세요</label>
            <input type="file" id="transcript" name="transcript" accept=".txt,text/plain">
            {stored}
            <button type="submit">키워드 추출하기</button>
        </form>
"#,
        notices = render_notices(notices),
        id = session.session_id,
        stored = stored,
    );

    page_shell(
        "카카오톡 채팅 기반 계획 생성기",
        "1단계: 대화 업로드",
        "",
        &body,
    )
}
