//! Refine page - keyword selection and extra requirements

use axum::response::Html;

use super::layout::{escape_html, page_shell, render_notices};
use crate::models::{Notice, SessionRecord};

const NO_KEYWORDS_MESSAGE: &str = "추출된 키워드가 없네요. 추가 요청사항을 직접 입력해 주세요.";
const EXTRA_PLACEHOLDER: &str = "예: 주차 가능한 곳, 도보 10분 이내";

pub fn render(session: &SessionRecord, notices: &[Notice]) -> Html<String> {
    let keyword_section = if session.keywords.is_empty() {
        format!(r#"<div class="notice notice-info">{}</div>"#, NO_KEYWORDS_MESSAGE)
    } else {
        let chips = session
            .keywords
            .iter()
            .map(|keyword| {
                let checked = if session.selected_keywords.contains(keyword) {
                    " checked"
                } else {
                    ""
                };
                format!(
                    r#"<label class="chip"><input type="checkbox" name="keyword" value="{value}"{checked}> {text}</label>"#,
                    value = escape_html(keyword),
                    checked = checked,
                    text = escape_html(keyword),
                )
            })
            .collect::<Vec<_>>()
            .join("\n                ");
        format!(
            r#"<fieldset>
                <legend>플랜에 반영할 키워드를 확인/삭제하세요.</legend>
                {}
            </fieldset>"#,
            chips
        )
    };

    let body = format!(
        r#"
        {notices}
        <form method="post" action="/session/{id}/plan">
            {keywords}
            <label for="extra">추가 요청사항을 입력하세요</label>
            <input type="text" id="extra" name="extra" value="{extra}" placeholder="{placeholder}">
            <button type="submit">이 조건으로 플랜 생성하기</button>
        </form>
"#,
        notices = render_notices(notices),
        id = session.session_id,
        keywords = keyword_section,
        extra = escape_html(&session.extra_requirements),
        placeholder = EXTRA_PLACEHOLDER,
    );

    page_shell(
        "대화에서 키워드를 찾았어요",
        "2단계: 키워드 확인",
        "",
        &body,
    )
}
