//! Shared page shell and HTML helpers

use axum::response::Html;

use crate::models::{Notice, NoticeLevel};

/// Escape text for HTML element content and attribute values
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Pending notices as alert boxes
pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let class = match notice.level {
                NoticeLevel::Error => "notice-error",
                NoticeLevel::Warning => "notice-warning",
                NoticeLevel::Info => "notice-info",
            };
            format!(
                r#"<div class="notice {}">{}</div>"#,
                class,
                escape_html(&notice.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap page content in the common document, header and stylesheet
///
/// `head_extra` goes at the end of `<head>` (page-specific scripts/styles).
pub fn page_shell(title: &str, subtitle: &str, head_extra: &str, body: &str) -> Html<String> {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");
    let short_hash = git_hash.get(..8).unwrap_or(git_hash);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/chatplan.css">
    {head_extra}
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>{title}</h1>
                <p class="subtitle">{subtitle}</p>
            </div>
            <div class="header-right">
                <div>chatplan v{version}</div>
                <div>{short_hash} ({build_profile})</div>
                <div>{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
{body}
    </div>
</body>
</html>"#,
        title = escape_html(title),
        subtitle = escape_html(subtitle),
        head_extra = head_extra,
        version = version,
        short_hash = short_hash,
        build_profile = build_profile,
        build_timestamp = build_timestamp,
        body = body,
    ))
}
