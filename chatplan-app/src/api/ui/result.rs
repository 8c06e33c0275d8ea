//! Result page - map, place list and exclude hint

use axum::response::Html;
use serde_json::{json, Value};

use super::layout::{escape_html, page_shell, render_notices};
use crate::models::{Notice, SessionRecord};
use crate::services::presenter::{MapView, PlaceRow};
use crate::services::build_map_view;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

const EMPTY_PLAN_MESSAGE: &str = "플랜이 생성되지 않았습니다. 뒤로 돌아가 다시 시도해 주세요.";
const PLAN_TITLE: &str = "AI 추천 플랜 (1개)";
const NO_QUERIES_MESSAGE: &str = "생성된 검색어가 없습니다.";

pub fn render(session: &SessionRecord, notices: &[Notice]) -> Html<String> {
    let view = build_map_view(&session.places, &session.hint);
    let id = session.session_id;
    let hint = escape_html(&session.hint.compose());

    let plan_section = if session.places.is_empty() {
        format!(r#"<div class="notice notice-error">{}</div>"#, EMPTY_PLAN_MESSAGE)
    } else {
        format!(
            r#"<div class="columns">
            <div class="map-column"><div id="map"></div></div>
            <div class="list-column">
                <h2>📍 추천 장소 목록</h2>
                {rows}
            </div>
        </div>
        <script>{script}</script>"#,
            rows = render_rows(&view, id, &hint),
            script = map_script(&view),
        )
    };

    let body = format!(
        r#"
        {notices}
        <details>
            <summary>🤖 AI가 생성한 검색어 (1단계 결과)</summary>
            {queries}
        </details>
        {plan}
        <hr>
        <h2>🔁 플랜 수정하기</h2>
        <form method="post" action="/session/{id}/hint">
            <label for="hint">제외할 장소나 바꾸고 싶은 조건을 적어 주세요</label>
            <input type="text" id="hint" name="hint" value="{hint}">
            <button type="submit">적용</button>
            <button type="submit" formaction="/session/{id}/regenerate">이 조건으로 다시 생성하기</button>
        </form>
        <form method="post" action="/session/{id}/back">
            <button type="submit">◀ 키워드 수정으로 돌아가기</button>
        </form>
"#,
        notices = render_notices(notices),
        queries = render_queries(&session.generated_queries),
        plan = plan_section,
        id = id,
        hint = hint,
    );

    let head_extra = format!(
        r#"<link rel="stylesheet" href="{}">
    <script src="{}"></script>"#,
        LEAFLET_CSS, LEAFLET_JS
    );

    page_shell(
        PLAN_TITLE,
        "3단계: 장소 확인",
        &head_extra,
        &body,
    )
}

fn render_queries(queries: &[String]) -> String {
    if queries.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, NO_QUERIES_MESSAGE);
    }
    let items = queries
        .iter()
        .map(|q| format!("<li>{}</li>", escape_html(q)))
        .collect::<String>();
    format!("<ol>{}</ol>", items)
}

/// `hint` is the escaped composed hint, posted along with each toggle
fn render_rows(view: &MapView, session_id: uuid::Uuid, hint: &str) -> String {
    view.rows
        .iter()
        .map(|row| match row {
            PlaceRow::Place {
                index,
                name,
                removed,
                link,
            } => {
                let link_html = match link {
                    Some(uri) => format!(
                        r#"<a class="button" href="{}" target="_blank" rel="noopener">🔗 Google 지도로 보기</a>"#,
                        escape_html(uri)
                    ),
                    None => r#"<span class="button disabled">🔗 Google 지도로 보기</span>"#.to_string(),
                };
                format!(
                    r#"<div class="place-card{removed_class}" id="place-{index}">
                    <form method="post" action="/session/{id}/toggle">
                        <input type="hidden" name="name" value="{name}">
                        <input type="hidden" name="hint" value="{hint}">
                        <label><input type="checkbox" onchange="this.form.hint.value = document.getElementById('hint').value; this.form.submit()"{checked}> <span class="place-name">{index}. {name}</span></label>
                        <noscript><button type="submit">{toggle_label}</button></noscript>
                    </form>
                    {link}
                </div>"#,
                    removed_class = if *removed { " removed" } else { "" },
                    id = session_id,
                    name = escape_html(name),
                    hint = hint,
                    checked = if *removed { "" } else { " checked" },
                    index = index,
                    toggle_label = if *removed { "되살리기" } else { "제외하기" },
                    link = link_html,
                )
            }
            PlaceRow::Missing { index, query } => format!(
                r#"<div class="notice notice-error">장소 {}을(를) 찾지 못했습니다. (검색어: {})</div>"#,
                index,
                escape_html(query)
            ),
        })
        .collect::<Vec<_>>()
        .join("\n                ")
}

/// Inline Leaflet setup; marker labels are pre-escaped HTML
fn map_script(view: &MapView) -> String {
    let markers: Vec<Value> = view
        .markers
        .iter()
        .map(|m| {
            json!({
                "lat": m.location.latitude,
                "lng": m.location.longitude,
                "color": m.color,
                "popup": format!("<b>{}. {}</b>", m.index, escape_html(&m.name)),
                "tooltip": escape_html(&m.name),
            })
        })
        .collect();

    let data = json!({
        "center": [view.center.latitude, view.center.longitude],
        "zoom": view.zoom,
        "markers": markers,
    })
    .to_string()
    // keep "</script>" inside string values from closing the tag
    .replace("</", "<\\/");

    format!(
        r#"
        const plan = {data};
        const map = L.map('map').setView(plan.center, plan.zoom);
        L.tileLayer('{tiles}', {{ attribution: '{attribution}' }}).addTo(map);
        for (const m of plan.markers) {{
            L.circleMarker([m.lat, m.lng], {{ radius: 10, color: m.color, fillColor: m.color, fillOpacity: 0.8 }})
                .bindPopup(m.popup)
                .bindTooltip(m.tooltip)
                .addTo(map);
        }}
"#,
        data = data,
        tiles = TILE_URL,
        attribution = TILE_ATTRIBUTION,
    )
}
