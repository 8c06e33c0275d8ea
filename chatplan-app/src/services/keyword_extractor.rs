//! Keyword extraction from a chat transcript

use serde_json::Value;

use super::llm_client::{CompletionClient, LlmError};

/// System instruction for keyword extraction
pub const CHAT_PARSER_PROMPT: &str = r#"
너는 카카오톡 대화 내용을 분석하여 핵심 키워드를 추출하는 전문가야.
사용자의 대화 내용에서 [약속 장소], [음식/메뉴], [시간], [주요 제약 조건]과 관련된 핵심 단어만 뽑아내.
[규칙]
1. 날짜, 시간, 사람 이름은 **무시해.**
2. "사진", "이모티콘", "샵검색", "파일" 같은 시스템 메시지는 **무시해.**
3. 인사말("안녕", "잘가"), 잡담("ㅋㅋㅋ", "ㅠㅠ")은 **무시해.**
4. "거기 차 댈 데 있어?" -> "주차" 처럼, **의미를 요약**해서 키워드로 만들어.
5. 오직 **JSON 객체(Dictionary) 형식**으로만 응답해.
6. JSON 객체는 **"keywords"**라는 키를 가져야 하고, 그 값은 **키워드 문자열의 리스트**여야 해.
[예시]
{"keywords": ["강남역", "파스타", "조용한 곳", "카페", "보드게임카페", "영화관", "쇼핑"]}
"#;

/// Interpretation of the model's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// `{"keywords": [...]}` (possibly empty)
    Keywords(Vec<String>),
    /// Valid JSON without a `keywords` list
    UnexpectedShape,
    /// Not JSON at all
    InvalidJson(String),
}

/// Interpret raw completion text
///
/// Non-string list elements are dropped.
pub fn parse_keywords(text: &str) -> Extraction {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return Extraction::InvalidJson(e.to_string()),
    };

    let Some(list) = value.get("keywords").and_then(Value::as_array) else {
        return Extraction::UnexpectedShape;
    };

    let keywords: Vec<String> = list
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                tracing::warn!(item = %item, "Dropping non-string keyword");
                None
            }
        })
        .collect();

    Extraction::Keywords(keywords)
}

/// Run the extraction call for `transcript`
pub async fn extract_keywords(
    client: &dyn CompletionClient,
    transcript: &str,
) -> Result<Extraction, LlmError> {
    let text = client.complete_json(CHAT_PARSER_PROMPT, transcript).await?;
    Ok(parse_keywords(&text))
}
