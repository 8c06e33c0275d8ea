//! Search-query planning from selected keywords and extra requirements

use serde_json::Value;

use super::llm_client::CompletionClient;
use super::pipeline::PipelineError;

/// System instruction for query generation
pub const QUERY_GENERATOR_PROMPT: &str = r#"
너는 사용자의 키워드를 바탕으로, Google 지도 검색에 사용할 검색어 3개를 생성하는 AI야.

[규칙]
1. [사용자 키워드]와 [추가 요청사항]을 조합해서, '식당', '카페', '문화/활동' 순서로 이어지는 1개의 플랜을 만들어.
2. 각 장소는 Google 지도 검색에 최적화된 "장소 + 키워드" 형태의 검색어여야 해.
   (예: "강남역 파스타", "강남역 분위기 좋은 카페", "강남역 CGV")
3. "근처", "주변", "가까운" 단어는 제외.
4. 오직 **JSON 객체(Dictionary) 형식**으로만 응답해.
5. JSON 객체는 **"plan"**이라는 키를 가져야 하고, 그 값은 3개의 **검색어 문자열 리스트**여야 해.
6. **문화** 라는 단어가 들어간 거 절대 넣지마 문화센터 등.

[예시]
{"plan": ["강남역 파스타", "강남역 분위기 좋은 카페", "강남역 CGV"]}
"#;

/// User content for the planning call
pub fn compose_plan_request(keywords: &[String], extra: &str) -> String {
    format!(
        "[사용자 키워드]\n{}\n\n[추가 요청사항]\n{}\n",
        keywords.join(", "),
        extra
    )
}

/// Extract the query list from the model's answer
///
/// Three queries are expected but only emptiness is rejected. Blank and
/// non-string entries do not count as queries.
pub fn parse_plan(text: &str) -> Result<Vec<String>, PipelineError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;

    let queries: Vec<String> = value
        .get("plan")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if queries.is_empty() {
        return Err(PipelineError::NoQueries);
    }

    if queries.len() != 3 {
        tracing::warn!(count = queries.len(), "Planner returned an unexpected number of queries");
    }

    Ok(queries)
}

/// Run the planning call
pub async fn plan_queries(
    client: &dyn CompletionClient,
    keywords: &[String],
    extra: &str,
) -> Result<Vec<String>, PipelineError> {
    let request = compose_plan_request(keywords, extra);
    let text = client.complete_json(QUERY_GENERATOR_PROMPT, &request).await?;
    parse_plan(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_request() {
        let body = compose_plan_request(&["강남역".to_string(), "파스타".to_string()], "주차 가능한 곳");
        assert_eq!(body, "[사용자 키워드]\n강남역, 파스타\n\n[추가 요청사항]\n주차 가능한 곳\n");
    }

    #[test]
    fn test_compose_request_empty_inputs() {
        let body = compose_plan_request(&[], "");
        assert_eq!(body, "[사용자 키워드]\n\n\n[추가 요청사항]\n\n");
    }

    #[test]
    fn test_parse_three_queries_in_order() {
        let queries =
            parse_plan(r#"{"plan": ["강남역 파스타", "강남역 분위기 좋은 카페", "강남역 CGV"]}"#).unwrap();
        assert_eq!(queries, vec!["강남역 파스타", "강남역 분위기 좋은 카페", "강남역 CGV"]);
    }

    #[test]
    fn test_missing_or_empty_plan_is_no_queries() {
        assert!(matches!(parse_plan(r#"{"plan": []}"#), Err(PipelineError::NoQueries)));
        assert!(matches!(parse_plan(r#"{"queries": ["a"]}"#), Err(PipelineError::NoQueries)));
        assert!(matches!(parse_plan(r#"{"plan": ["  ", 4]}"#), Err(PipelineError::NoQueries)));
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            parse_plan("강남역 파스타"),
            Err(PipelineError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_short_plan_accepted() {
        assert_eq!(parse_plan(r#"{"plan": ["a"]}"#).unwrap(), vec!["a"]);
    }
}
