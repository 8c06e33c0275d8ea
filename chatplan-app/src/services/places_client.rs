//! Google Places text-search client
//!
//! One POST to `/v1/places:searchText` per query, asking only for display name,
//! location and canonical map link.

use async_trait::async_trait;
use chatplan_common::config::PlacesConfig;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Coordinates, ResolvedPlace};

/// Fields requested from the Places API
pub const FIELD_MASK: &str = "places.displayName,places.location,places.googleMapsUri";

/// Place-search client errors
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One search candidate as returned by the provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub display_name: Option<LocalizedText>,
    pub location: Option<LatLng>,
    pub google_maps_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<PlaceCandidate>,
}

impl PlaceCandidate {
    /// Convert to a plan entry; a candidate with no display name counts as no hit
    pub fn into_resolved(self, query: &str) -> ResolvedPlace {
        match self.display_name {
            Some(name) => ResolvedPlace::Found {
                display_name: name.text,
                location: self
                    .location
                    .map(|l| Coordinates::new(l.latitude, l.longitude)),
                maps_uri: self.google_maps_uri,
            },
            None => ResolvedPlace::not_found(query),
        }
    }
}

/// Text search over a place database
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Candidates for `query`, best first; an empty list is a valid answer
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError>;
}

/// Google Places API (New) client
pub struct GooglePlacesClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    language_code: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: impl Into<String>, config: &PlacesConfig) -> Result<Self, PlacesError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlacesError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language_code: config.language_code.clone(),
        })
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn search_text(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let url = format!("{}/v1/places:searchText", self.base_url);

        tracing::debug!(query = %query, language = %self.language_code, "Querying Places text search");

        let response = self
            .http_client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&json!({
                "textQuery": query,
                "languageCode": self.language_code,
            }))
            .send()
            .await
            .map_err(|e| PlacesError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlacesError::ApiError(status.as_u16(), error_text));
        }

        let result: SearchTextResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::ParseError(e.to_string()))?;

        tracing::debug!(query = %query, candidates = result.places.len(), "Places text search returned");

        Ok(result.places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserialization() {
        let body = r#"{
            "places": [{
                "displayName": {"text": "스파게티 스토리", "languageCode": "ko"},
                "location": {"latitude": 37.4981, "longitude": 127.0276},
                "googleMapsUri": "https://maps.google.com/?cid=123"
            }]
        }"#;
        let parsed: SearchTextResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.places.len(), 1);

        let resolved = parsed.places[0].clone().into_resolved("강남역 파스타");
        assert_eq!(resolved.display_name(), Some("스파게티 스토리"));
        assert_eq!(resolved.location(), Some(Coordinates::new(37.4981, 127.0276)));
    }

    #[test]
    fn test_empty_body_means_no_candidates() {
        let parsed: SearchTextResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.places.is_empty());
    }

    #[test]
    fn test_nameless_candidate_is_not_found() {
        let candidate = PlaceCandidate {
            display_name: None,
            location: None,
            google_maps_uri: None,
        };
        assert_eq!(
            candidate.into_resolved("강남역 CGV"),
            ResolvedPlace::not_found("강남역 CGV")
        );
    }
}
