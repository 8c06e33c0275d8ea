//! Sequential place resolution for a plan

use super::places_client::{PlaceSearch, PlacesError};
use crate::models::ResolvedPlace;

/// Resolve each query to its first search hit
///
/// Entries follow query order. A query with no hit becomes
/// `ResolvedPlace::NotFound`; any transport failure aborts the whole run and
/// earlier results are dropped.
pub async fn resolve_places(
    search: &dyn PlaceSearch,
    queries: &[String],
) -> Result<Vec<ResolvedPlace>, PlacesError> {
    let mut results = Vec::with_capacity(queries.len());

    for query in queries {
        let candidates = search.search_text(query).await.map_err(|e| {
            tracing::warn!(query = %query, error = %e, "Place search failed, aborting resolution");
            e
        })?;

        let entry = match candidates.into_iter().next() {
            Some(top) => top.into_resolved(query),
            None => {
                tracing::info!(query = %query, "No place found for query");
                ResolvedPlace::not_found(query.as_str())
            }
        };
        results.push(entry);
    }

    Ok(results)
}
