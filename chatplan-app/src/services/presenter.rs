//! Map view for the result page
//!
//! Removed places keep their marker; only the color changes and the outbound
//! link is withheld.

use serde::Serialize;

use crate::models::{Coordinates, ExcludeHint, ResolvedPlace};

/// Center used when no entry has coordinates (Gangnam Station)
pub const FALLBACK_CENTER: Coordinates = Coordinates {
    latitude: 37.4979,
    longitude: 127.0276,
};

/// Initial map zoom
pub const DEFAULT_ZOOM: u8 = 15;

/// Marker color of a kept place
pub const KEPT_COLOR: &str = "blue";
/// Marker color of a removed place
pub const REMOVED_COLOR: &str = "gray";

/// One map marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// 1-based position in the place list
    pub index: usize,
    pub name: String,
    pub location: Coordinates,
    pub removed: bool,
    pub color: &'static str,
}

/// One row of the place list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceRow {
    Place {
        index: usize,
        name: String,
        removed: bool,
        /// `None` when removed or when the provider gave no link
        link: Option<String>,
    },
    Missing {
        index: usize,
        query: String,
    },
}

/// Everything the result page draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub rows: Vec<PlaceRow>,
}

/// Map center: first kept located place, else first located place, else the fallback
pub fn map_center(places: &[ResolvedPlace], hint: &ExcludeHint) -> Coordinates {
    places
        .iter()
        .find_map(|p| match (p.display_name(), p.location()) {
            (Some(name), Some(loc)) if !hint.is_removed(name) => Some(loc),
            _ => None,
        })
        .or_else(|| places.iter().find_map(ResolvedPlace::location))
        .unwrap_or(FALLBACK_CENTER)
}

/// Build the map view for a place list and removal state
pub fn build_map_view(places: &[ResolvedPlace], hint: &ExcludeHint) -> MapView {
    let mut markers = Vec::new();
    let mut rows = Vec::with_capacity(places.len());

    for (i, place) in places.iter().enumerate() {
        let index = i + 1;
        match place {
            ResolvedPlace::Found {
                display_name,
                location,
                maps_uri,
            } => {
                let removed = hint.is_removed(display_name);
                if let Some(location) = location {
                    markers.push(MapMarker {
                        index,
                        name: display_name.clone(),
                        location: *location,
                        removed,
                        color: if removed { REMOVED_COLOR } else { KEPT_COLOR },
                    });
                }
                rows.push(PlaceRow::Place {
                    index,
                    name: display_name.clone(),
                    removed,
                    link: if removed { None } else { maps_uri.clone() },
                });
            }
            ResolvedPlace::NotFound { query } => rows.push(PlaceRow::Missing {
                index,
                query: query.clone(),
            }),
        }
    }

    MapView {
        center: map_center(places, hint),
        zoom: DEFAULT_ZOOM,
        markers,
        rows,
    }
}
