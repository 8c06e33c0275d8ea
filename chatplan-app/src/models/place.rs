//! Resolved place entries produced by the place resolver

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One entry of a plan's place list
///
/// Position `i` in the list always corresponds to query `i` of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolvedPlace {
    /// First search hit for the query
    Found {
        /// Localized display name (removal identity)
        display_name: String,
        /// Absent when the provider returned no location for the hit
        location: Option<Coordinates>,
        /// Canonical map link
        maps_uri: Option<String>,
    },
    /// The query returned zero candidates
    NotFound {
        /// Originating query text
        query: String,
    },
}

impl ResolvedPlace {
    pub fn found(display_name: impl Into<String>, location: Coordinates, maps_uri: impl Into<String>) -> Self {
        ResolvedPlace::Found {
            display_name: display_name.into(),
            location: Some(location),
            maps_uri: Some(maps_uri.into()),
        }
    }

    pub fn not_found(query: impl Into<String>) -> Self {
        ResolvedPlace::NotFound {
            query: query.into(),
        }
    }

    /// Display name for `Found` entries
    pub fn display_name(&self) -> Option<&str> {
        match self {
            ResolvedPlace::Found { display_name, .. } => Some(display_name),
            ResolvedPlace::NotFound { .. } => None,
        }
    }

    /// Coordinates for `Found` entries that carry a location
    pub fn location(&self) -> Option<Coordinates> {
        match self {
            ResolvedPlace::Found { location, .. } => *location,
            ResolvedPlace::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolvedPlace::Found { .. })
    }
}
