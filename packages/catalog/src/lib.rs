#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The in-memory spot catalog.
//!
//! Loads raw spot records from JSON, runs them through
//! [`normalize`] and [`eco_map_spatial::cluster_spots`] once, and serves
//! the resulting map markers for lookup, filtering, and search.

pub mod analysis;
pub mod normalize;
pub mod registry;

use std::collections::BTreeMap;
use std::path::Path;

use eco_map_spatial::{ClusterConfig, ClusterSummary};
use eco_map_spot_models::{
    ClusteredSpot, CourseSelector, RawSpot, Season, SpotCategory, SpotLookup, TravelCourse,
};
use serde::Serialize;

/// Maximum number of results returned by [`Catalog::search`].
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Maximum number of stops on a travel course.
pub const MAX_COURSE_SPOTS: usize = 5;

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error reading the catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but not a spot list.
    #[error("Unexpected catalog shape: {message}")]
    Shape {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses raw spot records from catalog JSON.
///
/// Accepts either `{ "spots": [...] }` or a bare array. Individual records
/// that fail to parse are skipped with a warning rather than rejecting the
/// whole catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] if the document is not JSON or holds no spot
/// array.
pub fn load_raw_spots(json: &str) -> Result<Vec<RawSpot>, CatalogError> {
    let document: serde_json::Value = serde_json::from_str(json)?;

    let records = match document {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut map) => match map.remove("spots") {
            Some(serde_json::Value::Array(records)) => records,
            _ => {
                return Err(CatalogError::Shape {
                    message: "expected a `spots` array".to_string(),
                });
            }
        },
        _ => {
            return Err(CatalogError::Shape {
                message: "expected an array or an object".to_string(),
            });
        }
    };

    let total = records.len();
    let spots: Vec<RawSpot> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(spot) => Some(spot),
            Err(e) => {
                log::warn!("Skipping malformed spot record #{index}: {e}");
                None
            }
        })
        .collect();

    log::debug!("Parsed {}/{total} spot records", spots.len());
    Ok(spots)
}

/// Region and category filter for map display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotFilter {
    /// `None` means all regions, which shows only priority spots.
    pub region: Option<String>,
    /// `None` means all categories.
    pub category: Option<SpotCategory>,
}

/// How many markers a filter puts on the map, out of how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotDisplayInfo {
    pub showing: usize,
    /// Whole catalog for the all-regions view, else the selected region.
    pub total: usize,
    /// True when markers are being held back (all-regions view).
    pub is_filtered: bool,
}

/// Clustered spots ready for map rendering and unlock lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    spots: Vec<ClusteredSpot>,
    index: BTreeMap<String, usize>,
    summary: ClusterSummary,
}

impl Catalog {
    /// Normalizes and clusters raw records.
    #[must_use]
    pub fn build(raw: &[RawSpot], config: &ClusterConfig) -> Self {
        let normalized = normalize::normalize_spots(raw);
        let (spots, summary) = eco_map_spatial::cluster_spots(normalized, config);
        Self::from_clustered(spots, summary)
    }

    /// Wraps spots that were already clustered.
    #[must_use]
    pub fn from_clustered(spots: Vec<ClusteredSpot>, summary: ClusterSummary) -> Self {
        let index = spots
            .iter()
            .enumerate()
            .map(|(i, spot)| (spot.id().to_string(), i))
            .collect();

        Self {
            spots,
            index,
            summary,
        }
    }

    /// Parses catalog JSON, then normalizes and clusters it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON cannot be parsed.
    pub fn from_json_str(json: &str, config: &ClusterConfig) -> Result<Self, CatalogError> {
        let raw = load_raw_spots(json)?;
        Ok(Self::build(&raw, config))
    }

    /// Reads a catalog JSON file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path, config: &ClusterConfig) -> Result<Self, CatalogError> {
        log::info!("Loading spot catalog from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json, config)
    }

    #[must_use]
    pub fn spots(&self) -> &[ClusteredSpot] {
        &self.spots
    }

    #[must_use]
    pub fn into_spots(self) -> Vec<ClusteredSpot> {
        self.spots
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Counts from the clustering run that built this catalog.
    #[must_use]
    pub const fn summary(&self) -> &ClusterSummary {
        &self.summary
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ClusteredSpot> {
        self.index.get(id).map(|&i| &self.spots[i])
    }

    /// Must-show spots (designated parks, national rivers, protected areas).
    pub fn priority_spots(&self) -> impl Iterator<Item = &ClusteredSpot> {
        self.spots.iter().filter(|s| s.spot.priority)
    }

    /// Spots to place on the map for the given filter.
    ///
    /// With no region selected only priority spots are shown, which keeps
    /// the province-wide view to a manageable number of markers.
    #[must_use]
    pub fn filter(&self, filter: &SpotFilter) -> Vec<&ClusteredSpot> {
        self.spots
            .iter()
            .filter(|s| match &filter.region {
                Some(region) => s.spot.region == *region,
                None => s.spot.priority,
            })
            .filter(|s| filter.category.is_none_or(|c| s.spot.category == c))
            .collect()
    }

    /// Case-insensitive substring search over name, district, type, and
    /// address. Returns at most [`MAX_SEARCH_RESULTS`] spots in catalog
    /// order; a blank query returns nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ClusteredSpot> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let matches = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&query))
        };

        self.spots
            .iter()
            .filter(|s| {
                matches(Some(&s.spot.name))
                    || matches(s.spot.district.as_deref())
                    || matches(s.spot.spot_type.as_deref())
                    || matches(s.spot.address.as_deref())
            })
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }

    /// Marker counts for the given filter.
    ///
    /// The all-regions view reports the priority spots against the whole
    /// catalog regardless of category.
    #[must_use]
    pub fn display_info(&self, filter: &SpotFilter) -> SpotDisplayInfo {
        match &filter.region {
            None => SpotDisplayInfo {
                showing: self.priority_spots().count(),
                total: self.len(),
                is_filtered: true,
            },
            Some(region) => SpotDisplayInfo {
                showing: self.filter(filter).len(),
                total: self.region_spot_count(region),
                is_filtered: false,
            },
        }
    }

    /// Number of spots in `region`.
    #[must_use]
    pub fn region_spot_count(&self, region: &str) -> usize {
        self.spots.iter().filter(|s| s.spot.region == region).count()
    }

    /// Stops on `course`: the first [`MAX_COURSE_SPOTS`] spots its selector
    /// matches, in catalog order.
    #[must_use]
    pub fn course_spots(&self, course: &TravelCourse) -> Vec<&ClusteredSpot> {
        self.spots
            .iter()
            .filter(|s| selects(&course.spots, s))
            .take(MAX_COURSE_SPOTS)
            .collect()
    }

    /// Spots recommended for the given season.
    pub fn in_season(&self, season: Season) -> impl Iterator<Item = &ClusteredSpot> {
        self.spots.iter().filter(move |s| s.spot.in_season(season))
    }

    /// Number of distinct non-empty regions in the catalog.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.spots
            .iter()
            .map(|s| s.spot.region.as_str())
            .filter(|r| !r.is_empty())
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }
}

fn selects(selector: &CourseSelector, spot: &ClusteredSpot) -> bool {
    selector
        .name_contains
        .as_deref()
        .is_none_or(|needle| spot.spot.name.contains(needle))
        && selector
            .region
            .as_deref()
            .is_none_or(|region| spot.spot.region == region)
        && selector.category.is_none_or(|c| spot.spot.category == c)
}

impl SpotLookup for Catalog {
    fn find_spot(&self, id: &str) -> Option<&ClusteredSpot> {
        self.get(id)
    }
}
