#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spot category taxonomy and record types.
//!
//! A spot moves through three shapes on its way to the map:
//!
//! 1. [`RawSpot`] as it appears in the catalog JSON, with most fields
//!    optional and inconsistently present.
//! 2. [`NormalizedSpot`] once defaults are applied and a display name is
//!    resolved. Downstream code never has to null-check scores or missions.
//! 3. [`ClusteredSpot`] once nearby spots have been merged into a single
//!    map marker.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Top-level spot categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpotCategory {
    /// Parks, forests, and green space
    Nature,
    /// Rivers, lakes, and reservoirs
    Water,
    /// Wetlands and protected habitats
    Ecology,
    /// Sports and recreation facilities
    Sports,
    /// Cultural and civic facilities
    Culture,
}

impl SpotCategory {
    /// Human-readable label shown in category filters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nature => "자연",
            Self::Water => "수자원",
            Self::Ecology => "생태",
            Self::Sports => "체육",
            Self::Culture => "문화",
        }
    }

    /// Marker emoji used when a spot has no thumbnail of its own.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Nature => "🌳",
            Self::Water => "💧",
            Self::Ecology => "🦋",
            Self::Sports => "⚽",
            Self::Culture => "🏛️",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Nature,
            Self::Water,
            Self::Ecology,
            Self::Sports,
            Self::Culture,
        ]
    }
}

/// Seasons a spot can be recommended for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Season {
    /// March through May
    Spring,
    /// June through August
    Summer,
    /// September through November
    Autumn,
    /// December through February
    Winter,
}

impl Season {
    /// Returns the season containing the given calendar month (1-12).
    ///
    /// Out-of-range months fall into winter.
    #[must_use]
    pub const fn for_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Spring, Self::Summer, Self::Autumn, Self::Winter]
    }
}

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Location as it appears in the catalog. Either coordinate may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl RawLocation {
    /// Returns a usable coordinate, or `None` when either component is
    /// missing, non-finite, out of range, or exactly zero (the catalog's
    /// placeholder for "not geocoded").
    #[must_use]
    pub fn resolve(&self) -> Option<LatLng> {
        let lat = self.lat.filter(|v| usable_degrees(*v, 90.0))?;
        let lng = self.lng.filter(|v| usable_degrees(*v, 180.0))?;
        Some(LatLng::new(lat, lng))
    }
}

fn usable_degrees(value: f64, limit: f64) -> bool {
    value.is_finite() && value != 0.0 && value.abs() <= limit
}

/// Sub-scores as they appear in the catalog. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub area: Option<f64>,
    pub accessibility: Option<f64>,
    pub uniqueness: Option<f64>,
    pub total: Option<f64>,
}

/// Mission block as it appears in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMission {
    /// XP awarded on unlock.
    pub reward: Option<u32>,
    /// Short call to action.
    pub description: Option<String>,
}

/// A point of interest exactly as loaded from the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpot {
    /// Stable identifier (e.g. `"park.1042"`).
    pub id: String,
    /// Source name. Sometimes a generic facility label instead of a proper noun.
    pub name: String,
    pub category: SpotCategory,
    /// Facility type label (e.g. "근린공원").
    #[serde(default, rename = "type")]
    pub spot_type: Option<String>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Neighborhood label attached out-of-band by reverse geocoding.
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Free text. May embed area hints ("약 1.5ha") and place names.
    #[serde(default)]
    pub description: Option<String>,
    /// Area in square meters.
    #[serde(default, rename = "area_sqm")]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub scores: Option<RawScores>,
    /// Must-show flag for designated parks, national rivers, and the like.
    #[serde(default)]
    pub priority: Option<bool>,
    #[serde(default)]
    pub mission: Option<RawMission>,
    /// Season labels. Unknown labels (such as `"ALL"`) are ignored during
    /// normalization.
    #[serde(default)]
    pub best_season: Vec<String>,
}

/// Fully-populated score set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EcoScores {
    pub area: f64,
    pub accessibility: f64,
    pub uniqueness: f64,
    pub total: f64,
}

/// The task a user completes to unlock a spot, and its XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub reward: u32,
    pub description: String,
}

/// A spot with defaults applied and a display name resolved.
///
/// The display name is never one of the generic facility labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpot {
    pub id: String,
    /// Source name, kept for search and mission text.
    pub name: String,
    /// Name to render on the map.
    pub display_name: String,
    pub category: SpotCategory,
    #[serde(rename = "type")]
    pub spot_type: Option<String>,
    /// `None` when the catalog record had no usable coordinates.
    pub location: Option<LatLng>,
    pub district: Option<String>,
    /// Region used for filtering and visit tallies: the source region,
    /// else the district, else empty.
    pub region: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// Known area in square meters, from `area_sqm` or parsed from the
    /// description.
    pub area_sqm: Option<f64>,
    /// Formatted area (e.g. "1.5ha").
    pub area_display: Option<String>,
    pub eco_scores: EcoScores,
    pub mission: Mission,
    pub priority: bool,
    /// Empty means every season.
    pub best_season: Vec<Season>,
}

impl NormalizedSpot {
    /// Whether this spot is recommended in the given season.
    #[must_use]
    pub fn in_season(&self, season: Season) -> bool {
        self.best_season.is_empty() || self.best_season.contains(&season)
    }
}

/// A map marker: the representative spot of a cluster plus the IDs it absorbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredSpot {
    #[serde(flatten)]
    pub spot: NormalizedSpot,
    /// Number of other spots absorbed, including spots absorbed transitively
    /// by earlier clustering passes.
    pub cluster_count: u32,
    /// IDs of every absorbed spot.
    pub cluster_ids: Vec<String>,
}

impl ClusteredSpot {
    /// Wraps a normalized spot as a cluster of one.
    #[must_use]
    pub const fn single(spot: NormalizedSpot) -> Self {
        Self {
            spot,
            cluster_count: 0,
            cluster_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.spot.id
    }

    #[must_use]
    pub const fn location(&self) -> Option<LatLng> {
        self.spot.location
    }

    /// The representative's `scores.total`.
    #[must_use]
    pub const fn total_score(&self) -> f64 {
        self.spot.eco_scores.total
    }
}

/// An administrative region (city or county) spots are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Matches [`NormalizedSpot::region`].
    pub id: String,
    pub name: String,
    pub emoji: String,
    /// Map center used when the region is selected.
    pub center: LatLng,
}

/// How hard a travel course is to walk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Which catalog spots belong to a course. Every criterion that is set
/// must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSelector {
    /// Substring of the spot's name.
    pub name_contains: Option<String>,
    pub region: Option<String>,
    pub category: Option<SpotCategory>,
}

/// A curated route through several spots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelCourse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Region the course is listed under.
    pub region: String,
    pub thumbnail: String,
    /// Free-text estimate such as "2-3시간".
    pub duration: String,
    /// Free-text estimate such as "약 5km".
    pub total_distance: String,
    pub difficulty: Difficulty,
    pub spots: CourseSelector,
}

/// Read access to a spot catalog by ID.
pub trait SpotLookup {
    /// Returns the spot with the given ID, if the catalog holds it.
    fn find_spot(&self, id: &str) -> Option<&ClusteredSpot>;
}

impl SpotLookup for [ClusteredSpot] {
    fn find_spot(&self, id: &str) -> Option<&ClusteredSpot> {
        self.iter().find(|spot| spot.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn category_string_roundtrip() {
        for category in SpotCategory::all() {
            let parsed = SpotCategory::from_str(category.as_ref()).unwrap();
            assert_eq!(parsed, *category);
        }
        assert!(SpotCategory::from_str("shopping").is_err());
    }

    #[test]
    fn season_for_month_boundaries() {
        assert_eq!(Season::for_month(2), Season::Winter);
        assert_eq!(Season::for_month(3), Season::Spring);
        assert_eq!(Season::for_month(8), Season::Summer);
        assert_eq!(Season::for_month(11), Season::Autumn);
        assert_eq!(Season::for_month(12), Season::Winter);
    }

    #[test]
    fn raw_location_rejects_out_of_range_degrees() {
        let far_north = RawLocation {
            lat: Some(1e300),
            lng: Some(127.0),
        };
        assert_eq!(far_north.resolve(), None);

        let wrapped = RawLocation {
            lat: Some(37.26),
            lng: Some(-180.5),
        };
        assert_eq!(wrapped.resolve(), None);

        let edges = RawLocation {
            lat: Some(-90.0),
            lng: Some(180.0),
        };
        assert_eq!(edges.resolve(), Some(LatLng::new(-90.0, 180.0)));
    }

    #[test]
    fn raw_location_rejects_missing_and_zero() {
        let full = RawLocation {
            lat: Some(37.26),
            lng: Some(127.02),
        };
        assert_eq!(full.resolve(), Some(LatLng::new(37.26, 127.02)));

        let missing = RawLocation {
            lat: Some(37.26),
            lng: None,
        };
        assert_eq!(missing.resolve(), None);

        let zero = RawLocation {
            lat: Some(0.0),
            lng: Some(127.02),
        };
        assert_eq!(zero.resolve(), None);

        let nan = RawLocation {
            lat: Some(f64::NAN),
            lng: Some(127.02),
        };
        assert_eq!(nan.resolve(), None);
    }

    #[test]
    fn raw_spot_parses_sparse_record() {
        let json = r#"{
            "id": "wetland.7",
            "name": "습지",
            "category": "ecology",
            "type": "습지",
            "area_sqm": 15000,
            "bestSeason": ["spring", "ALL"]
        }"#;
        let spot: RawSpot = serde_json::from_str(json).unwrap();
        assert_eq!(spot.category, SpotCategory::Ecology);
        assert_eq!(spot.spot_type.as_deref(), Some("습지"));
        assert_eq!(spot.area_sqm, Some(15000.0));
        assert!(spot.location.is_none());
        assert!(spot.scores.is_none());
        assert_eq!(spot.best_season, vec!["spring", "ALL"]);
    }

    #[test]
    fn course_selector_fields_default_to_unset() {
        let course: TravelCourse = serde_json::from_str(
            r#"{
                "id": "c1", "name": "n", "description": "d", "region": "안산시",
                "thumbnail": "🌊", "duration": "2시간", "total_distance": "약 3km",
                "difficulty": "hard", "spots": { "category": "water" }
            }"#,
        )
        .unwrap();
        assert_eq!(course.difficulty, Difficulty::Hard);
        assert_eq!(course.difficulty.to_string(), "hard");
        assert_eq!(course.spots.category, Some(SpotCategory::Water));
        assert!(course.spots.name_contains.is_none());
        assert!(course.spots.region.is_none());
        assert_eq!(Difficulty::from_str("easy").unwrap(), Difficulty::Easy);
    }

    #[test]
    fn slice_lookup_finds_by_id() {
        let spot = NormalizedSpot {
            id: "s1".to_string(),
            name: "광교호수공원".to_string(),
            display_name: "광교호수공원".to_string(),
            category: SpotCategory::Nature,
            spot_type: None,
            location: Some(LatLng::new(37.28, 127.06)),
            district: None,
            region: "수원시".to_string(),
            neighborhood: None,
            address: None,
            description: None,
            area_sqm: None,
            area_display: None,
            eco_scores: EcoScores::default(),
            mission: Mission {
                reward: 10,
                description: "Visit 광교호수공원".to_string(),
            },
            priority: false,
            best_season: vec![],
        };
        let catalog = vec![ClusteredSpot::single(spot)];
        assert!(catalog.as_slice().find_spot("s1").is_some());
        assert!(catalog.as_slice().find_spot("s2").is_none());
    }
}
