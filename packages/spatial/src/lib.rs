#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle distance and proximity clustering for map spots.
//!
//! The catalog holds thousands of spots, many of them fragments of the
//! same park or facilities sitting inside one another. Clustering runs
//! once at catalog load time and collapses them into map markers:
//!
//! 1. Same-category spots within 1 km merge (sections of one large park).
//! 2. Any spots within 300 m merge (a sports ground inside a park).
//!
//! Candidate lookup goes through a [`grid::SpatialGrid`]; the final
//! decision always uses [`haversine_meters`].

pub mod cluster;
pub mod grid;

use eco_map_spot_models::LatLng;
use serde::{Deserialize, Serialize};

pub use cluster::{ClusterPass, ClusterSummary, cluster_pass, cluster_spots};

/// Mean Earth radius used for all distance checks.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine great-circle distance between two points, in meters.
#[must_use]
pub fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    EARTH_RADIUS_METERS * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Clustering parameters.
///
/// The defaults reproduce the production catalog behavior; every field
/// can be overridden from a TOML `[cluster]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Passes applied in order, each over the previous pass's output.
    pub passes: Vec<ClusterPass>,
    /// Latitude (degrees) used to widen longitude cells.
    pub reference_latitude: f64,
    /// Meters per degree of latitude used to size grid cells.
    pub meters_per_degree: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            passes: vec![
                ClusterPass {
                    radius_meters: 1000.0,
                    same_category_only: true,
                },
                ClusterPass {
                    radius_meters: 300.0,
                    same_category_only: false,
                },
            ],
            reference_latitude: 37.4,
            meters_per_degree: 111_000.0,
        }
    }
}
