//! Environmental contribution summaries for unlocked spots.

use std::collections::BTreeMap;

use eco_map_spot_models::{ClusteredSpot, NormalizedSpot, SpotCategory};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Carbon offset credited per point of total eco score.
const CARBON_OFFSET_PER_POINT: f64 = 0.5;

/// How far along a user is, by number of unlocked spots.
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
pub enum ImpactLevel {
    /// Fewer than 5 spots
    Beginner,
    /// 5 to 19 spots
    Intermediate,
    /// 20 to 49 spots
    Advanced,
    /// 50 or more spots
    Master,
}

impl ImpactLevel {
    #[must_use]
    pub const fn for_visits(visited: usize) -> Self {
        match visited {
            0..=4 => Self::Beginner,
            5..=19 => Self::Intermediate,
            20..=49 => Self::Advanced,
            _ => Self::Master,
        }
    }
}

/// A user's combined contribution across the spots they have unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContribution {
    /// Sum of `scores.total` over visited spots.
    pub total_score: f64,
    pub visited_count: usize,
    pub category_breakdown: BTreeMap<SpotCategory, usize>,
    pub region_breakdown: BTreeMap<String, usize>,
    pub impact_level: ImpactLevel,
}

/// Score breakdown and estimated impact for one spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotImpact {
    pub spot_name: String,
    pub category: SpotCategory,
    pub total_score: f64,
    pub area_score: f64,
    pub accessibility_score: f64,
    pub uniqueness_score: f64,
    pub carbon_offset: f64,
    pub description: String,
}

/// Summarizes the catalog spots whose IDs appear in `unlocked_ids`.
///
/// IDs absent from the catalog are ignored.
#[must_use]
pub fn user_contribution(spots: &[ClusteredSpot], unlocked_ids: &[String]) -> UserContribution {
    let visited: Vec<&NormalizedSpot> = spots
        .iter()
        .filter(|s| unlocked_ids.iter().any(|id| id == s.id()))
        .map(|s| &s.spot)
        .collect();

    let mut category_breakdown = BTreeMap::new();
    let mut region_breakdown = BTreeMap::new();

    for spot in &visited {
        *category_breakdown.entry(spot.category).or_insert(0) += 1;
        if !spot.region.is_empty() {
            *region_breakdown.entry(spot.region.clone()).or_insert(0) += 1;
        }
    }

    UserContribution {
        total_score: visited.iter().map(|s| s.eco_scores.total).sum(),
        visited_count: visited.len(),
        category_breakdown,
        region_breakdown,
        impact_level: ImpactLevel::for_visits(visited.len()),
    }
}

#[must_use]
pub fn spot_impact(spot: &NormalizedSpot) -> SpotImpact {
    let scores = spot.eco_scores;
    SpotImpact {
        spot_name: spot.name.clone(),
        category: spot.category,
        total_score: scores.total,
        area_score: scores.area,
        accessibility_score: scores.accessibility,
        uniqueness_score: scores.uniqueness,
        carbon_offset: scores.total * CARBON_OFFSET_PER_POINT,
        description: spot.description.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use eco_map_spot_models::{EcoScores, LatLng, Mission};

    use super::*;

    fn spot(id: &str, category: SpotCategory, region: &str, total: f64) -> ClusteredSpot {
        ClusteredSpot::single(NormalizedSpot {
            id: id.to_string(),
            name: id.to_string(),
            display_name: id.to_string(),
            category,
            spot_type: None,
            location: Some(LatLng::new(37.3, 127.0)),
            district: None,
            region: region.to_string(),
            neighborhood: None,
            address: None,
            description: None,
            area_sqm: None,
            area_display: None,
            eco_scores: EcoScores {
                total,
                area: 10.0,
                ..EcoScores::default()
            },
            mission: Mission {
                reward: 10,
                description: String::new(),
            },
            priority: false,
            best_season: vec![],
        })
    }

    #[test]
    fn impact_level_thresholds() {
        assert_eq!(ImpactLevel::for_visits(0), ImpactLevel::Beginner);
        assert_eq!(ImpactLevel::for_visits(5), ImpactLevel::Intermediate);
        assert_eq!(ImpactLevel::for_visits(20), ImpactLevel::Advanced);
        assert_eq!(ImpactLevel::for_visits(50), ImpactLevel::Master);
    }

    #[test]
    fn contribution_counts_only_unlocked_catalog_spots() {
        let spots = vec![
            spot("a", SpotCategory::Nature, "수원시", 40.0),
            spot("b", SpotCategory::Water, "안산시", 30.0),
            spot("c", SpotCategory::Nature, "", 20.0),
        ];
        let unlocked = vec!["a".to_string(), "c".to_string(), "ghost".to_string()];

        let contribution = user_contribution(&spots, &unlocked);
        assert_eq!(contribution.visited_count, 2);
        assert!((contribution.total_score - 60.0).abs() < f64::EPSILON);
        assert_eq!(contribution.category_breakdown[&SpotCategory::Nature], 2);
        assert_eq!(contribution.region_breakdown.len(), 1);
        assert_eq!(contribution.impact_level, ImpactLevel::Beginner);
    }

    #[test]
    fn impact_derives_carbon_offset() {
        let impact = spot_impact(&spot("a", SpotCategory::Nature, "수원시", 80.0).spot);
        assert!((impact.carbon_offset - 40.0).abs() < f64::EPSILON);
        assert!((impact.area_score - 10.0).abs() < f64::EPSILON);
    }
}
