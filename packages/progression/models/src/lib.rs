#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Progression state and unlock result types.
//!
//! [`ProgressionState`] is the per-user record the unlock engine mutates.
//! It serializes to camelCase JSON so it can be handed as-is to whatever
//! persists or syncs it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use eco_map_spot_models::SpotCategory;
use serde::{Deserialize, Serialize};

/// XP threshold for leaving level 1.
pub const INITIAL_XP_TO_NEXT_LEVEL: u32 = 100;

/// Level and XP counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLevel {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP earned toward the next level. Always below `xp_to_next_level`.
    pub xp: u32,
    /// XP needed to leave the current level.
    pub xp_to_next_level: u32,
    /// Number of unlocked spots.
    pub total_stamps: u32,
    /// Lifetime XP.
    pub total_xp: u64,
}

impl Default for UserLevel {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: INITIAL_XP_TO_NEXT_LEVEL,
            total_stamps: 0,
            total_xp: 0,
        }
    }
}

/// Aggregated visit counters used for badge requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    pub total_visits: u32,
    pub category_visits: BTreeMap<SpotCategory, u32>,
    pub region_visits: BTreeMap<String, u32>,
    pub weekend_visits: u32,
    pub total_eco_score: f64,
    pub first_visit_date: Option<NaiveDate>,
}

impl VisitStats {
    #[must_use]
    pub fn category_count(&self, category: SpotCategory) -> u32 {
        self.category_visits.get(&category).copied().unwrap_or(0)
    }

    /// Number of distinct regions visited.
    #[must_use]
    pub fn unique_regions(&self) -> usize {
        self.region_visits.len()
    }
}

/// Consecutive-day visit streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_visit_date: Option<NaiveDate>,
}

/// One entry in the exploration log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub spot_id: String,
    pub spot_name: String,
    pub category: SpotCategory,
    pub visited_on: NaiveDate,
}

/// Everything the game remembers about one user.
///
/// Unlocked spots and badges are append-only; nothing in the engine ever
/// removes an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionState {
    pub user: UserLevel,
    /// Unlocked spot IDs in unlock order.
    pub unlocked_spot_ids: Vec<String>,
    /// Unlocked badge IDs in unlock order.
    pub unlocked_badge_ids: Vec<String>,
    pub stats: VisitStats,
    pub streak: Streak,
    /// Newest first.
    pub visit_history: Vec<VisitRecord>,
}

impl ProgressionState {
    #[must_use]
    pub fn is_spot_unlocked(&self, spot_id: &str) -> bool {
        self.unlocked_spot_ids.iter().any(|id| id == spot_id)
    }

    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.unlocked_badge_ids.iter().any(|id| id == badge_id)
    }
}

/// Condition under which a badge unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeRequirement {
    /// Total unlocked spots.
    Visits { count: u32 },
    /// Unlocked spots in one category.
    Category { category: SpotCategory, count: u32 },
    /// Distinct regions visited.
    Regions { count: usize },
    /// Current consecutive-day streak.
    Streak { days: u32 },
    /// Accumulated eco score.
    EcoScore { score: f64 },
    /// Visits made on Saturday or Sunday.
    WeekendVisits { count: u32 },
}

/// A badge and the requirement that unlocks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub requirement: BadgeRequirement,
}

/// One row of the level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: u32,
    pub title: String,
    /// Lifetime XP required to reach this level.
    pub min_xp: u64,
}

/// Level derived from lifetime XP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub title: String,
    pub current_xp: u64,
    /// `None` at the top level.
    pub next_level_xp: Option<u64>,
    /// Fraction of the way to the next level, 1.0 at the top level.
    pub progress: f64,
}

/// Why an unlock attempt was refused. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnlockError {
    /// The spot is already unlocked.
    #[error("Spot {spot_id} is already unlocked")]
    AlreadyUnlocked {
        /// Requested spot ID.
        spot_id: String,
    },

    /// The catalog has no spot with this ID.
    #[error("Spot {spot_id} not found")]
    SpotNotFound {
        /// Requested spot ID.
        spot_id: String,
    },

    /// No current position fix was supplied.
    #[error("Current location is unavailable")]
    NoLocation,

    /// The user is outside the unlock radius.
    #[error("Too far from spot: {distance_meters}m away")]
    TooFar {
        /// Distance to the spot, rounded to the nearest meter.
        distance_meters: u32,
    },
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockOutcome {
    /// XP awarded.
    pub reward: u32,
    /// Whether the reward crossed a level threshold.
    pub level_up: bool,
    /// Badges unlocked by this visit.
    pub new_badge_ids: Vec<String>,
}

/// Tunables for the unlock engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockConfig {
    /// Maximum distance (inclusive) between user and spot, in meters.
    pub max_distance_meters: f64,
    /// Reward used when a spot's mission reward is zero.
    pub default_reward: u32,
    /// Amount added to `xp_to_next_level` on every level-up.
    pub xp_step: u32,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            max_distance_meters: 500.0,
            default_reward: 50,
            xp_step: 50,
        }
    }
}

/// Read-only overview of a user's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_visits: u32,
    pub unlocked_count: usize,
    pub total_spots: usize,
    /// Unlocked share of the catalog, in percent.
    pub completion_rate: f64,
    pub unique_regions: usize,
    pub total_regions: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_eco_score: f64,
    pub badge_count: usize,
    pub total_badges: usize,
    pub level: u32,
    pub total_xp: u64,
    pub days_since_start: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_defaults() {
        let state = ProgressionState::default();
        assert_eq!(state.user.level, 1);
        assert_eq!(state.user.xp, 0);
        assert_eq!(state.user.xp_to_next_level, 100);
        assert!(state.unlocked_spot_ids.is_empty());
        assert_eq!(state.streak.current, 0);
    }

    #[test]
    fn state_roundtrips_through_camel_case_json() {
        let mut state = ProgressionState::default();
        state.unlocked_spot_ids.push("s1".to_string());
        state.stats.category_visits.insert(SpotCategory::Water, 2);
        state.streak.last_visit_date = NaiveDate::from_ymd_opt(2026, 5, 2);

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"unlockedSpotIds\""));
        assert!(json.contains("\"xpToNextLevel\""));
        assert!(json.contains("\"water\":2"));

        let back: ProgressionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn partial_state_json_fills_defaults() {
        let state: ProgressionState =
            serde_json::from_str(r#"{ "unlockedSpotIds": ["a"] }"#).unwrap();
        assert!(state.is_spot_unlocked("a"));
        assert_eq!(state.user, UserLevel::default());
    }

    #[test]
    fn badge_requirement_tagging() {
        let requirement: BadgeRequirement =
            serde_json::from_str(r#"{ "type": "category", "category": "water", "count": 5 }"#)
                .unwrap();
        assert_eq!(
            requirement,
            BadgeRequirement::Category {
                category: SpotCategory::Water,
                count: 5
            }
        );
    }

    #[test]
    fn too_far_message_includes_distance() {
        let err = UnlockError::TooFar {
            distance_meters: 742,
        };
        assert_eq!(err.to_string(), "Too far from spot: 742m away");
    }
}
