//! Compile-time badge and level tables.
//!
//! Both tables live as TOML under `definitions/` and are embedded via
//! `include_str!`. They are parsed on first access and shared afterwards.

use std::sync::LazyLock;

use eco_map_progression_models::{BadgeDefinition, LevelThreshold};
use serde::Deserialize;

/// Number of defined badges. Enforced by a test.
#[cfg(test)]
const EXPECTED_BADGE_COUNT: usize = 14;

/// Number of defined levels. Enforced by a test.
#[cfg(test)]
const EXPECTED_LEVEL_COUNT: usize = 10;

const BADGES_TOML: &str = include_str!("../definitions/badges.toml");
const LEVELS_TOML: &str = include_str!("../definitions/levels.toml");

#[derive(Deserialize)]
struct BadgeTable {
    badges: Vec<BadgeDefinition>,
}

#[derive(Deserialize)]
struct LevelTable {
    levels: Vec<LevelThreshold>,
}

static BADGES: LazyLock<Vec<BadgeDefinition>> = LazyLock::new(|| {
    toml::de::from_str::<BadgeTable>(BADGES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse badge definitions: {e}"))
        .badges
});

static LEVELS: LazyLock<Vec<LevelThreshold>> = LazyLock::new(|| {
    toml::de::from_str::<LevelTable>(LEVELS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse level thresholds: {e}"))
        .levels
});

/// Returns every badge in evaluation order.
///
/// # Panics
///
/// Panics if the embedded badge TOML fails to parse. Since it is a
/// compile-time constant, a parse failure indicates a development error
/// and is caught by the tests below.
#[must_use]
pub fn all_badges() -> &'static [BadgeDefinition] {
    &BADGES
}

/// Looks up a badge by ID.
#[must_use]
pub fn badge(id: &str) -> Option<&'static BadgeDefinition> {
    all_badges().iter().find(|b| b.id == id)
}

/// Returns the level table in ascending XP order.
///
/// # Panics
///
/// Panics if the embedded level TOML fails to parse.
#[must_use]
pub fn level_thresholds() -> &'static [LevelThreshold] {
    &LEVELS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_badges() {
        let badges = all_badges();
        assert_eq!(
            badges.len(),
            EXPECTED_BADGE_COUNT,
            "Expected {EXPECTED_BADGE_COUNT} badges, found {}. \
             Update EXPECTED_BADGE_COUNT after adding/removing badges.",
            badges.len()
        );
    }

    #[test]
    fn badge_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for badge in all_badges() {
            assert!(seen.insert(&badge.id), "Duplicate badge ID: {}", badge.id);
        }
    }

    #[test]
    fn badges_have_required_fields() {
        for badge in all_badges() {
            assert!(!badge.id.is_empty(), "Badge has empty id");
            assert!(!badge.name.is_empty(), "Badge {} has empty name", badge.id);
            assert!(!badge.emoji.is_empty(), "Badge {} has empty emoji", badge.id);
        }
    }

    #[test]
    fn loads_all_levels() {
        let levels = level_thresholds();
        assert_eq!(
            levels.len(),
            EXPECTED_LEVEL_COUNT,
            "Expected {EXPECTED_LEVEL_COUNT} levels, found {}. \
             Update EXPECTED_LEVEL_COUNT after adding/removing levels.",
            levels.len()
        );
        assert_eq!(levels[0].min_xp, 0, "First level must start at 0 XP");
    }

    #[test]
    fn level_thresholds_ascend() {
        for pair in level_thresholds().windows(2) {
            assert!(
                pair[0].min_xp < pair[1].min_xp,
                "Level {} threshold {} is not below level {} threshold {}",
                pair[0].level,
                pair[0].min_xp,
                pair[1].level,
                pair[1].min_xp
            );
            assert_eq!(pair[0].level + 1, pair[1].level);
        }
    }

    #[test]
    fn badge_lookup_by_id() {
        assert_eq!(badge("streak_3").map(|b| b.emoji.as_str()), Some("🔥"));
        assert!(badge("nope").is_none());
    }
}
