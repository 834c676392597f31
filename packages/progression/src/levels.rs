//! Title and progress lookup from lifetime XP.

use eco_map_progression_models::{LevelInfo, LevelThreshold};

/// Resolves `total_xp` against an ascending threshold table.
///
/// Picks the highest threshold at or below `total_xp`. XP below the first
/// threshold still maps to the first level.
///
/// # Panics
///
/// Panics if `thresholds` is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn level_info(total_xp: u64, thresholds: &[LevelThreshold]) -> LevelInfo {
    let index = thresholds
        .iter()
        .rposition(|t| total_xp >= t.min_xp)
        .unwrap_or(0);
    let current = &thresholds[index];
    let next = thresholds.get(index + 1);

    let progress = next.map_or(1.0, |next| {
        let span = next.min_xp.saturating_sub(current.min_xp);
        if span == 0 {
            1.0
        } else {
            (total_xp.saturating_sub(current.min_xp) as f64 / span as f64).clamp(0.0, 1.0)
        }
    });

    LevelInfo {
        level: current.level,
        title: current.title.clone(),
        current_xp: total_xp,
        next_level_xp: next.map(|t| t.min_xp),
        progress,
    }
}

/// Title for `total_xp` in the given table.
///
/// # Panics
///
/// Panics if `thresholds` is empty.
#[must_use]
pub fn title_for(total_xp: u64, thresholds: &[LevelThreshold]) -> String {
    level_info(total_xp, thresholds).title
}
