//! Badge requirement evaluation.

use eco_map_progression_models::{BadgeDefinition, BadgeRequirement, ProgressionState};

/// Whether `requirement` holds for the current stats and streak.
#[must_use]
pub fn requirement_met(requirement: &BadgeRequirement, state: &ProgressionState) -> bool {
    let stats = &state.stats;
    match *requirement {
        BadgeRequirement::Visits { count } => stats.total_visits >= count,
        BadgeRequirement::Category { category, count } => stats.category_count(category) >= count,
        BadgeRequirement::Regions { count } => stats.unique_regions() >= count,
        BadgeRequirement::Streak { days } => state.streak.current >= days,
        BadgeRequirement::EcoScore { score } => stats.total_eco_score >= score,
        BadgeRequirement::WeekendVisits { count } => stats.weekend_visits >= count,
    }
}

/// Appends every badge in `badges` that is not yet unlocked and whose
/// requirement now holds. Returns the newly unlocked IDs in table order.
///
/// Running this twice without a state change unlocks nothing the second
/// time.
pub fn evaluate_badges(state: &mut ProgressionState, badges: &[BadgeDefinition]) -> Vec<String> {
    let current: &ProgressionState = state;
    let newly_unlocked: Vec<String> = badges
        .iter()
        .filter(|badge| !current.has_badge(&badge.id))
        .filter(|badge| requirement_met(&badge.requirement, current))
        .map(|badge| badge.id.clone())
        .collect();

    for id in &newly_unlocked {
        log::info!("Badge unlocked: {id}");
    }

    state.unlocked_badge_ids.extend(newly_unlocked.iter().cloned());
    newly_unlocked
}

/// The first `limit` badges the user has not unlocked, in table order.
///
/// This filters on unlock status, not on [`requirement_met`]. A badge
/// already earned never reappears even after its requirement stops
/// holding (a broken streak), and a locked badge whose requirement holds
/// stays listed until [`evaluate_badges`] records it.
#[must_use]
pub fn next_badges<'a>(
    state: &ProgressionState,
    badges: &'a [BadgeDefinition],
    limit: usize,
) -> Vec<&'a BadgeDefinition> {
    badges
        .iter()
        .filter(|badge| !state.has_badge(&badge.id))
        .take(limit)
        .collect()
}

/// Definitions for the user's unlocked badges, in unlock order.
///
/// IDs with no definition in `badges` are skipped.
#[must_use]
pub fn unlocked_badges<'a>(
    state: &ProgressionState,
    badges: &'a [BadgeDefinition],
) -> Vec<&'a BadgeDefinition> {
    state
        .unlocked_badge_ids
        .iter()
        .filter_map(|id| badges.iter().find(|badge| &badge.id == id))
        .collect()
}
