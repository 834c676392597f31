#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geolocation-gated spot unlocks and the progression they drive.
//!
//! [`attempt_unlock`] checks a visit against the catalog and the user's
//! position, then applies XP, level, streak, stats, and badge updates to a
//! [`ProgressionState`] in one commit. A refused attempt leaves the state
//! untouched.

pub mod badges;
pub mod levels;
pub mod registry;

use chrono::{Datelike as _, Local, NaiveDate, Weekday};
use eco_map_progression_models::{
    LevelInfo, ProgressionState, StatsSummary, UnlockConfig, UnlockError, UnlockOutcome,
    VisitRecord,
};
use eco_map_spot_models::{LatLng, NormalizedSpot, SpotLookup};

/// Tries to unlock `spot_id` for a user standing at `user_location` on
/// `today`.
///
/// Checks run in order: already unlocked, unknown spot, missing position
/// fix, then the distance gate (inclusive at
/// [`UnlockConfig::max_distance_meters`]).
///
/// # Errors
///
/// Returns [`UnlockError`] if any check fails. `state` is not modified in
/// that case.
pub fn attempt_unlock<C: SpotLookup + ?Sized>(
    state: &mut ProgressionState,
    catalog: &C,
    spot_id: &str,
    user_location: Option<LatLng>,
    today: NaiveDate,
    config: &UnlockConfig,
) -> Result<UnlockOutcome, UnlockError> {
    if state.is_spot_unlocked(spot_id) {
        return Err(UnlockError::AlreadyUnlocked {
            spot_id: spot_id.to_string(),
        });
    }

    // Catalog spots always carry a location; one without is not placeable
    // and counts as missing.
    let (spot, spot_location) = catalog
        .find_spot(spot_id)
        .and_then(|spot| spot.location().map(|location| (spot, location)))
        .ok_or_else(|| UnlockError::SpotNotFound {
            spot_id: spot_id.to_string(),
        })?;

    let user_location = user_location.ok_or(UnlockError::NoLocation)?;

    let distance = eco_map_spatial::haversine_meters(user_location, spot_location);
    if distance > config.max_distance_meters {
        log::debug!(
            "Refusing unlock of {spot_id}: {distance:.1}m away (limit {}m)",
            config.max_distance_meters
        );
        return Err(UnlockError::TooFar {
            distance_meters: round_meters(distance),
        });
    }

    let mut next = state.clone();
    let outcome = apply_visit(&mut next, &spot.spot, today, config);
    *state = next;

    log::info!(
        "Unlocked {spot_id} (+{} XP{})",
        outcome.reward,
        if outcome.level_up { ", level up" } else { "" }
    );

    Ok(outcome)
}

/// [`attempt_unlock`] using the local calendar date.
///
/// # Errors
///
/// Returns [`UnlockError`] if any unlock check fails.
pub fn attempt_unlock_now<C: SpotLookup + ?Sized>(
    state: &mut ProgressionState,
    catalog: &C,
    spot_id: &str,
    user_location: Option<LatLng>,
    config: &UnlockConfig,
) -> Result<UnlockOutcome, UnlockError> {
    attempt_unlock(
        state,
        catalog,
        spot_id,
        user_location,
        Local::now().date_naive(),
        config,
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_meters(distance: f64) -> u32 {
    distance.round() as u32
}

fn apply_visit(
    state: &mut ProgressionState,
    spot: &NormalizedSpot,
    today: NaiveDate,
    config: &UnlockConfig,
) -> UnlockOutcome {
    let reward = if spot.mission.reward == 0 {
        config.default_reward
    } else {
        spot.mission.reward
    };

    // Catalog rewards are arbitrary u32s; counters saturate instead of
    // wrapping.
    let user = &mut state.user;
    user.xp = user.xp.saturating_add(reward);
    user.total_xp = user.total_xp.saturating_add(u64::from(reward));
    let level_up = user.xp >= user.xp_to_next_level;
    if level_up {
        user.level = user.level.saturating_add(1);
        user.xp -= user.xp_to_next_level;
        user.xp_to_next_level = user.xp_to_next_level.saturating_add(config.xp_step);
    }
    user.total_stamps = user.total_stamps.saturating_add(1);

    let streak = &mut state.streak;
    if streak.last_visit_date != Some(today) {
        if streak.last_visit_date.is_some() && streak.last_visit_date == today.pred_opt() {
            streak.current += 1;
            streak.longest = streak.longest.max(streak.current);
        } else {
            streak.current = 1;
        }
        streak.last_visit_date = Some(today);
    }

    let stats = &mut state.stats;
    stats.total_visits += 1;
    *stats.category_visits.entry(spot.category).or_insert(0) += 1;
    if !spot.region.is_empty() {
        *stats.region_visits.entry(spot.region.clone()).or_insert(0) += 1;
    }
    if matches!(today.weekday(), Weekday::Sat | Weekday::Sun) {
        stats.weekend_visits += 1;
    }
    stats.total_eco_score += spot.eco_scores.total;
    stats.first_visit_date.get_or_insert(today);

    state.unlocked_spot_ids.push(spot.id.clone());
    state.visit_history.insert(
        0,
        VisitRecord {
            spot_id: spot.id.clone(),
            spot_name: spot.name.clone(),
            category: spot.category,
            visited_on: today,
        },
    );

    let new_badge_ids = badges::evaluate_badges(state, registry::all_badges());

    UnlockOutcome {
        reward,
        level_up,
        new_badge_ids,
    }
}

/// Level, title, and progress for the user's lifetime XP.
#[must_use]
pub fn level_info(state: &ProgressionState) -> LevelInfo {
    levels::level_info(state.user.total_xp, registry::level_thresholds())
}

/// Overview of a user's progress against a catalog of `total_spots` spots
/// spread over `total_regions` regions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stats_summary(
    state: &ProgressionState,
    total_spots: usize,
    total_regions: usize,
    today: NaiveDate,
) -> StatsSummary {
    let unlocked_count = state.unlocked_spot_ids.len();
    let completion_rate = if total_spots == 0 {
        0.0
    } else {
        round_to_tenth(unlocked_count as f64 / total_spots as f64 * 100.0)
    };

    StatsSummary {
        total_visits: state.stats.total_visits,
        unlocked_count,
        total_spots,
        completion_rate,
        unique_regions: state.stats.unique_regions(),
        total_regions,
        current_streak: state.streak.current,
        longest_streak: state.streak.longest,
        total_eco_score: state.stats.total_eco_score.round(),
        badge_count: state.unlocked_badge_ids.len(),
        total_badges: registry::all_badges().len(),
        level: state.user.level,
        total_xp: state.user.total_xp,
        days_since_start: state
            .stats
            .first_visit_date
            .map_or(0, |first| (today - first).num_days().max(0)),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reconciles a local state with one fetched from a remote store.
///
/// With `prefer_remote`, the remote user counters, stats, and streak win,
/// and the remote unlock lists and history replace the local ones unless
/// they are empty. Otherwise the local state is kept and only gains the
/// remote's unlocked spot IDs, with `total_stamps` re-derived from the
/// merged list.
pub fn merge_with_remote(
    local: &mut ProgressionState,
    remote: &ProgressionState,
    prefer_remote: bool,
) {
    if prefer_remote {
        local.user = remote.user.clone();
        local.stats = remote.stats.clone();
        local.streak = remote.streak.clone();
        if !remote.unlocked_spot_ids.is_empty() {
            local.unlocked_spot_ids.clone_from(&remote.unlocked_spot_ids);
        }
        if !remote.unlocked_badge_ids.is_empty() {
            local.unlocked_badge_ids.clone_from(&remote.unlocked_badge_ids);
        }
        if !remote.visit_history.is_empty() {
            local.visit_history.clone_from(&remote.visit_history);
        }
        log::debug!("Restored progression from remote state");
        return;
    }

    let before = local.unlocked_spot_ids.len();
    for id in &remote.unlocked_spot_ids {
        if !local.is_spot_unlocked(id) {
            local.unlocked_spot_ids.push(id.clone());
        }
    }
    local.user.total_stamps = u32::try_from(local.unlocked_spot_ids.len()).unwrap_or(u32::MAX);

    log::debug!(
        "Merged {} remote spot unlocks into local state",
        local.unlocked_spot_ids.len() - before
    );
}

/// Returns `state` to a fresh start.
pub fn reset(state: &mut ProgressionState) {
    *state = ProgressionState::default();
}
