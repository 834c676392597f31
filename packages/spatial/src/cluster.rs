//! Proximity clustering over a [`SpatialGrid`].
//!
//! Each pass walks spots from highest to lowest `scores.total`. The first
//! unused spot in that order becomes a representative and absorbs every
//! unused spot within the pass radius, so a representative always
//! out-scores (or ties) everything it absorbed.

use eco_map_spot_models::{ClusteredSpot, LatLng, NormalizedSpot, SpotCategory};
use serde::{Deserialize, Serialize};

use crate::grid::SpatialGrid;
use crate::{ClusterConfig, haversine_meters};

/// Parameters for one clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterPass {
    /// Merge radius in meters (inclusive).
    pub radius_meters: f64,
    /// Only merge spots that share a category.
    pub same_category_only: bool,
}

/// Counts describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Spots handed to the pipeline.
    pub input_count: usize,
    /// Spots with usable coordinates.
    pub located_count: usize,
    /// Markers produced.
    pub output_count: usize,
    /// Representative ID and `cluster_count` of the largest cluster.
    pub largest_cluster: Option<(String, u32)>,
}

struct Slot {
    location: LatLng,
    category: SpotCategory,
    spot: Option<ClusteredSpot>,
}

/// Runs a single clustering pass.
///
/// Spots without a location are dropped. Absorbed spots carry their own
/// `cluster_count` and `cluster_ids` into the representative, so passes
/// compose: the sum of `1 + cluster_count` over the output always equals
/// the sum over the located input.
#[must_use]
pub fn cluster_pass(
    spots: Vec<ClusteredSpot>,
    pass: ClusterPass,
    config: &ClusterConfig,
) -> Vec<ClusteredSpot> {
    let mut slots: Vec<Slot> = spots
        .into_iter()
        .filter_map(|spot| {
            let location = spot.location()?;
            Some(Slot {
                location,
                category: spot.spot.category,
                spot: Some(spot),
            })
        })
        .collect();

    // Stable: equal scores keep input order.
    slots.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));

    let mut grid = SpatialGrid::new(
        pass.radius_meters,
        pass.same_category_only,
        config.reference_latitude,
        config.meters_per_degree,
    );
    for (index, slot) in slots.iter().enumerate() {
        grid.insert(index, slot.location, slot.category);
    }

    let mut used = vec![false; slots.len()];
    let mut result = Vec::new();

    for index in 0..slots.len() {
        if used[index] {
            continue;
        }
        used[index] = true;

        let location = slots[index].location;
        let category = slots[index].category;

        let mut absorbed: Vec<usize> = grid
            .neighbors(location, category)
            .filter(|&other| !used[other])
            .filter(|&other| !pass.same_category_only || slots[other].category == category)
            .filter(|&other| {
                haversine_meters(location, slots[other].location) <= pass.radius_meters
            })
            .collect();
        absorbed.sort_unstable();
        absorbed.dedup();

        let Some(mut representative) = slots[index].spot.take() else {
            continue;
        };

        for other in absorbed {
            used[other] = true;
            if let Some(member) = slots[other].spot.take() {
                absorb(&mut representative, member);
            }
        }

        result.push(representative);
    }

    result
}

fn score_of(slot: &Slot) -> f64 {
    slot.spot.as_ref().map_or(0.0, ClusteredSpot::total_score)
}

fn absorb(representative: &mut ClusteredSpot, member: ClusteredSpot) {
    representative.cluster_count += 1 + member.cluster_count;
    representative.cluster_ids.push(member.spot.id);
    representative.cluster_ids.extend(member.cluster_ids);
}

/// Runs every configured pass in order over freshly normalized spots.
#[must_use]
pub fn cluster_spots(
    spots: Vec<NormalizedSpot>,
    config: &ClusterConfig,
) -> (Vec<ClusteredSpot>, ClusterSummary) {
    let input_count = spots.len();
    let mut clusters: Vec<ClusteredSpot> = spots
        .into_iter()
        .filter(|spot| spot.location.is_some())
        .map(ClusteredSpot::single)
        .collect();
    let located_count = clusters.len();

    if located_count < input_count {
        log::debug!(
            "Skipping {} spots without coordinates",
            input_count - located_count
        );
    }

    for (step, pass) in config.passes.iter().enumerate() {
        let before = clusters.len();
        clusters = cluster_pass(clusters, *pass, config);
        log::debug!(
            "Cluster pass {} (radius={}m, same_category_only={}): {before} -> {}",
            step + 1,
            pass.radius_meters,
            pass.same_category_only,
            clusters.len()
        );
    }

    let largest_cluster = clusters
        .iter()
        .filter(|c| c.cluster_count > 0)
        .max_by_key(|c| c.cluster_count)
        .map(|c| (c.id().to_string(), c.cluster_count));

    let summary = ClusterSummary {
        input_count,
        located_count,
        output_count: clusters.len(),
        largest_cluster,
    };

    log::info!(
        "Clustered {} located spots ({} total) into {} markers",
        summary.located_count,
        summary.input_count,
        summary.output_count
    );

    (clusters, summary)
}
