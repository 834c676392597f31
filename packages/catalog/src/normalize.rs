//! Normalizes raw catalog records into [`NormalizedSpot`] values.
//!
//! Much of the source data names a spot by its facility type rather than
//! a proper noun ("습지", "체육시설"). Hundreds of markers all labeled
//! "습지" are useless on a map, so those names are rewritten using
//! whatever location context the record carries:
//!
//! - `"{neighborhood} {type}"` when reverse geocoding attached a neighborhood
//! - `"{district} {type}"`, preferring a sub-district found in the description
//! - `"{place} {type}"` from a place name in the description
//! - `"{type} ({area})"` when only the area is known
//!
//! Each form gets a `" ({area})"` suffix when the area is known.

use std::str::FromStr as _;
use std::sync::LazyLock;

use eco_map_spot_models::{EcoScores, Mission, NormalizedSpot, RawScores, RawSpot, Season};
use regex::Regex;

/// Facility-type labels that must never be shown as a spot's name.
pub const GENERIC_NAMES: &[&str] = &[
    "문화체육시설",
    "문화시설",
    "근린 및 주제공원",
    "체육시설",
    "공공시설",
    "공공휴양녹지",
    "습지",
    "완충녹지",
    "경관녹지",
    "공공청사",
    "생태보호구역",
];

/// Particles that may follow a place name without being part of it
/// ("만안구에 위치한", "수원시의").
const PARTICLES: &str = "(?:에서|에|의|은|는|이|가|을|를|로|과|와)?";

/// Area hints such as "약 1.5km" or "약 3ha".
static AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"약\s*(\d+(?:\.\d+)?)\s*(km|ha)").expect("valid regex")
});

/// "<city> <district>" pairs such as "안양시 만안구".
static CITY_DISTRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"[가-힣]+[시군]\s+([가-힣]+?[시군구읍면동]){PARTICLES}(?:[^가-힣]|$)"
    ))
    .expect("valid regex")
});

/// Any administrative place name ending in 시/군/구/읍/면/동.
static PLACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"([가-힣]+?[시군구읍면동]){PARTICLES}(?:[^가-힣]|$)"
    ))
    .expect("valid regex")
});

/// Whether `name` is one of the reserved facility-type labels.
#[must_use]
pub fn is_generic_name(name: &str) -> bool {
    GENERIC_NAMES.contains(&name.trim())
}

/// Parses an area hint out of free text, in square meters.
///
/// Recognizes `약 <n> km` (square kilometers) and `약 <n> ha`.
#[must_use]
pub fn parse_area_sqm(text: &str) -> Option<f64> {
    let caps = AREA_RE.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    let multiplier = match &caps[2] {
        "km" => 1_000_000.0,
        _ => 10_000.0,
    };
    Some(value * multiplier).filter(|v| *v > 0.0)
}

/// Formats an area for display, or `None` when the area is unknown or zero.
#[must_use]
pub fn format_area(sqm: f64) -> Option<String> {
    if sqm.is_nan() || sqm <= 0.0 {
        return None;
    }
    if sqm >= 1_000_000.0 {
        Some(format!("{:.1}km²", sqm / 1_000_000.0))
    } else if sqm >= 10_000.0 {
        Some(format!("{:.1}ha", sqm / 10_000.0))
    } else {
        Some(format!("{:.0}m²", sqm.round()))
    }
}

/// The district named after a city in `"<city> <district>"` form.
#[must_use]
pub fn parse_sub_district(text: &str) -> Option<&str> {
    CITY_DISTRICT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The last (most specific) place name mentioned in `text`.
#[must_use]
pub fn parse_place(text: &str) -> Option<&str> {
    PLACE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| m.as_str())
}

/// Resolves the name shown on the map.
///
/// `area` is the already-formatted area, if any. The result is never a
/// generic name: when nothing else is known, the tail of the spot ID is
/// appended to keep otherwise identical labels apart.
#[must_use]
pub fn resolve_display_name(raw: &RawSpot, area: Option<&str>) -> String {
    if !is_generic_name(&raw.name) {
        return raw.name.clone();
    }

    let kind = non_blank(raw.spot_type.as_deref()).unwrap_or(raw.name.as_str());
    let with_area = |label: String| match area {
        Some(area) => format!("{label} ({area})"),
        None => label,
    };
    let description = non_blank(raw.description.as_deref());

    if let Some(neighborhood) = non_blank(raw.neighborhood.as_deref()) {
        return with_area(format!("{neighborhood} {kind}"));
    }

    if let Some(district) = non_blank(raw.district.as_deref()) {
        let place = description.and_then(parse_sub_district).unwrap_or(district);
        return with_area(format!("{place} {kind}"));
    }

    if let Some(place) = description.and_then(parse_place) {
        return with_area(format!("{place} {kind}"));
    }

    if let Some(area) = area {
        return format!("{kind} ({area})");
    }

    if is_generic_name(kind) {
        let suffix = raw.id.rsplit('.').next().unwrap_or(&raw.id);
        return format!("{kind} #{suffix}");
    }

    kind.to_string()
}

/// Default mission reward for a spot with the given total score.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn default_reward(total_score: f64) -> u32 {
    let reward = (total_score * 0.8).round().max(10.0);
    if reward.is_finite() {
        reward.min(f64::from(u32::MAX)) as u32
    } else {
        10
    }
}

/// Normalizes one raw record.
///
/// Never fails. A record without usable coordinates keeps
/// `location: None` and is dropped later by clustering.
#[must_use]
pub fn normalize_spot(raw: &RawSpot) -> NormalizedSpot {
    let area_sqm = raw
        .area_sqm
        .filter(|v| v.is_finite() && *v > 0.0)
        .or_else(|| raw.description.as_deref().and_then(parse_area_sqm));
    let area_display = area_sqm.and_then(format_area);

    let display_name = resolve_display_name(raw, area_display.as_deref());
    let eco_scores = eco_scores(raw.scores.as_ref());
    let mission = mission(raw, eco_scores.total);

    let region = non_blank(raw.region.as_deref())
        .or_else(|| non_blank(raw.district.as_deref()))
        .unwrap_or_default()
        .to_string();

    let best_season = raw
        .best_season
        .iter()
        .filter_map(|label| Season::from_str(&label.to_lowercase()).ok())
        .collect();

    NormalizedSpot {
        id: raw.id.clone(),
        name: raw.name.clone(),
        display_name,
        category: raw.category,
        spot_type: raw.spot_type.clone(),
        location: raw.location.and_then(|loc| loc.resolve()),
        district: raw.district.clone(),
        region,
        neighborhood: raw.neighborhood.clone(),
        address: raw.address.clone(),
        description: raw.description.clone(),
        area_sqm,
        area_display,
        eco_scores,
        mission,
        priority: raw.priority.unwrap_or(false),
        best_season,
    }
}

/// Normalizes a batch of raw records, preserving order.
#[must_use]
pub fn normalize_spots(raw: &[RawSpot]) -> Vec<NormalizedSpot> {
    raw.iter().map(normalize_spot).collect()
}

fn eco_scores(scores: Option<&RawScores>) -> EcoScores {
    let scores = scores.copied().unwrap_or_default();
    EcoScores {
        area: scores.area.unwrap_or(0.0),
        accessibility: scores.accessibility.unwrap_or(0.0),
        uniqueness: scores.uniqueness.unwrap_or(0.0),
        total: scores.total.unwrap_or(0.0),
    }
}

fn mission(raw: &RawSpot, total_score: f64) -> Mission {
    let source = raw.mission.clone().unwrap_or_default();
    Mission {
        reward: source
            .reward
            .unwrap_or_else(|| default_reward(total_score)),
        description: source
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Visit {}", raw.name)),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
