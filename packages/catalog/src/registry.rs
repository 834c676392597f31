//! Compile-time region and travel-course tables.
//!
//! Both live as TOML under `definitions/`, are embedded via
//! `include_str!`, and are parsed on first access.

use std::sync::LazyLock;

use eco_map_spot_models::{Region, TravelCourse};
use serde::Deserialize;

/// Number of defined regions. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 30;

/// Number of defined travel courses. Enforced by a test.
#[cfg(test)]
const EXPECTED_COURSE_COUNT: usize = 3;

const REGIONS_TOML: &str = include_str!("../definitions/regions.toml");
const COURSES_TOML: &str = include_str!("../definitions/courses.toml");

#[derive(Deserialize)]
struct RegionTable {
    regions: Vec<Region>,
}

#[derive(Deserialize)]
struct CourseTable {
    courses: Vec<TravelCourse>,
}

static REGIONS: LazyLock<Vec<Region>> = LazyLock::new(|| {
    toml::de::from_str::<RegionTable>(REGIONS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse region definitions: {e}"))
        .regions
});

static COURSES: LazyLock<Vec<TravelCourse>> = LazyLock::new(|| {
    toml::de::from_str::<CourseTable>(COURSES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse travel courses: {e}"))
        .courses
});

/// Returns every region in display order.
///
/// # Panics
///
/// Panics if the embedded region TOML fails to parse. Since it is a
/// compile-time constant, a parse failure indicates a development error
/// and is caught by the tests below.
#[must_use]
pub fn all_regions() -> &'static [Region] {
    &REGIONS
}

/// Looks up a region by ID.
#[must_use]
pub fn region(id: &str) -> Option<&'static Region> {
    all_regions().iter().find(|r| r.id == id)
}

/// Returns every travel course.
///
/// # Panics
///
/// Panics if the embedded course TOML fails to parse.
#[must_use]
pub fn all_courses() -> &'static [TravelCourse] {
    &COURSES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_regions() {
        let regions = all_regions();
        assert_eq!(
            regions.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            regions.len()
        );
    }

    #[test]
    fn region_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for region in all_regions() {
            assert!(seen.insert(&region.id), "Duplicate region ID: {}", region.id);
        }
    }

    #[test]
    fn region_centers_are_in_gyeonggi() {
        for region in all_regions() {
            let center = region.center;
            assert!(
                (36.8..=38.4).contains(&center.lat) && (126.4..=127.9).contains(&center.lng),
                "Region {} center ({}, {}) is outside the province",
                region.id,
                center.lat,
                center.lng
            );
        }
    }

    #[test]
    fn region_lookup_by_id() {
        assert_eq!(region("안산시").map(|r| r.emoji.as_str()), Some("🌊"));
        assert!(region("ALL").is_none());
    }

    #[test]
    fn loads_all_courses() {
        let courses = all_courses();
        assert_eq!(
            courses.len(),
            EXPECTED_COURSE_COUNT,
            "Expected {EXPECTED_COURSE_COUNT} courses, found {}. \
             Update EXPECTED_COURSE_COUNT after adding/removing courses.",
            courses.len()
        );
    }

    #[test]
    fn courses_reference_known_regions() {
        let mut seen = BTreeSet::new();
        for course in all_courses() {
            assert!(seen.insert(&course.id), "Duplicate course ID: {}", course.id);
            assert!(
                region(&course.region).is_some(),
                "Course {} lists unknown region {}",
                course.id,
                course.region
            );
            let selector = &course.spots;
            assert!(
                selector.name_contains.is_some()
                    || selector.region.is_some()
                    || selector.category.is_some(),
                "Course {} selects every spot",
                course.id
            );
        }
    }
}
