//! Uniform lat/lng grid used to find clustering candidates.
//!
//! Cells are sized so that any two points within the clustering radius
//! land in the same cell or in adjacent cells. Lookups scan the 3×3 block
//! around a point's cell.

use std::collections::BTreeMap;

use eco_map_spot_models::{LatLng, SpotCategory};

/// Identifies one grid cell. When the grid is category-partitioned, spots
/// of different categories never share a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub lat: i64,
    pub lng: i64,
    pub category: Option<SpotCategory>,
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category {
            Some(category) => write!(f, "{}_{}_{category}", self.lat, self.lng),
            None => write!(f, "{}_{}", self.lat, self.lng),
        }
    }
}

/// Spatial hash from cell to the indices of the items inserted there.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_lat: f64,
    cell_lng: f64,
    by_category: bool,
    cells: BTreeMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    /// Creates an empty grid for the given radius.
    ///
    /// Latitude cells are `radius / meters_per_degree` degrees tall.
    /// Longitude cells are widened by `1 / cos(reference_latitude)`, a fixed
    /// approximation that holds for the region the catalog covers.
    #[must_use]
    pub fn new(
        radius_meters: f64,
        by_category: bool,
        reference_latitude: f64,
        meters_per_degree: f64,
    ) -> Self {
        let cell_lat = radius_meters / meters_per_degree;
        let cell_lng = radius_meters / (meters_per_degree * reference_latitude.to_radians().cos());

        Self {
            cell_lat,
            cell_lng,
            by_category,
            cells: BTreeMap::new(),
        }
    }

    /// Cell size in degrees as `(lat, lng)`.
    #[must_use]
    pub const fn cell_size(&self) -> (f64, f64) {
        (self.cell_lat, self.cell_lng)
    }

    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn key_for(&self, location: LatLng, category: SpotCategory) -> CellKey {
        CellKey {
            lat: (location.lat / self.cell_lat).floor() as i64,
            lng: (location.lng / self.cell_lng).floor() as i64,
            category: self.by_category.then_some(category),
        }
    }

    pub fn insert(&mut self, index: usize, location: LatLng, category: SpotCategory) {
        let key = self.key_for(location, category);
        self.cells.entry(key).or_default().push(index);
    }

    /// Indices stored in the 3×3 block of cells around `location`, in
    /// row-major cell order and insertion order within each cell.
    pub fn neighbors(
        &self,
        location: LatLng,
        category: SpotCategory,
    ) -> impl Iterator<Item = usize> + '_ {
        let center = self.key_for(location, category);

        (-1..=1)
            .flat_map(move |dlat| (-1..=1).map(move |dlng| (dlat, dlng)))
            .filter_map(move |(dlat, dlng)| {
                // Cells past the i64 edge do not exist.
                self.cells.get(&CellKey {
                    lat: center.lat.checked_add(dlat)?,
                    lng: center.lng.checked_add(dlng)?,
                    category: center.category,
                })
            })
            .flatten()
            .copied()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
