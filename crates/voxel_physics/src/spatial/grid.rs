//! Uniform hash grid
//!
//! Space is divided into cubic cells of a fixed edge length. Each entry is
//! recorded in every cell its box touches; a query collects the entries of
//! the cells the query box touches. Voxel scenes are dominated by boxes of
//! similar size, which is the case a uniform grid handles best.
//!
//! Boxes spanning more than [`MAX_CELLS_PER_ENTRY`] cells (a huge floor slab,
//! for example) are kept in a separate list returned by every query instead
//! of being smeared over thousands of cells.

use super::spatial_query::SpatialQuery;
use crate::foundation::math::{Vec3, Vec3i};
use crate::physics::collider_registry::ResolvedCollider;
use crate::physics::collision::{AxisAlignedBox, COLLISION_EPSILON};
use std::collections::HashMap;

/// Entries covering more cells than this go to the oversized list
pub const MAX_CELLS_PER_ENTRY: i64 = 512;

/// Uniform grid broad phase over collider snapshot indices
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Vec3i, Vec<usize>>,
    oversized: Vec<usize>,
    entries: usize,
}

impl SpatialGrid {
    /// Create an empty grid. Non-positive cell sizes fall back to 1.0.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            entries: 0,
        }
    }

    /// Build a grid from a collider snapshot
    pub fn from_snapshot(colliders: &[ResolvedCollider], cell_size: f32) -> Self {
        let mut grid = Self::new(cell_size);
        grid.rebuild(colliders);
        grid
    }

    /// Edge length of a cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `point`
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, point: &Vec3) -> Vec3i {
        point.map(|c| (c / self.cell_size).floor() as i32)
    }

    /// Inclusive cell range touched by `bounds` (padded by the collision
    /// tolerance so touching boxes share a cell)
    fn cell_range(&self, bounds: &AxisAlignedBox) -> (Vec3i, Vec3i) {
        let pad = Vec3::repeat(COLLISION_EPSILON);
        (self.cell_of(&(bounds.min() - pad)), self.cell_of(&(bounds.max() + pad)))
    }

    /// Number of cells in an inclusive range, saturating at `i64::MAX`
    fn cell_count(lo: &Vec3i, hi: &Vec3i) -> i64 {
        (0..3)
            .map(|axis| i64::from(hi[axis]) - i64::from(lo[axis]) + 1)
            .fold(1_i64, i64::saturating_mul)
    }

    fn for_each_cell(lo: &Vec3i, hi: &Vec3i, mut f: impl FnMut(Vec3i)) {
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    f(Vec3i::new(x, y, z));
                }
            }
        }
    }

    /// Number of occupied cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl SpatialQuery for SpatialGrid {
    fn insert(&mut self, index: usize, bounds: &AxisAlignedBox) {
        let (lo, hi) = self.cell_range(bounds);
        self.entries += 1;

        if Self::cell_count(&lo, &hi) > MAX_CELLS_PER_ENTRY {
            self.oversized.push(index);
            return;
        }

        let cells = &mut self.cells;
        Self::for_each_cell(&lo, &hi, |cell| {
            cells.entry(cell).or_default().push(index);
        });
    }

    fn query_aabb(&self, bounds: &AxisAlignedBox) -> Vec<usize> {
        let (lo, hi) = self.cell_range(bounds);
        let mut found = self.oversized.clone();

        if Self::cell_count(&lo, &hi) > i64::try_from(self.cells.len()).unwrap_or(i64::MAX) {
            // Query covers more cells than are occupied: walk the occupied ones
            for (cell, indices) in &self.cells {
                let inside = (0..3).all(|axis| cell[axis] >= lo[axis] && cell[axis] <= hi[axis]);
                if inside {
                    found.extend_from_slice(indices);
                }
            }
        } else {
            Self::for_each_cell(&lo, &hi, |cell| {
                if let Some(indices) = self.cells.get(&cell) {
                    found.extend_from_slice(indices);
                }
            });
        }

        found.sort_unstable();
        found.dedup();
        found
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.entries = 0;
    }

    fn entry_count(&self) -> usize {
        self.entries
    }
}
