//! Abstract spatial query interface for broad-phase collision detection
//!
//! The broad phase only has to return a superset of the colliders that can
//! touch a query box; the narrow phase filters the rest. Entries are indices
//! into the collider snapshot the structure was built from, so the structure
//! is disposable and rebuilt from each new snapshot.

use crate::physics::collider_registry::ResolvedCollider;
use crate::physics::collision::AxisAlignedBox;

/// Abstract interface for spatial partitioning used in broad-phase collision
/// detection
pub trait SpatialQuery: Send + Sync {
    /// Insert snapshot entry `index` covering `bounds`
    fn insert(&mut self, index: usize, bounds: &AxisAlignedBox);

    /// Candidate snapshot indices whose bounds may intersect `bounds`.
    ///
    /// Results are deduplicated and in ascending order.
    fn query_aabb(&self, bounds: &AxisAlignedBox) -> Vec<usize>;

    /// Clear all entries
    fn clear(&mut self);

    /// Number of inserted entries
    fn entry_count(&self) -> usize;

    /// Insert every collider of a snapshot, in order
    fn rebuild(&mut self, colliders: &[ResolvedCollider]) {
        self.clear();
        for (index, collider) in colliders.iter().enumerate() {
            self.insert(index, &collider.bounds);
        }
    }
}

/// Degenerate spatial structure that returns every entry.
///
/// Useful for tiny scenes and as a reference when testing other structures.
#[derive(Debug, Default, Clone)]
pub struct LinearScan {
    indices: Vec<usize>,
}

impl LinearScan {
    /// Create an empty scan list
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialQuery for LinearScan {
    fn insert(&mut self, index: usize, _bounds: &AxisAlignedBox) {
        if let Err(position) = self.indices.binary_search(&index) {
            self.indices.insert(position, index);
        }
    }

    fn query_aabb(&self, _bounds: &AxisAlignedBox) -> Vec<usize> {
        self.indices.clone()
    }

    fn clear(&mut self) {
        self.indices.clear();
    }

    fn entry_count(&self) -> usize {
        self.indices.len()
    }
}
