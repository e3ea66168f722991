//! Spatial partitioning data structures
//!
//! Rebuildable acceleration structures over collider snapshots, used to
//! prune the narrow phase in the integrator and the pathfinder.

pub mod spatial_query;
mod grid;

pub use grid::SpatialGrid;
pub use spatial_query::{LinearScan, SpatialQuery};
