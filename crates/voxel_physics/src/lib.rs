//! # Voxel Physics
//!
//! Collision and movement core for a voxel game: axis-aligned box collision,
//! a shared collider registry, substepped rigidbody integration, ray casting
//! and a straight-line pathfinder.
//!
//! ## Features
//!
//! - **AABB Collision**: epsilon-tolerant intersection and least-axis penetration
//! - **Collider Registry**: identity-keyed, snapshot reads, serialized writes
//! - **Rigidbody Integration**: gravity, drag, speed cap, grounding
//! - **Broad Phase**: uniform grid rebuilt from each snapshot
//! - **Parallel Ticks**: per-entity integration on rayon (`parallel` feature)
//! - **Queries**: ray casts and greedy pathfinding against the same colliders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voxel_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let registry = ColliderRegistry::new();
//!     let mut world = World::new();
//!     let simulation = PhysicsSimulation::new(PhysicsConfig::default())?;
//!
//!     // Ground
//!     registry.register_fixed(Vec3::new(0.0, -0.5, 0.0), Vec3::new(32.0, 1.0, 32.0));
//!
//!     let player = world.spawn_body(
//!         &registry,
//!         Vec3::new(0.0, 4.0, 0.0),
//!         Vec3::new(0.6, 1.8, 0.6),
//!         RigidbodyState::default(),
//!     );
//!
//!     for _ in 0..120 {
//!         simulation.step(&mut world, &registry, 1.0 / 60.0);
//!     }
//!
//!     let grounded = world.rigidbody(player).map_or(false, |body| body.is_grounded);
//!     log::info!("player grounded: {grounded}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod spatial;

/// Common imports for physics users
pub mod prelude {
    pub use crate::{
        core::config::{PhysicsConfig, PathfindingConfig, SimulationConfig},
        config::Config,
        foundation::math::{Vec3, Transform, VectorExt},
        ecs::{World, Entity, PositionSource},
        physics::{
            AxisAlignedBox,
            ColliderHandle, ColliderRegistry,
            PhysicsError,
            RigidbodyState,
            PhysicsSimulation, StepReport,
            Ray, RayHit,
            find_path, Path, PathStatus,
            raycast,
        },
    };
}
