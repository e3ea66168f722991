//! Physics module for collision detection and response
//!
//! Axis-aligned box collision, the collider registry, rigidbody integration
//! with substepping, ray casting and a straight-line pathfinder. Everything
//! reads colliders through a [`ColliderRegistry`] owned by the host.

pub mod collision;
pub mod collider_registry;
pub mod error;
pub mod rigidbody;
pub mod simulation;
pub mod raycast;
pub mod pathfinding;

#[cfg(test)]
mod tests;

pub use collision::{AxisAlignedBox, COLLISION_EPSILON};
pub use collider_registry::{ColliderAnchor, ColliderDesc, ColliderHandle, ColliderRegistry, ResolvedCollider};
pub use error::PhysicsError;
pub use rigidbody::RigidbodyState;
pub use simulation::{PhysicsSimulation, StepReport};
pub use raycast::{Ray, RayHit};
pub use pathfinding::{find_path, Path, PathStatus};
