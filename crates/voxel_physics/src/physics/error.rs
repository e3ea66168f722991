//! Physics error types

use crate::ecs::Entity;
use crate::physics::collider_registry::ColliderHandle;
use thiserror::Error;

/// Errors reported by the collision and movement core.
///
/// None of these are fatal to a simulation: they fail a single request or
/// skip a single entity for one step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A dynamic entity has no collider attached
    #[error("entity {0:?} has no collider")]
    MissingCollider(Entity),

    /// The entity does not exist (or was despawned)
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),

    /// The collider handle is stale or was never registered
    #[error("collider {0:?} is not registered")]
    ColliderNotFound(ColliderHandle),

    /// The operation requires a free-standing collider
    #[error("collider {0:?} is bound to an entity; move the entity instead")]
    ColliderBoundToEntity(ColliderHandle),

    /// A rigidbody's collider does not follow that rigidbody's entity
    #[error("collider {0:?} is not attached to the simulated entity")]
    ColliderNotAttached(ColliderHandle),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
