//! Collider component for ECS

use crate::physics::collider_registry::ColliderHandle;

/// Links an entity to its box in the collider registry.
///
/// The registry owns the box description; the entity only keeps the handle
/// so its own box can be excluded from its contact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderComponent {
    /// Handle of the entity's collider
    pub handle: ColliderHandle,
}

impl ColliderComponent {
    /// Wrap a registry handle
    pub fn new(handle: ColliderHandle) -> Self {
        Self { handle }
    }
}
