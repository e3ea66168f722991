//! Collider registry
//!
//! Owns every axis-aligned collider of one simulation. Colliders are keyed
//! by identity (a generation-checked [`ColliderHandle`]), never by where they
//! currently are, so moving a collider never makes it unreachable.
//!
//! Mutations go through a single writer lock. Readers take a cheap clone of
//! the current descriptor table and resolve positions from it, so a snapshot
//! handed out by [`ColliderRegistry::get_all`] is never disturbed by later
//! registration or removal.

use crate::ecs::{Entity, PositionSource};
use crate::foundation::math::Vec3;
use crate::physics::collision::AxisAlignedBox;
use crate::physics::error::PhysicsError;
use slotmap::SlotMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

slotmap::new_key_type! {
    /// Identity of a registered collider
    pub struct ColliderHandle;
}

/// Where a collider takes its center from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderAnchor {
    /// Free-standing collider with a stored center
    Fixed(Vec3),
    /// Collider bound to an entity; the center is the entity's world
    /// position plus `offset`, looked up every time it is read
    Entity {
        /// Owning entity (non-owning reference)
        entity: Entity,
        /// Offset from the entity position to the box center
        offset: Vec3,
    },
}

/// Registered collider description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    /// Full size of the box
    pub size: Vec3,
    /// Position source
    pub anchor: ColliderAnchor,
    sequence: u64,
}

impl ColliderDesc {
    /// Owning entity, if the collider is entity-bound
    pub fn owner(&self) -> Option<Entity> {
        match self.anchor {
            ColliderAnchor::Entity { entity, .. } => Some(entity),
            ColliderAnchor::Fixed(_) => None,
        }
    }

    /// Resolve the current world-space box.
    ///
    /// Returns `None` when the owning entity can no longer supply a position.
    pub fn resolve(&self, source: &impl PositionSource) -> Option<AxisAlignedBox> {
        let center = match self.anchor {
            ColliderAnchor::Fixed(position) => position,
            ColliderAnchor::Entity { entity, offset } => source.world_position(entity)? + offset,
        };
        Some(AxisAlignedBox::new(center, self.size))
    }
}

/// A collider resolved to world space at snapshot time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCollider {
    /// Registry handle
    pub handle: ColliderHandle,
    /// World-space box
    pub bounds: AxisAlignedBox,
    /// Owning entity, if any
    pub owner: Option<Entity>,
}

#[derive(Default, Clone)]
struct RegistryState {
    colliders: SlotMap<ColliderHandle, ColliderDesc>,
    next_sequence: u64,
}

/// Registry of every collider in one simulation.
///
/// Construct one per world/session and pass it by reference; there is no
/// process-wide instance.
#[derive(Default)]
pub struct ColliderRegistry {
    state: RwLock<Arc<RegistryState>>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Arc<RegistryState> {
        Arc::clone(&self.read_guard())
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Arc<RegistryState>> {
        // A poisoned lock only means a writer panicked mid-update; the
        // copy-on-write state behind it is still a complete table.
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Arc<RegistryState>> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register a collider and return its handle
    pub fn register(&self, size: Vec3, anchor: ColliderAnchor) -> ColliderHandle {
        let mut guard = self.write_guard();
        let state = Arc::make_mut(&mut guard);

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let size = size.map(|s| s.max(0.0));
        let handle = state.colliders.insert(ColliderDesc { size, anchor, sequence });
        log::trace!("Registered collider {handle:?} ({anchor:?}, size {size:?})");
        handle
    }

    /// Register a free-standing collider centered at `position`
    pub fn register_fixed(&self, position: Vec3, size: Vec3) -> ColliderHandle {
        self.register(size, ColliderAnchor::Fixed(position))
    }

    /// Register a collider that follows `entity`
    pub fn register_for_entity(&self, entity: Entity, size: Vec3, offset: Vec3) -> ColliderHandle {
        self.register(size, ColliderAnchor::Entity { entity, offset })
    }

    /// Remove a collider.
    ///
    /// A stale handle is reported as [`PhysicsError::ColliderNotFound`] and
    /// leaves the registry untouched.
    pub fn unregister(&self, handle: ColliderHandle) -> Result<ColliderDesc, PhysicsError> {
        let mut guard = self.write_guard();
        if !guard.colliders.contains_key(handle) {
            return Err(PhysicsError::ColliderNotFound(handle));
        }

        let state = Arc::make_mut(&mut guard);
        let desc = state
            .colliders
            .remove(handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        log::trace!("Unregistered collider {handle:?}");
        Ok(desc)
    }

    /// Move a free-standing collider
    pub fn set_position(&self, handle: ColliderHandle, position: Vec3) -> Result<(), PhysicsError> {
        let mut guard = self.write_guard();
        match guard.colliders.get(handle).map(|desc| desc.anchor) {
            None => Err(PhysicsError::ColliderNotFound(handle)),
            Some(ColliderAnchor::Entity { .. }) => Err(PhysicsError::ColliderBoundToEntity(handle)),
            Some(ColliderAnchor::Fixed(_)) => {
                let state = Arc::make_mut(&mut guard);
                if let Some(desc) = state.colliders.get_mut(handle) {
                    desc.anchor = ColliderAnchor::Fixed(position);
                }
                Ok(())
            }
        }
    }

    /// Look up a collider's description
    pub fn describe(&self, handle: ColliderHandle) -> Option<ColliderDesc> {
        self.read_guard().colliders.get(handle).copied()
    }

    /// Check whether a handle is still registered
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.read_guard().colliders.contains_key(handle)
    }

    /// Resolve one collider to its current world-space box
    pub fn resolve(&self, handle: ColliderHandle, source: &impl PositionSource) -> Option<AxisAlignedBox> {
        self.describe(handle)?.resolve(source)
    }

    /// Exact-position lookup.
    ///
    /// When several colliders share the position the one registered first
    /// wins.
    pub fn get(&self, position: &Vec3, source: &impl PositionSource) -> Option<ColliderHandle> {
        self.get_all(source)
            .into_iter()
            .find(|collider| collider.bounds.position == *position)
            .map(|collider| collider.handle)
    }

    /// Snapshot of every collider resolved to world space, in registration
    /// order.
    ///
    /// Entity-bound colliders whose owner cannot supply a position are left
    /// out of the snapshot and logged at debug level; the registry itself
    /// is not modified.
    pub fn get_all(&self, source: &impl PositionSource) -> Vec<ResolvedCollider> {
        let state = self.read();

        let mut descs: Vec<(ColliderHandle, &ColliderDesc)> = state.colliders.iter().collect();
        descs.sort_by_key(|(_, desc)| desc.sequence);

        descs
            .into_iter()
            .filter_map(|(handle, desc)| match desc.resolve(source) {
                Some(bounds) => Some(ResolvedCollider {
                    handle,
                    bounds,
                    owner: desc.owner(),
                }),
                None => {
                    log::debug!(
                        "Collider {handle:?} skipped: owner {:?} has no position",
                        desc.owner()
                    );
                    None
                }
            })
            .collect()
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.read_guard().colliders.len()
    }

    /// True when no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every collider (end of session)
    pub fn clear(&self) {
        let mut guard = self.write_guard();
        *guard = Arc::new(RegistryState::default());
    }
}
