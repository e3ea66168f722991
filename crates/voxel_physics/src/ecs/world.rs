//! ECS World implementation

use super::components::{ColliderComponent, TransformComponent};
use super::Entity;
use crate::foundation::math::Vec3;
use crate::physics::collider_registry::{ColliderHandle, ColliderRegistry};
use crate::physics::error::PhysicsError;
use crate::physics::rigidbody::RigidbodyState;
use slotmap::{SecondaryMap, SlotMap};

/// Anything that can report an entity's current world position.
///
/// This is the only way colliders read positions from their owners, so a
/// collider never holds a pointer into the entity store.
pub trait PositionSource {
    /// World position of `entity`, or `None` if it no longer exists
    fn world_position(&self, entity: Entity) -> Option<Vec3>;
}

/// Entity store: transforms plus optional rigidbody and collider components
#[derive(Default)]
pub struct World {
    transforms: SlotMap<Entity, TransformComponent>,
    rigidbodies: SecondaryMap<Entity, RigidbodyState>,
    colliders: SecondaryMap<Entity, ColliderComponent>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity at `position`
    pub fn spawn(&mut self, position: Vec3) -> Entity {
        self.transforms.insert(TransformComponent::from_position(position))
    }

    /// Create an entity with a rigidbody and an attached box collider
    pub fn spawn_body(
        &mut self,
        registry: &ColliderRegistry,
        position: Vec3,
        size: Vec3,
        body: RigidbodyState,
    ) -> Entity {
        let entity = self.spawn(position);
        let handle = registry.register_for_entity(entity, size, Vec3::zeros());
        self.colliders.insert(entity, ColliderComponent::new(handle));
        self.rigidbodies.insert(entity, body);
        entity
    }

    /// Unregister an entity's collider, then destroy the entity.
    ///
    /// If the collider cannot be unregistered the entity is left in place
    /// and the error is returned; [`World::remove_entity`] drops it without
    /// touching the registry.
    pub fn despawn(&mut self, entity: Entity, registry: &ColliderRegistry) -> Result<(), PhysicsError> {
        if !self.contains(entity) {
            return Err(PhysicsError::MissingEntity(entity));
        }

        if let Some(collider) = self.colliders.get(entity) {
            registry.unregister(collider.handle)?;
        }
        self.remove_entity(entity);
        Ok(())
    }

    /// Remove an entity and its components without touching any registry
    pub fn remove_entity(&mut self, entity: Entity) -> Option<TransformComponent> {
        self.rigidbodies.remove(entity);
        self.colliders.remove(entity);
        self.transforms.remove(entity)
    }

    /// Check whether the entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.transforms.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True when the world holds no entities
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Get an entity's transform
    pub fn transform(&self, entity: Entity) -> Option<&TransformComponent> {
        self.transforms.get(entity)
    }

    /// Get an entity's transform mutably
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut TransformComponent> {
        self.transforms.get_mut(entity)
    }

    /// Teleport an entity
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), PhysicsError> {
        let transform = self
            .transforms
            .get_mut(entity)
            .ok_or(PhysicsError::MissingEntity(entity))?;
        transform.position = position;
        Ok(())
    }

    /// Attach (or replace) a rigidbody
    pub fn insert_rigidbody(&mut self, entity: Entity, body: RigidbodyState) -> Result<(), PhysicsError> {
        if !self.contains(entity) {
            return Err(PhysicsError::MissingEntity(entity));
        }
        self.rigidbodies.insert(entity, body);
        Ok(())
    }

    /// Get an entity's rigidbody
    pub fn rigidbody(&self, entity: Entity) -> Option<&RigidbodyState> {
        self.rigidbodies.get(entity)
    }

    /// Get an entity's rigidbody mutably (gameplay input: forces, movement)
    pub fn rigidbody_mut(&mut self, entity: Entity) -> Option<&mut RigidbodyState> {
        self.rigidbodies.get_mut(entity)
    }

    /// Register a collider that follows `entity` and attach it.
    ///
    /// Any previously attached collider is unregistered.
    pub fn attach_collider(
        &mut self,
        entity: Entity,
        registry: &ColliderRegistry,
        size: Vec3,
        offset: Vec3,
    ) -> Result<ColliderHandle, PhysicsError> {
        if !self.contains(entity) {
            return Err(PhysicsError::MissingEntity(entity));
        }

        let handle = registry.register_for_entity(entity, size, offset);
        if let Some(previous) = self.colliders.insert(entity, ColliderComponent::new(handle)) {
            if let Err(err) = registry.unregister(previous.handle) {
                log::warn!("Replacing collider on {entity:?}: {err}");
            }
        }
        Ok(handle)
    }

    /// Handle of the entity's collider, if one is attached
    pub fn collider(&self, entity: Entity) -> Option<ColliderHandle> {
        self.colliders.get(entity).map(|c| c.handle)
    }

    /// Iterate over every entity that has a rigidbody
    pub fn dynamic_entities(&self) -> impl Iterator<Item = (Entity, &RigidbodyState)> {
        self.rigidbodies.iter()
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.transforms.keys()
    }
}

impl PositionSource for World {
    fn world_position(&self, entity: Entity) -> Option<Vec3> {
        self.transforms.get(entity).map(|t| t.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_position_lookup() {
        let mut world = World::new();
        let entity = world.spawn(Vec3::new(1.0, 2.0, 3.0));

        assert!(world.contains(entity));
        assert_eq!(world.world_position(entity), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert!(world.rigidbody(entity).is_none());
        assert!(world.collider(entity).is_none());
    }

    #[test]
    fn test_spawn_body_registers_collider() {
        let mut world = World::new();
        let registry = ColliderRegistry::new();

        let entity = world.spawn_body(&registry, Vec3::zeros(), Vec3::new(1.0, 2.0, 1.0), RigidbodyState::default());

        let handle = world.collider(entity).unwrap();
        assert_eq!(registry.describe(handle).unwrap().owner(), Some(entity));
        assert_eq!(world.dynamic_entities().count(), 1);
    }

    #[test]
    fn test_despawn_unregisters_collider() {
        let mut world = World::new();
        let registry = ColliderRegistry::new();

        let entity = world.spawn_body(&registry, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), RigidbodyState::default());
        world.despawn(entity, &registry).unwrap();

        assert!(!world.contains(entity));
        assert!(registry.is_empty());
        assert_eq!(world.despawn(entity, &registry), Err(PhysicsError::MissingEntity(entity)));
    }

    #[test]
    fn test_failed_unregister_keeps_entity() {
        let mut world = World::new();
        let registry = ColliderRegistry::new();

        let entity = world.spawn_body(&registry, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), RigidbodyState::default());
        let handle = world.collider(entity).unwrap();
        registry.unregister(handle).unwrap();

        assert_eq!(world.despawn(entity, &registry), Err(PhysicsError::ColliderNotFound(handle)));
        assert!(world.contains(entity));
        assert!(world.rigidbody(entity).is_some());

        assert!(world.remove_entity(entity).is_some());
        assert!(!world.contains(entity));
    }

    #[test]
    fn test_stale_entity_handle_does_not_alias() {
        let mut world = World::new();
        let old = world.spawn(Vec3::zeros());
        world.remove_entity(old);
        let new = world.spawn(Vec3::x());

        assert_ne!(old, new);
        assert_eq!(world.world_position(old), None);
        assert_eq!(world.set_position(old, Vec3::y()), Err(PhysicsError::MissingEntity(old)));
    }

    #[test]
    fn test_attach_collider_replaces_previous() {
        let mut world = World::new();
        let registry = ColliderRegistry::new();
        let entity = world.spawn(Vec3::zeros());

        let first = world.attach_collider(entity, &registry, Vec3::new(1.0, 1.0, 1.0), Vec3::zeros()).unwrap();
        let second = world.attach_collider(entity, &registry, Vec3::new(2.0, 2.0, 2.0), Vec3::zeros()).unwrap();

        assert!(!registry.contains(first));
        assert!(registry.contains(second));
        assert_eq!(world.collider(entity), Some(second));
    }
}
