//! Minimal entity store
//!
//! Just enough of an entity-component container for the physics core:
//! entities with a world position, plus optional rigidbody and collider
//! components.

pub mod world;
pub mod entity;
pub mod components;

pub use world::{World, PositionSource};
pub use entity::Entity;
