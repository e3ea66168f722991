//! ECS Components module
//!
//! The minimal set of components the physics core needs.

pub mod transform;
pub mod collision;

pub use transform::TransformComponent;
pub use collision::ColliderComponent;
