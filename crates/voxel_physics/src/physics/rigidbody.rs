//! Rigidbody state and the semi-fixed-timestep integrator
//!
//! A frame's delta time is cut into equal substeps no longer than
//! `max_time_step`. Each substep applies gravity, drag and the speed cap,
//! moves the body, then pushes it out of every collider it overlaps along
//! the axis of least penetration and cancels the velocity into the contact.
//!
//! A body is either airborne or grounded. Grounded only means "downward
//! motion was arrested by a contact below during the last substep"; there is
//! no separate falling/jumping state.

use std::collections::BTreeSet;

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Vec3, VectorExt};
use crate::physics::collider_registry::{ColliderHandle, ResolvedCollider};
use crate::physics::collision::{
    intersects, penetration_depth, swept_broadphase_box, AxisAlignedBox, COLLISION_EPSILON,
};
use crate::spatial::SpatialQuery;

/// Drag is kept strictly below one so velocity never collapses in one step
pub const MAX_DRAG: f32 = 0.999;

/// Relative tolerance on `delta_time / max_time_step`: rounding noise like
/// `5.0000005` must not add an extra, almost empty substep, while any real
/// excess over a whole number of steps still does
const SUBSTEP_RATIO_TOLERANCE: f32 = 4.0 * f32::EPSILON;

/// Per-entity dynamic simulation state
#[derive(Debug, Clone, PartialEq)]
pub struct RigidbodyState {
    /// Linear velocity (units/s)
    pub velocity: Vec3,
    /// Mass, must be positive for forces to apply
    pub mass: f32,
    /// Fraction of velocity removed per substep, in `[0, 1)`
    pub drag: f32,
    /// Downward motion was arrested by a contact during the last substep
    pub is_grounded: bool,
    /// Whether gravity applies
    pub use_gravity: bool,
}

impl Default for RigidbodyState {
    fn default() -> Self {
        Self {
            velocity: Vec3::zeros(),
            mass: 1.0,
            drag: 0.0,
            is_grounded: false,
            use_gravity: true,
        }
    }
}

impl RigidbodyState {
    /// Create a body with the given mass and drag
    pub fn new(mass: f32, drag: f32) -> Self {
        Self::default().with_mass(mass).with_drag(drag)
    }

    /// Set the mass. Non-positive values are ignored with a warning.
    pub fn with_mass(mut self, mass: f32) -> Self {
        if mass > 0.0 {
            self.mass = mass;
        } else {
            log::warn!("Ignoring non-positive rigidbody mass {mass}");
        }
        self
    }

    /// Set the drag, clamped to `[0, MAX_DRAG]`
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = if drag.is_nan() { 0.0 } else { drag.clamp(0.0, MAX_DRAG) };
        self
    }

    /// Enable or disable gravity
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.use_gravity = enabled;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Apply an instantaneous impulse: `velocity += force / mass`.
    ///
    /// A body without positive mass ignores forces.
    pub fn add_force(&mut self, force: Vec3) {
        if self.mass > 0.0 {
            self.velocity += force / self.mass;
        }
    }

    /// Override horizontal velocity with `normalize(direction) * speed`.
    ///
    /// Only the X/Z part of `direction` is used; a direction with no
    /// horizontal component stops horizontal motion. While grounded, any
    /// downward velocity is cleared so walking does not sink into uneven
    /// ground.
    pub fn move_horizontal(&mut self, direction: Vec3, speed: f32) {
        let horizontal = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero() * speed;
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;

        if self.is_grounded && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
    }

    /// Launch upwards with `speed` if grounded. Returns whether it jumped.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.is_grounded {
            return false;
        }
        self.velocity.y = speed;
        self.is_grounded = false;
        true
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

/// Split a frame into substeps: `(count, length)`.
///
/// `count = ceil(delta_time / max_time_step)` (at least one), and
/// `length = delta_time / count`. Non-positive or non-finite frames produce
/// no substeps.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn substeps(delta_time: f32, max_time_step: f32) -> (u32, f32) {
    if !(delta_time > 0.0) || !delta_time.is_finite() || !(max_time_step > 0.0) {
        return (0, 0.0);
    }

    let ratio = delta_time / max_time_step;
    let steps = (ratio * (1.0 - SUBSTEP_RATIO_TOLERANCE)).ceil().max(1.0) as u32;
    (steps, delta_time / steps as f32)
}

/// A body's own collider: its registry handle and box shape relative to
/// the entity position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyCollider {
    /// Registry handle, excluded from the body's own contact set
    pub handle: ColliderHandle,
    /// Full box size
    pub size: Vec3,
    /// Offset from entity position to box center
    pub offset: Vec3,
}

impl BodyCollider {
    /// World-space box for an entity at `position`
    pub fn bounds_at(&self, position: &Vec3) -> AxisAlignedBox {
        AxisAlignedBox::new(position + self.offset, self.size)
    }
}

/// Everything one body is integrated against: a collider snapshot and a
/// broad-phase structure built over it
pub struct ContactWorld<'a> {
    /// Collider snapshot
    pub colliders: &'a [ResolvedCollider],
    /// Broad phase over `colliders` (indices into the slice)
    pub broad_phase: &'a dyn SpatialQuery,
}

/// Advance one body through one substep.
fn step_once(
    body: &mut RigidbodyState,
    position: &mut Vec3,
    collider: &BodyCollider,
    contacts: &ContactWorld<'_>,
    config: &PhysicsConfig,
    step_time: f32,
) {
    if body.use_gravity {
        body.velocity.y += config.gravity * step_time;
    }

    body.velocity *= 1.0 - body.drag;

    let speed = body.velocity.norm();
    if speed > config.max_velocity {
        body.velocity *= config.max_velocity / speed;
    }

    let displacement = body.velocity * step_time;
    let swept = swept_broadphase_box(&collider.bounds_at(position), &displacement);
    *position += displacement;

    body.is_grounded = false;

    // Colliders are visited once each, in snapshot order. A correction can
    // push the body somewhere the swept box never covered, so the broad
    // phase is asked again around the corrected box and any later entries
    // it reports join the pass.
    let mut pending: BTreeSet<usize> = contacts.broad_phase.query_aabb(&swept).into_iter().collect();
    let mut cursor = 0;

    while let Some(&index) = pending.range(cursor..).next() {
        cursor = index + 1;

        let Some(other) = contacts.colliders.get(index) else {
            continue;
        };
        if other.handle == collider.handle {
            continue;
        }

        let own = collider.bounds_at(position);
        if !intersects(&own, &other.bounds) {
            continue;
        }

        let correction = penetration_depth(&own, &other.bounds);
        if correction == Vec3::zeros() {
            continue;
        }
        *position += correction;
        resolve_contact_velocity(body, &correction);

        let moved = collider.bounds_at(position);
        pending.extend(
            contacts
                .broad_phase
                .query_aabb(&moved)
                .into_iter()
                .filter(|&candidate| candidate >= cursor),
        );
    }
}

/// Cancel the velocity components pushed against by a positional correction
fn resolve_contact_velocity(body: &mut RigidbodyState, correction: &Vec3) {
    if correction.y > COLLISION_EPSILON && body.velocity.y < 0.0 {
        // Landed on top of something
        body.velocity.y = 0.0;
        body.is_grounded = true;
    } else if correction.y < -COLLISION_EPSILON && body.velocity.y > 0.0 {
        // Hit a ceiling
        body.velocity.y = 0.0;
    }

    if correction.x.abs() > COLLISION_EPSILON {
        body.velocity.x = 0.0;
    }
    if correction.z.abs() > COLLISION_EPSILON {
        body.velocity.z = 0.0;
    }
}

/// Integrate one body over a whole frame. Returns the number of substeps.
pub fn integrate(
    body: &mut RigidbodyState,
    position: &mut Vec3,
    collider: &BodyCollider,
    contacts: &ContactWorld<'_>,
    config: &PhysicsConfig,
    delta_time: f32,
) -> u32 {
    let (steps, step_time) = substeps(delta_time, config.max_time_step);

    for _ in 0..steps {
        step_once(body, position, collider, contacts, config, step_time);
    }

    log::trace!(
        "Integrated {:?}: {steps} substeps, position {position:?}, velocity {:?}, grounded {}",
        collider.handle,
        body.velocity,
        body.is_grounded
    );
    steps
}
