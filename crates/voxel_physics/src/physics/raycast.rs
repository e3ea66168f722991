//! Ray casting against registered colliders
//!
//! Boxes are hit with the slab method. The hit normal is the outward face
//! normal of the slab that produced the entry distance.

use crate::ecs::PositionSource;
use crate::foundation::math::{Vec3, VectorExt};
use crate::physics::collider_registry::{ColliderHandle, ColliderRegistry, ResolvedCollider};
use crate::physics::collision::AxisAlignedBox;

/// Direction components smaller than this are treated as parallel to a slab
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the direction has no length
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zeros()
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray origin
    pub origin: Vec3,
    /// Normalized ray direction
    pub direction: Vec3,
    /// The point of intersection in world space
    pub point: Vec3,
    /// Outward normal of the face that was hit
    pub normal: Vec3,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The collider that was hit
    pub collider: ColliderHandle,
}

/// Slab test of `ray` against `bounds`.
///
/// Returns the entry distance and the normal of the entry face. For a ray
/// starting inside the box the entry distance is negative.
pub fn intersect_box(ray: &Ray, bounds: &AxisAlignedBox) -> Option<(f32, Vec3)> {
    let min = bounds.min();
    let max = bounds.max();

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut normal = Vec3::zeros();

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < PARALLEL_EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t1 = (min[axis] - origin) * inv;
        let mut t2 = (max[axis] - origin) * inv;
        // Entering through the min face means facing -axis
        let mut sign = -1.0;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            sign = 1.0;
        }

        if t1 > t_min {
            t_min = t1;
            normal = Vec3::zeros();
            normal[axis] = sign;
        }
        t_max = t_max.min(t2);

        if t_min > t_max {
            return None;
        }
    }

    // Every axis parallel and inside: no slab produced an entry
    if t_min.is_infinite() {
        return None;
    }

    Some((t_min, normal))
}

fn hit_collider(ray: &Ray, collider: &ResolvedCollider, max_distance: f32) -> Option<RayHit> {
    let (distance, normal) = intersect_box(ray, &collider.bounds)?;
    if !(0.0..=max_distance).contains(&distance) {
        return None;
    }

    Some(RayHit {
        origin: ray.origin,
        direction: ray.direction,
        point: ray.point_at(distance),
        normal,
        distance,
        collider: collider.handle,
    })
}

/// Closest hit within `max_distance` among a collider snapshot.
///
/// `ignore` excludes one collider (usually the caster's own). Ties keep the
/// collider that comes first in the snapshot.
pub fn cast_snapshot(
    colliders: &[ResolvedCollider],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    ignore: Option<ColliderHandle>,
) -> Option<RayHit> {
    let ray = Ray::new(origin, direction);
    if ray.is_degenerate() {
        return None;
    }

    colliders
        .iter()
        .filter(|collider| Some(collider.handle) != ignore)
        .filter_map(|collider| hit_collider(&ray, collider, max_distance))
        .fold(None, |closest: Option<RayHit>, hit| match closest {
            Some(best) if best.distance <= hit.distance => Some(best),
            _ => Some(hit),
        })
}

/// Closest hit within `max_distance` among every registered collider.
///
/// Reads a snapshot of the registry and leaves it untouched.
pub fn cast(
    registry: &ColliderRegistry,
    source: &impl PositionSource,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    ignore: Option<ColliderHandle>,
) -> Option<RayHit> {
    let hit = cast_snapshot(&registry.get_all(source), origin, direction, max_distance, ignore);
    log::trace!("Raycast from {origin:?} along {direction:?}: {:?}", hit.map(|h| h.collider));
    hit
}

/// Every hit within `max_distance`, nearest first
pub fn cast_all(
    colliders: &[ResolvedCollider],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    ignore: Option<ColliderHandle>,
) -> Vec<RayHit> {
    let ray = Ray::new(origin, direction);
    if ray.is_degenerate() {
        return Vec::new();
    }

    let mut hits: Vec<RayHit> = colliders
        .iter()
        .filter(|collider| Some(collider.handle) != ignore)
        .filter_map(|collider| hit_collider(&ray, collider, max_distance))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
