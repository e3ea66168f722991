//! Axis-aligned box collision math
//!
//! Narrow-phase tests between axis-aligned bounding boxes, the swept box
//! used for broad-phase pruning, and single-axis penetration resolution.
//!
//! All comparisons carry a small tolerance ([`COLLISION_EPSILON`]) so that
//! boxes resting exactly on each other still register as touching.

use crate::foundation::math::Vec3;

/// Tolerance applied to every intersection comparison
pub const COLLISION_EPSILON: f32 = 1e-6;

/// An axis-aligned collision volume described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    /// Center of the box in world space
    pub position: Vec3,
    /// Full extents along each axis (never negative)
    pub size: Vec3,
}

impl AxisAlignedBox {
    /// Create a box from its center and full size.
    ///
    /// Negative size components are clamped to zero.
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size: size.map(|s| s.max(0.0)),
        }
    }

    /// Create a box from its minimum and maximum corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let lo = min.inf(&max);
        let hi = min.sup(&max);
        Self::new((lo + hi) * 0.5, hi - lo)
    }

    /// Minimum corner (`position - size / 2`)
    pub fn min(&self) -> Vec3 {
        self.position - self.half_size()
    }

    /// Maximum corner (`position + size / 2`)
    pub fn max(&self) -> Vec3 {
        self.position + self.half_size()
    }

    /// Half of the full size
    pub fn half_size(&self) -> Vec3 {
        self.size * 0.5
    }

    /// The same box moved to a new center
    pub fn at(&self, position: Vec3) -> Self {
        Self { position, size: self.size }
    }

    /// Check if a point lies inside the box (bounds inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        (0..3).all(|axis| point[axis] >= min[axis] && point[axis] <= max[axis])
    }

    /// Epsilon-tolerant overlap test, see [`intersects`]
    pub fn intersects(&self, other: &AxisAlignedBox) -> bool {
        intersects(self, other)
    }
}

/// True iff the two boxes overlap on all three axes.
///
/// Uses `a.min <= b.max + ε && a.max >= b.min - ε` per axis, so boxes that
/// touch (or are separated by less than ε) count as intersecting. The test
/// is symmetric in `a` and `b`.
pub fn intersects(a: &AxisAlignedBox, b: &AxisAlignedBox) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    (0..3).all(|axis| {
        a_min[axis] <= b_max[axis] + COLLISION_EPSILON
            && a_max[axis] >= b_min[axis] - COLLISION_EPSILON
    })
}

/// Box bounding `bounds` at both its start position and after moving by
/// `displacement`.
///
/// Every axis is extended independently, so diagonal sweeps are covered.
pub fn swept_broadphase_box(bounds: &AxisAlignedBox, displacement: &Vec3) -> AxisAlignedBox {
    let start_min = bounds.min();
    let start_max = bounds.max();
    let end_min = start_min + displacement;
    let end_max = start_max + displacement;

    AxisAlignedBox::from_min_max(start_min.inf(&end_min), start_max.sup(&end_max))
}

/// Correction that pushes `a` out of `b` along the axis of least overlap.
///
/// Per-axis overlap is `half(a) + half(b) - |center(b) - center(a)|`. If any
/// axis is separated by more than ε the boxes are not really penetrating and
/// the zero vector is returned. Otherwise only the smallest overlap is
/// corrected; ties keep the earlier axis (X before Y before Z). The sign
/// points from `b`'s center towards `a`'s; coincident centers push positive.
pub fn penetration_depth(a: &AxisAlignedBox, b: &AxisAlignedBox) -> Vec3 {
    let delta = b.position - a.position;
    let overlap = a.half_size() + b.half_size() - delta.abs();

    if overlap.iter().any(|&o| o < -COLLISION_EPSILON) {
        return Vec3::zeros();
    }

    let mut axis = 0;
    for candidate in 1..3 {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let mut correction = Vec3::zeros();
    correction[axis] = if delta[axis] > 0.0 {
        -overlap[axis]
    } else {
        overlap[axis]
    };
    correction
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box(x: f32, y: f32, z: f32) -> AxisAlignedBox {
        AxisAlignedBox::new(Vec3::new(x, y, z), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_min_max_from_center_and_size() {
        let b = AxisAlignedBox::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min(), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_negative_size_is_clamped() {
        let b = AxisAlignedBox::new(Vec3::zeros(), Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(b.size, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let boxes = [
            unit_box(0.0, 0.0, 0.0),
            unit_box(0.5, 0.5, 0.5),
            unit_box(1.0, 0.0, 0.0),
            unit_box(3.0, 0.0, 0.0),
            AxisAlignedBox::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(10.0, 1.0, 10.0)),
            AxisAlignedBox::new(Vec3::new(2.0, 2.0, 2.0), Vec3::zeros()),
        ];

        for a in &boxes {
            for b in &boxes {
                assert_eq!(intersects(a, b), intersects(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_intersection_tolerance() {
        let a = unit_box(0.0, 0.0, 0.0);

        // Exactly touching faces
        assert!(intersects(&a, &unit_box(1.0, 0.0, 0.0)));

        // Gap of half an epsilon still counts as contact
        let half_eps = unit_box(1.0 + COLLISION_EPSILON * 0.5, 0.0, 0.0);
        assert!(intersects(&a, &half_eps));

        // Gap of ten epsilons is a miss. Built from min/max so the gap is not
        // lost to rounding of the center coordinate.
        let far = AxisAlignedBox::from_min_max(
            Vec3::new(0.5 + 10.0 * COLLISION_EPSILON, -0.5, -0.5),
            Vec3::new(1.5, 0.5, 0.5),
        );
        assert!(!intersects(&a, &far));
    }

    #[test]
    fn test_swept_box_covers_start_and_end() {
        let start = unit_box(0.0, 0.0, 0.0);
        let swept = swept_broadphase_box(&start, &Vec3::new(2.0, -3.0, 0.0));

        assert_relative_eq!(swept.min(), Vec3::new(-0.5, -3.5, -0.5), epsilon = 1e-6);
        assert_relative_eq!(swept.max(), Vec3::new(2.5, 0.5, 0.5), epsilon = 1e-6);
        assert!(intersects(&swept, &start));
        assert!(intersects(&swept, &unit_box(2.0, -3.0, 0.0)));
    }

    #[test]
    fn test_swept_box_with_zero_displacement_is_identity() {
        let start = AxisAlignedBox::new(Vec3::new(4.0, 1.0, -2.0), Vec3::new(1.0, 2.0, 1.0));
        let swept = swept_broadphase_box(&start, &Vec3::zeros());
        assert_relative_eq!(swept.position, start.position, epsilon = 1e-6);
        assert_relative_eq!(swept.size, start.size, epsilon = 1e-6);
    }

    #[test]
    fn test_penetration_resolves_least_overlap_axis_only() {
        // Overlaps of (1, 3, 2) on (x, y, z)
        let b = AxisAlignedBox::new(Vec3::zeros(), Vec3::new(4.0, 4.0, 4.0));
        let a = AxisAlignedBox::new(Vec3::new(2.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 2.0));

        let correction = penetration_depth(&a, &b);
        assert_relative_eq!(correction, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        // From the other side the push is mirrored
        let mirrored = AxisAlignedBox::new(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(2.0, 2.0, 2.0));
        let correction = penetration_depth(&mirrored, &b);
        assert_relative_eq!(correction, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_penetration_tie_prefers_x_then_y() {
        let b = unit_box(0.0, 0.0, 0.0);
        let a = unit_box(0.5, 0.5, 0.5);
        assert_relative_eq!(penetration_depth(&a, &b), Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);

        let a = unit_box(0.0, 0.5, 0.5);
        // X overlap is 1.0 here, Y and Z tie at 0.5
        assert_relative_eq!(penetration_depth(&a, &b), Vec3::new(0.0, 0.5, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_penetration_of_separated_boxes_is_zero() {
        let a = unit_box(0.0, 0.0, 0.0);
        let b = unit_box(0.0, 5.0, 0.0);
        assert_eq!(penetration_depth(&a, &b), Vec3::zeros());
    }

    #[test]
    fn test_penetration_pushes_resting_box_up() {
        let ground = AxisAlignedBox::new(Vec3::zeros(), Vec3::new(10.0, 1.0, 10.0));
        let body = AxisAlignedBox::new(Vec3::new(0.0, 0.9, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let correction = penetration_depth(&body, &ground);
        assert_relative_eq!(correction, Vec3::new(0.0, 0.1, 0.0), epsilon = 1e-5);
    }
}
