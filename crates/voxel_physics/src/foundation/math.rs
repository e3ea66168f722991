//! Math utilities and types
//!
//! Vector and matrix primitives shared by the collision, integration and
//! ray casting code. Everything is backed by nalgebra, so the float, double
//! and integer variants are the same generic types with different scalars.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    RealField,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Double precision 2D vector
pub type Vec2d = Vector2<f64>;

/// Double precision 3D vector
pub type Vec3d = Vector3<f64>;

/// Integer 2D vector (chunk and column coordinates)
pub type Vec2i = Vector2<i32>;

/// Integer 3D vector (voxel and grid cell coordinates)
pub type Vec3i = Vector3<i32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }

    /// Combine this transform with a child transform
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }
}

/// Vector helpers that nalgebra does not provide with the semantics we need.
///
/// Degenerate input never produces NaN: a zero-length vector normalizes to
/// the zero vector.
pub trait VectorExt: Sized {
    /// Normalize, or return the zero vector when the length is zero
    fn normalize_or_zero(&self) -> Self;

    /// Linear interpolation towards `other`
    fn lerp_to(&self, other: &Self, t: f32) -> Self;
}

impl<T> VectorExt for Vector3<T>
where
    T: RealField + Copy + From<f32>,
{
    fn normalize_or_zero(&self) -> Self {
        let length = self.norm();
        if length > T::zero() {
            self / length
        } else {
            Self::zeros()
        }
    }

    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        self.lerp(other, T::from(t))
    }
}

impl<T> VectorExt for Vector2<T>
where
    T: RealField + Copy + From<f32>,
{
    fn normalize_or_zero(&self) -> Self {
        let length = self.norm();
        if length > T::zero() {
            self / length
        } else {
            Self::zeros()
        }
    }

    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        self.lerp(other, T::from(t))
    }
}

/// Transform a surface normal by the rotation/scale part of a 4x4 matrix.
///
/// Translation is ignored and the result is renormalized.
pub fn transform_normal(matrix: &Mat4, normal: &Vec3) -> Vec3 {
    let linear = matrix.fixed_view::<3, 3>(0, 0);
    (linear * normal).normalize_or_zero()
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_or_zero_handles_degenerate_input() {
        assert_eq!(Vec3::zeros().normalize_or_zero(), Vec3::zeros());
        assert_eq!(Vec2::zeros().normalize_or_zero(), Vec2::zeros());

        let n = Vec3::new(3.0, 0.0, 4.0).normalize_or_zero();
        assert_relative_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
    }

    #[test]
    fn test_double_precision_variant_shares_helpers() {
        let a = Vec3d::new(0.0, 0.0, 0.0);
        let b = Vec3d::new(2.0, 4.0, -6.0);
        assert_relative_eq!(a.lerp_to(&b, 0.5), Vec3d::new(1.0, 2.0, -3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_integer_vectors_support_componentwise_math() {
        let a = Vec3i::new(1, -2, 3);
        let b = Vec3i::new(4, 5, -6);
        assert_eq!(a + b, Vec3i::new(5, 3, -3));
        assert_eq!(a.dot(&b), 4 - 10 - 18);
    }

    #[test]
    fn test_transform_normal_ignores_translation() {
        let transform = Transform {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
            scale: Vec3::new(1.0, 1.0, 1.0),
        };
        let normal = transform_normal(&transform.to_matrix(), &Vec3::x());
        assert_relative_eq!(normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_combine_applies_parent_scale_and_rotation() {
        let parent = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::identity(),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let child = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        let combined = parent.combine(&child);
        assert_relative_eq!(combined.position, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(
            combined.transform_point(Point3::origin()),
            Point3::new(1.0, 2.0, 0.0),
            epsilon = 1e-6
        );
    }
}
