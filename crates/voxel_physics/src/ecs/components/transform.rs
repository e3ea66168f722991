//! Transform component for the ECS system
//!
//! Pure data: the entity's world-space placement. The physics core only
//! ever reads and writes `position`.

use crate::foundation::math::{Transform as MathTransform, Vec3, Quat};

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position (Y-up right-handed)
    pub position: Vec3,

    /// World space rotation quaternion
    pub rotation: Quat,

    /// World space scale factors
    pub scale: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Translate by `delta`
    pub fn translate(&mut self, delta: &Vec3) {
        self.position += delta;
    }

    /// Convert to the math transform type
    pub fn to_math_transform(&self) -> MathTransform {
        MathTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::transform_normal;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_transform_from_position() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let transform = TransformComponent::from_position(position);

        assert_eq!(transform.position, position);
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_translate_accumulates() {
        let mut transform = TransformComponent::default();
        transform.translate(&Vec3::new(1.0, 0.0, 0.0));
        transform.translate(&Vec3::new(0.0, -2.0, 0.5));
        assert_eq!(transform.position, Vec3::new(1.0, -2.0, 0.5));
    }

    #[test]
    fn test_rotation_is_carried_into_matrix() {
        let transform = TransformComponent {
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), PI / 2.0),
            ..Default::default()
        };
        let up = transform_normal(&transform.to_math_transform().to_matrix(), &Vec3::x());
        assert_relative_eq!(up, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }
}
