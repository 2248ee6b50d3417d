//! Node transform type.
//!
//! Uses plain arrays for the stored components so the identity transform
//! can be a `const`. Convert to matrix form with [`Transform::matrix`].

use crate::math::{mat4_from_scale_rotation_translation, quat_from_array, Mat4, Vec3};

/// A local transform decomposed into translation, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation [x, y, z].
    pub translation: [f32; 3],
    /// Rotation quaternion [x, y, z, w]. Must be unit length.
    pub rotation: [f32; 4],
    /// Scale [x, y, z].
    pub scale: [f32; 3],
}

impl Transform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: [f32; 4]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Compose this transform into a 4x4 TRS matrix.
    pub fn matrix(&self) -> Mat4 {
        mat4_from_scale_rotation_translation(
            Vec3::from(self.scale),
            quat_from_array(self.rotation),
            Vec3::from(self.translation),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{quat_from_rotation_y, quat_to_array, Vec4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t, Transform::IDENTITY);
        assert!((t.matrix() - Mat4::identity()).norm() < 1e-6);
    }

    #[test]
    fn builder() {
        let t = Transform::IDENTITY
            .with_translation([1.0, 2.0, 3.0])
            .with_scale([2.0, 2.0, 2.0]);
        assert_eq!(t.translation, [1.0, 2.0, 3.0]);
        assert_eq!(t.scale, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn matrix_applies_trs_in_order() {
        let t = Transform::IDENTITY
            .with_translation([1.0, 0.0, 0.0])
            .with_rotation(quat_to_array(quat_from_rotation_y(FRAC_PI_2)))
            .with_scale([2.0, 1.0, 1.0]);
        // (1, 0, 0) scales to (2, 0, 0), rotates to (0, 0, -2), translates to (1, 0, -2).
        let p = t.matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 0.0).abs() < 1e-5);
        assert!((p.z - (-2.0)).abs() < 1e-5);
    }
}
