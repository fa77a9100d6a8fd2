//! TRS transforms between coordinate frames.

use glam::{Mat4, Quat, Vec3};

/// A translation / rotation / scale transform.
///
/// Used both for the anchor's pose in world space and for the target mesh's
/// placement inside the anchor frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation component.
    pub position: Vec3,
    /// Rotation component (unit quaternion).
    pub rotation: Quat,
    /// Per-axis scale (all components non-zero).
    pub scale: Vec3,
}

impl Transform {
    /// Create a transform from all three components.
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// A pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// A rigid transform (translation + rotation, unit scale).
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// The 4x4 matrix form, scale applied first, then rotation, then
    /// translation.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Transform a point (applies scale, rotation, and translation).
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (self.scale * point) + self.position
    }

    /// Transform a direction (applies scale and rotation, no translation).
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (self.scale * vector)
    }

    /// The inverse as a matrix.
    ///
    /// The forward map is `R·S·p + t`, so its inverse applies `S⁻¹` AFTER
    /// `R⁻¹` — with non-uniform scale that is not itself a TRS transform,
    /// which is why this returns a [`Mat4`] instead of `Self`.
    pub fn inverse_matrix(&self) -> Mat4 {
        self.to_matrix().inverse()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl From<Mat4> for Transform {
    fn from(mat: Mat4) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}
