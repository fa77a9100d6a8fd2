//! Per-view camera state delivered by the host.
//!
//! The tracking framework supplies one pose + projection per rendered
//! sub-view (one in mono, two in stereo). This module only consumes them;
//! it never derives or owns a projection of its own.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::math::look_rotation;
use crate::pointer::Ray;

/// Camera pose and projection for one rendered sub-view.
///
/// The projection matrix uses GL clip-space conventions (NDC z in [-1, 1]),
/// matching what the tracking framework hands over per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation in world space. The camera looks along its local
    /// -Z axis.
    pub rotation: Quat,
    /// Full projection matrix for this sub-view.
    pub projection: Mat4,
}

impl ViewCamera {
    /// Create a view camera from an explicit pose and projection.
    pub fn new(position: Vec3, rotation: Quat, projection: Mat4) -> Self {
        Self {
            position,
            rotation,
            projection,
        }
    }

    /// Convenience constructor for tests and demos: place the camera at
    /// `position` looking toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3, projection: Mat4) -> Self {
        // Camera local +Z points away from the target (looks down -Z).
        let rotation = look_rotation(position - target, Vec3::Y);
        Self {
            position,
            rotation,
            projection,
        }
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Cast a world-space ray through a normalized device coordinate by
    /// unprojecting the near and far clip planes.
    pub fn pick_ray(&self, ndc: Vec2) -> Ray {
        let inverse_vp = self.view_projection().inverse();
        let near = inverse_vp.project_point3(ndc.extend(-1.0));
        let far = inverse_vp.project_point3(ndc.extend(1.0));
        Ray::new(near, (far - near).normalize_or_zero())
    }
}
