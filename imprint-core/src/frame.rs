//! Transport between world space and the anchor frame.
//!
//! The anchor is the trackable-relative object hosting the decorated mesh.
//! Its world pose changes every frame, so anything expressed in world space
//! (hit points, look-at rotations) has to be moved into anchor-local space
//! before it is stored. The cached inverse here is only valid for the frame
//! it was refreshed in.

use glam::{Mat4, Quat, Vec3};
use thiserror::Error;

use imprint_data::Transform;

/// Errors from frame transport operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpaceError {
    /// No anchor pose has been observed yet; conversions would operate on an
    /// undefined transform.
    #[error("no anchor pose observed yet; refresh the transport first")]
    NoAnchorPose,
}

#[derive(Debug, Clone, Copy)]
struct Cached {
    world_to_anchor: Mat4,
    anchor_to_world: Mat4,
    /// Rotation-only inverse, used for directions and orientations where
    /// translation and scale must be discarded.
    inverse_rotation: Quat,
}

/// Caches the world-to-anchor transform and converts points, directions,
/// and orientations between the two frames.
///
/// All conversions are deterministic functions of the last [`refresh`]; the
/// cached inverse is the only internal state. Refresh once per frame, before
/// any hit test or placement consumes world-space data.
///
/// [`refresh`]: FrameTransport::refresh
#[derive(Debug, Default)]
pub struct FrameTransport {
    cached: Option<Cached>,
}

impl FrameTransport {
    /// A transport with no observed anchor pose. Every conversion fails with
    /// [`SpaceError::NoAnchorPose`] until the first [`refresh`].
    ///
    /// [`refresh`]: FrameTransport::refresh
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pose has ever been observed.
    pub fn is_ready(&self) -> bool {
        self.cached.is_some()
    }

    /// Recompute the cached inverse from the anchor's current world pose.
    pub fn refresh(&mut self, anchor_to_world: &Transform) {
        self.cached = Some(Cached {
            world_to_anchor: anchor_to_world.to_matrix().inverse(),
            anchor_to_world: anchor_to_world.to_matrix(),
            inverse_rotation: anchor_to_world.rotation.inverse(),
        });
    }

    fn cached(&self) -> Result<&Cached, SpaceError> {
        self.cached.as_ref().ok_or(SpaceError::NoAnchorPose)
    }

    /// The current world-to-anchor matrix.
    pub fn world_to_anchor(&self) -> Result<Mat4, SpaceError> {
        Ok(self.cached()?.world_to_anchor)
    }

    /// Move a world-space point into anchor-local space.
    pub fn point_to_anchor(&self, world_point: Vec3) -> Result<Vec3, SpaceError> {
        Ok(self.cached()?.world_to_anchor.transform_point3(world_point))
    }

    /// Move an anchor-local point back into world space.
    pub fn point_to_world(&self, anchor_point: Vec3) -> Result<Vec3, SpaceError> {
        Ok(self.cached()?.anchor_to_world.transform_point3(anchor_point))
    }

    /// Move a world-space direction into anchor-local space. Rotation only;
    /// translation and scale do not apply to directions.
    pub fn direction_to_anchor(&self, world_direction: Vec3) -> Result<Vec3, SpaceError> {
        Ok(self.cached()?.inverse_rotation * world_direction)
    }

    /// Move a world-space orientation into anchor-local space, keeping only
    /// the rotation component.
    pub fn orientation_to_anchor(&self, world_orientation: Quat) -> Result<Quat, SpaceError> {
        Ok(self.cached()?.inverse_rotation * world_orientation)
    }
}
