//! Pose updates delivered by the tracking framework.

use glam::{Quat, Vec3};

/// Tri-state visibility of the tracked target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// First seen after not being seen; the anchor's content should attach.
    Found,
    /// Continuously visible; the pose is a routine update.
    Tracked,
    /// First lost after being seen; the anchor's content should detach.
    Lost,
}

/// One per-frame pose sample for the anchor, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub visibility: Visibility,
}

impl TrackedPose {
    pub fn new(position: Vec3, orientation: Quat, visibility: Visibility) -> Self {
        Self {
            position,
            orientation,
            visibility,
        }
    }
}
