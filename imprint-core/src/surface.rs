//! The decorable target surface.

use glam::Mat4;

use imprint_data::{Transform, TriMesh};

/// The mesh being decorated, placed inside the anchor frame.
///
/// The mesh itself comes from whatever asset loader the host uses; this core
/// only requires a ready-made triangle mesh. The transform positions the
/// mesh within the anchor (it is NOT the anchor's world pose).
#[derive(Debug, Clone)]
pub struct TargetSurface {
    pub mesh: TriMesh,
    pub transform: Transform,
}

impl TargetSurface {
    pub fn new(mesh: TriMesh, transform: Transform) -> Self {
        Self { mesh, transform }
    }

    /// The mesh-to-world matrix given the anchor's current world pose.
    pub fn world_matrix(&self, anchor_to_world: &Transform) -> Mat4 {
        anchor_to_world.to_matrix() * self.transform.to_matrix()
    }

    /// The mesh-to-anchor matrix.
    pub fn anchor_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}
