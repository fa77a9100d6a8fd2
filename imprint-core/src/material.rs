//! Per-decal material instances.
//!
//! Every placement clones the shared template with a fresh identity and a
//! randomized tint. The identity is what the merge operation groups by.

use glam::Vec3;
use rand::Rng;

/// Stable identity of a material instance. Explicit key type for
/// merge-by-material grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

/// A concrete material instance attached to one or more decal primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalMaterial {
    pub id: MaterialId,
    /// Per-decal RGB tint in [0, 1].
    pub tint: Vec3,
    /// Depth bias factor so coplanar decals render without z-fighting the
    /// base surface or each other.
    pub polygon_offset: f32,
}

/// The shared material template that placements are cloned from.
#[derive(Debug)]
pub struct MaterialTemplate {
    next_id: u64,
    polygon_offset: f32,
}

impl MaterialTemplate {
    pub fn new(polygon_offset: f32) -> Self {
        Self {
            next_id: 0,
            polygon_offset,
        }
    }

    /// Clone the template into a fresh instance with the given tint.
    pub fn instantiate(&mut self, tint: Vec3) -> DecalMaterial {
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        DecalMaterial {
            id,
            tint,
            polygon_offset: self.polygon_offset,
        }
    }

    /// Clone the template with a uniformly random tint.
    pub fn instantiate_random<R: Rng>(&mut self, rng: &mut R) -> DecalMaterial {
        let tint = Vec3::new(rng.r#gen(), rng.r#gen(), rng.r#gen());
        self.instantiate(tint)
    }
}

impl Default for MaterialTemplate {
    fn default() -> Self {
        // Matches the usual decal setup: pull the patch toward the camera in
        // depth so it wins against the base surface.
        Self::new(-4.0)
    }
}
