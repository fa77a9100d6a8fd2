//! Ordered decal storage.
//!
//! Insertion order is z-order: later decals draw over earlier ones, and the
//! merge operation preserves first-appearance order of each material group.

use std::collections::HashMap;

use glam::Mat4;
use tracing::{debug, info};

use crate::material::{DecalMaterial, MaterialId};
use crate::patch::DecalPatch;

/// One renderable decal: clipped patch geometry, its local transform, and
/// its material instance.
///
/// Freshly built primitives carry an identity transform because the patch is
/// already baked in anchor space; merge still honors non-identity transforms
/// when concatenating.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalPrimitive {
    pub patch: DecalPatch,
    pub local: Mat4,
    pub material: DecalMaterial,
}

impl DecalPrimitive {
    pub fn new(patch: DecalPatch, material: DecalMaterial) -> Self {
        Self {
            patch,
            local: Mat4::IDENTITY,
            material,
        }
    }
}

/// The anchor's persistent decal list.
#[derive(Debug, Default)]
pub struct DecalCollection {
    primitives: Vec<DecalPrimitive>,
}

impl DecalCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive, keeping insertion order. Empty patches are
    /// appended too; they are harmless no-ops downstream.
    pub fn push(&mut self, primitive: DecalPrimitive) {
        self.primitives.push(primitive);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecalPrimitive> {
        self.primitives.iter()
    }

    /// Total triangle count across all primitives.
    pub fn total_triangles(&self) -> usize {
        self.primitives.iter().map(|p| p.patch.triangle_count()).sum()
    }

    /// Remove every primitive, releasing its geometry and material. There is
    /// no undo; placements are not individually recoverable.
    pub fn clear(&mut self) {
        let dropped = self.primitives.len();
        self.primitives.clear();
        if dropped > 0 {
            info!("Cleared {} decals", dropped);
        }
    }

    /// Consolidate primitives that share a material into one primitive per
    /// material, concatenating each member's geometry with its own local
    /// transform applied.
    ///
    /// Destructive: per-decal boundaries are lost. Idempotent: merging an
    /// already-merged collection changes nothing. Group order follows each
    /// material's first appearance, preserving z-order.
    pub fn merge_by_material(&mut self) {
        if self.primitives.is_empty() {
            return;
        }

        struct MergeGroup {
            material: DecalMaterial,
            patch: DecalPatch,
        }

        let mut order: Vec<MaterialId> = Vec::new();
        let mut groups: HashMap<MaterialId, MergeGroup> = HashMap::new();

        for primitive in self.primitives.drain(..) {
            let group = groups.entry(primitive.material.id).or_insert_with(|| {
                order.push(primitive.material.id);
                MergeGroup {
                    material: primitive.material,
                    patch: DecalPatch::default(),
                }
            });
            group.patch.extend_transformed(&primitive.patch, primitive.local);
        }

        let before = order.len();
        self.primitives = order
            .into_iter()
            .map(|id| {
                let group = groups.remove(&id).expect("group recorded in order list");
                DecalPrimitive::new(group.patch, group.material)
            })
            .collect();

        debug!("Merged decals into {} material groups", before);
    }
}
