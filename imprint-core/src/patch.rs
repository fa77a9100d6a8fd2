//! Surface-conforming decal patch construction.
//!
//! A placement defines an oriented box (position, rotation, scale) in anchor
//! space. The target mesh's triangles are moved into the box's local
//! "projector" space, clipped against its six faces, and the surviving
//! polygons are fanned back into triangles and returned to anchor space.
//! Texture coordinates come straight from the projector-plane coordinates,
//! so the decal image spans the box's XY cross-section.

use glam::{Mat3, Mat4, Vec2, Vec3};
use tracing::{debug, trace};

use crate::stamp::DecalPlacement;
use crate::surface::TargetSurface;

/// Clipped patch geometry in anchor space: a triangle soup with one
/// position, shading normal, and UV per vertex.
///
/// An empty patch (degenerate clip) is legal and treated as a harmless
/// no-op by every consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecalPatch {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

impl DecalPatch {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another patch with `transform` applied to its geometry.
    /// Normals use the direction-only form of the transform.
    pub fn extend_transformed(&mut self, other: &DecalPatch, transform: Mat4) {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        self.positions
            .extend(other.positions.iter().map(|p| transform.transform_point3(*p)));
        self.normals
            .extend(other.normals.iter().map(|n| (normal_matrix * *n).normalize_or_zero()));
        self.uvs.extend_from_slice(&other.uvs);
    }
}

/// One vertex while clipping, in projector space.
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Vec3,
    normal: Vec3,
}

/// Clip a convex polygon against the half-space `dot(p, plane) <= limit`
/// (Sutherland–Hodgman, one plane at a time).
fn clip_polygon(polygon: &[ClipVertex], plane: Vec3, limit: f32) -> Vec<ClipVertex> {
    let mut output = Vec::with_capacity(polygon.len() + 1);

    for (index, current) in polygon.iter().enumerate() {
        let next = &polygon[(index + 1) % polygon.len()];
        let current_distance = current.position.dot(plane) - limit;
        let next_distance = next.position.dot(plane) - limit;

        if current_distance <= 0.0 {
            output.push(*current);
        }
        // Edge crosses the plane: emit the intersection point.
        if (current_distance <= 0.0) != (next_distance <= 0.0) {
            let t = current_distance / (current_distance - next_distance);
            output.push(ClipVertex {
                position: current.position.lerp(next.position, t),
                normal: current.normal.lerp(next.normal, t).normalize_or_zero(),
            });
        }
    }

    output
}

/// Build the surface-conforming patch for a placement.
///
/// Returns an empty patch when no mesh triangle overlaps the projection
/// volume; callers append it unconditionally.
pub fn build_patch(placement: &DecalPlacement, surface: &TargetSurface) -> DecalPatch {
    let projector = Mat4::from_rotation_translation(placement.rotation, placement.position);
    let to_projector = projector.inverse() * surface.anchor_matrix();
    let normal_to_projector = Mat3::from_mat4(to_projector).inverse().transpose();

    let half = placement.scale * 0.5;
    let planes = [
        (Vec3::X, half.x),
        (Vec3::NEG_X, half.x),
        (Vec3::Y, half.y),
        (Vec3::NEG_Y, half.y),
        (Vec3::Z, half.z),
        (Vec3::NEG_Z, half.z),
    ];

    let mut patch = DecalPatch::default();

    for triangle in surface.mesh.triangles() {
        let mut polygon: Vec<ClipVertex> = triangle
            .iter()
            .map(|v| ClipVertex {
                position: to_projector.transform_point3(v.position),
                normal: (normal_to_projector * v.normal).normalize_or_zero(),
            })
            .collect();

        for (plane, limit) in planes {
            if polygon.len() < 3 {
                break;
            }
            polygon = clip_polygon(&polygon, plane, limit);
        }
        if polygon.len() < 3 {
            continue;
        }

        // Fan the clipped polygon back into triangles.
        for i in 1..polygon.len() - 1 {
            for vertex in [polygon[0], polygon[i], polygon[i + 1]] {
                patch.positions.push(projector.transform_point3(vertex.position));
                patch
                    .normals
                    .push((placement.rotation * vertex.normal).normalize_or_zero());
                patch.uvs.push(Vec2::new(
                    0.5 + vertex.position.x / placement.scale.x,
                    0.5 + vertex.position.y / placement.scale.y,
                ));
            }
        }
    }

    if patch.is_empty() {
        debug!("Decal clip produced no geometry at {:?}", placement.position);
    } else {
        trace!(
            "Decal patch: {} triangles at {:?}",
            patch.triangle_count(),
            placement.position
        );
    }

    patch
}
