//! Indexed triangle meshes.
//!
//! A [`TriMesh`] is the only geometry representation the rest of the
//! workspace consumes. How it gets filled (procedural generator, asset
//! loader, hand-written test fixture) is the caller's business.

use glam::Vec3;
use thiserror::Error;

/// Errors produced when constructing a mesh from raw buffers.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("index buffer length {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),

    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    #[error("normal count {normals} does not match position count {positions}")]
    NormalCountMismatch { normals: usize, positions: usize },
}

/// One mesh vertex: position plus shading normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// An indexed triangle mesh in its own local space.
#[derive(Debug, Clone)]
pub struct TriMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl TriMesh {
    /// Build a mesh from raw buffers, validating index bounds and buffer
    /// lengths up front so downstream geometry code can index freely.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        if normals.len() != positions.len() {
            return Err(MeshError::NormalCountMismatch {
                normals: normals.len(),
                positions: positions.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// The three vertices of triangle `index`, in winding order.
    ///
    /// Panics if `index >= triangle_count()`; construction validated that
    /// every stored index is in bounds.
    pub fn triangle(&self, index: usize) -> [Vertex; 3] {
        let base = index * 3;
        let fetch = |i: usize| {
            let v = self.indices[base + i] as usize;
            Vertex {
                position: self.positions[v],
                normal: self.normals[v],
            }
        };
        [fetch(0), fetch(1), fetch(2)]
    }

    /// Geometric (face) normal of triangle `index`, unit length or zero for
    /// degenerate triangles.
    pub fn face_normal(&self, index: usize) -> Vec3 {
        let [a, b, c] = self.triangle(index);
        (b.position - a.position)
            .cross(c.position - a.position)
            .normalize_or_zero()
    }

    /// Iterate over all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
