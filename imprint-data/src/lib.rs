//! Imprint Data Crate
//!
//! Engine-agnostic geometry data used throughout the imprint ecosystem:
//! indexed triangle meshes, TRS transforms, and a few procedural mesh
//! generators for tests and demos. This crate knows nothing about rendering
//! or tracking; it is plain CPU-side data.

pub mod mesh;
pub mod primitives;
pub mod transform;

pub use mesh::{MeshError, TriMesh, Vertex};
pub use primitives::{cube_mesh, plane_mesh, sphere_mesh};
pub use transform::Transform;
