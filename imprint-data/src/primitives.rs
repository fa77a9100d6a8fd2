//! Procedural mesh generators.
//!
//! Stand-in target surfaces for tests and the headless demo. A real host
//! supplies its own loaded mesh; these keep the rest of the workspace
//! exercisable without any asset pipeline.

use glam::Vec3;
use tracing::debug;

use crate::mesh::TriMesh;

/// An axis-aligned cube centered at the origin with the given edge length.
pub fn cube_mesh(size: f32) -> TriMesh {
    let s = size / 2.0;

    // 4 vertices per face so every face carries its own flat normal.
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),   // front
        (-Vec3::Z, -Vec3::X, Vec3::Y), // back
        (Vec3::X, -Vec3::Z, Vec3::Y),  // right
        (-Vec3::X, Vec3::Z, Vec3::Y),  // left
        (Vec3::Y, Vec3::X, -Vec3::Z),  // top
        (-Vec3::Y, Vec3::X, Vec3::Z),  // bottom
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (normal, right, up)) in faces.iter().enumerate() {
        let center = *normal * s;
        positions.push(center - *right * s - *up * s);
        positions.push(center + *right * s - *up * s);
        positions.push(center + *right * s + *up * s);
        positions.push(center - *right * s + *up * s);
        normals.extend([*normal; 4]);

        let base = (face * 4) as u32;
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    TriMesh::new(positions, normals, indices).expect("cube buffers are well formed")
}

/// A flat rectangle in the XZ plane, facing +Y, centered at the origin.
pub fn plane_mesh(width: f32, depth: f32) -> TriMesh {
    let w = width / 2.0;
    let d = depth / 2.0;

    let positions = vec![
        Vec3::new(-w, 0.0, -d),
        Vec3::new(w, 0.0, -d),
        Vec3::new(w, 0.0, d),
        Vec3::new(-w, 0.0, d),
    ];
    let normals = vec![Vec3::Y; 4];

    // Counter-clockwise when viewed from above.
    let indices = vec![0, 2, 1, 0, 3, 2];

    TriMesh::new(positions, normals, indices).expect("plane buffers are well formed")
}

/// A UV sphere centered at the origin.
///
/// Panics if `sectors < 3` or `stacks < 2`; anything coarser cannot close
/// the surface (and a zero count would divide the stack angle by zero).
pub fn sphere_mesh(radius: f32, sectors: u32, stacks: u32) -> TriMesh {
    assert!(sectors >= 3, "sphere needs at least 3 sectors, got {sectors}");
    assert!(stacks >= 2, "sphere needs at least 2 stacks, got {stacks}");

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=stacks {
        let stack_angle =
            std::f32::consts::FRAC_PI_2 - i as f32 * std::f32::consts::PI / stacks as f32;
        let xz = radius * stack_angle.cos();
        let y = radius * stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * std::f32::consts::TAU / sectors as f32;
            let position = Vec3::new(xz * sector_angle.cos(), y, xz * sector_angle.sin());
            positions.push(position);
            normals.push(position / radius);
        }
    }

    for i in 0..stacks {
        let k1 = i * (sectors + 1);
        let k2 = k1 + sectors + 1;

        for j in 0..sectors {
            if i != 0 {
                indices.extend([k1 + j, k2 + j, k1 + j + 1]);
            }
            if i != stacks - 1 {
                indices.extend([k1 + j + 1, k2 + j, k2 + j + 1]);
            }
        }
    }

    debug!(
        "Generated sphere mesh: {} vertices, {} triangles",
        positions.len(),
        indices.len() / 3
    );

    TriMesh::new(positions, normals, indices).expect("sphere buffers are well formed")
}
