//! Small math helpers shared by the pointer and stamping paths.

use glam::{Mat3, Quat, Vec2, Vec3};

/// Map a device coordinate (pixels, y-down) to normalized device
/// coordinates in [-1, 1] with y-up.
pub fn screen_to_ndc(device: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (device.x / viewport.x) * 2.0 - 1.0,
        -(device.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Build a rotation whose local +Z axis points along `forward`.
///
/// `+Z` is the projection axis used throughout the decal pipeline: it points
/// from the viewer into the surface. Degenerate inputs (zero forward, or an
/// `up` parallel to `forward`) fall back to a stable alternate basis instead
/// of producing NaNs.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let mut x = up.cross(z);
    if x.length_squared() < 1e-10 {
        x = Vec3::X.cross(z);
        if x.length_squared() < 1e-10 {
            x = Vec3::Y.cross(z);
        }
    }
    let x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}
