//! Placement synthesis: turning a surface hit into a decal recipe.
//!
//! A [`DecalPlacement`] is the immutable geometric recipe for one decal,
//! expressed in anchor-local space so it rides the tracked object. The
//! orientation comes from a policy, the scale from a randomized range, and
//! the position from the hit point moved through the frame transport.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame::{FrameTransport, SpaceError};
use crate::math::look_rotation;
use crate::pointer::{PointerGizmo, SurfaceHit};

/// Divides the UI-facing scale range into world units.
pub const SCALE_NORMALIZATION: f32 = 500.0;

/// How a new decal is oriented at placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationPolicy {
    /// Projection axis runs from the camera through the hit point, so the
    /// decal's visible face points back at the camera.
    CameraFacing,
    /// Orientation sampled from the pointer gizmo's world pose at hit time,
    /// i.e. aligned to the local surface frame.
    #[default]
    SurfaceAligned,
}

/// User-adjustable stamping parameters.
///
/// A host GUI mutates this struct directly; the core only reads it. The
/// scale bounds are in UI units (divided by [`SCALE_NORMALIZATION`] at
/// placement time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampParams {
    pub policy: OrientationPolicy,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Randomize the roll about the projection axis.
    pub rotate: bool,
}

impl Default for StampParams {
    fn default() -> Self {
        Self {
            policy: OrientationPolicy::SurfaceAligned,
            min_scale: 10.0,
            max_scale: 20.0,
            rotate: true,
        }
    }
}

/// The immutable recipe for one decal, in anchor-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalPlacement {
    /// Anchor-local origin of the decal projector.
    pub position: Vec3,
    /// Anchor-local orientation; local +Z is the projection axis.
    pub rotation: Quat,
    /// Uniform world-unit scale, positive on all axes.
    pub scale: Vec3,
    /// RGB tint for the material clone.
    pub tint: Vec3,
}

/// Synthesize a placement from a hit, the configured policy, and the current
/// frame transport.
///
/// Fails only when no anchor pose has ever been observed, which callers must
/// treat as a precondition violation rather than a recoverable miss.
pub fn place<R: Rng>(
    hit: &SurfaceHit,
    gizmo: &PointerGizmo,
    camera_position: Vec3,
    anchor_world_position: Vec3,
    params: &StampParams,
    transport: &FrameTransport,
    rng: &mut R,
) -> Result<DecalPlacement, SpaceError> {
    let world_rotation = match params.policy {
        OrientationPolicy::CameraFacing => {
            // Projection axis points from the camera toward the anchor,
            // through the hit point.
            let toward_anchor = anchor_world_position - camera_position;
            look_rotation(toward_anchor, Vec3::Y)
        }
        OrientationPolicy::SurfaceAligned => gizmo.rotation,
    };

    let anchor_rotation = transport.orientation_to_anchor(world_rotation)?;

    // Decompose so the roll about the projection axis can be overwritten.
    let (rx, ry, mut rz) = anchor_rotation.to_euler(EulerRot::XYZ);
    if params.rotate {
        rz = rng.r#gen::<f32>() * std::f32::consts::TAU;
    }
    let rotation = Quat::from_euler(EulerRot::XYZ, rx, ry, rz);

    // One shared scalar for all three axes: decals scale uniformly.
    let scale_units = params.min_scale + rng.r#gen::<f32>() * (params.max_scale - params.min_scale);
    let scale = Vec3::splat(scale_units / SCALE_NORMALIZATION);

    let position = transport.point_to_anchor(hit.point)?;

    let tint = Vec3::new(rng.r#gen(), rng.r#gen(), rng.r#gen());

    debug!(
        "Placed decal at {:?} (policy {:?}, scale {:.4})",
        position,
        params.policy,
        scale.x
    );

    Ok(DecalPlacement {
        position,
        rotation,
        scale,
        tint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use imprint_data::Transform;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_hit() -> SurfaceHit {
        SurfaceHit {
            point: Vec3::new(0.0, 0.0, 0.5),
            normal: Vec3::Z,
            distance: 1.4,
            triangle: 0,
        }
    }

    fn surface_gizmo(hit: &SurfaceHit) -> PointerGizmo {
        PointerGizmo {
            position: hit.point,
            rotation: look_rotation(-hit.normal, Vec3::Y),
            visible: true,
        }
    }

    fn ready_transport() -> FrameTransport {
        let mut transport = FrameTransport::new();
        transport.refresh(&Transform::default());
        transport
    }

    #[test]
    fn test_degenerate_scale_range_is_deterministic() {
        let params = StampParams {
            min_scale: 10.0,
            max_scale: 10.0,
            rotate: false,
            ..StampParams::default()
        };
        let hit = fixed_hit();
        let placement = place(
            &hit,
            &surface_gizmo(&hit),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &ready_transport(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(placement.scale, Vec3::splat(10.0 / 500.0));
        assert_relative_eq!(placement.scale.x, 0.02);
        assert_relative_eq!(placement.scale.y, 0.02);
        assert_relative_eq!(placement.scale.z, 0.02);
    }

    #[test]
    fn test_scale_stays_inside_range() {
        let params = StampParams {
            min_scale: 5.0,
            max_scale: 25.0,
            rotate: false,
            ..StampParams::default()
        };
        let hit = fixed_hit();
        let gizmo = surface_gizmo(&hit);
        let transport = ready_transport();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..64 {
            let placement = place(
                &hit,
                &gizmo,
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::ZERO,
                &params,
                &transport,
                &mut rng,
            )
            .unwrap();
            let s = placement.scale.x;
            assert!((5.0 / 500.0..=25.0 / 500.0).contains(&s));
            assert_eq!(placement.scale, Vec3::splat(s));
        }
    }

    #[test]
    fn test_camera_facing_responds_to_camera_position() {
        let params = StampParams {
            policy: OrientationPolicy::CameraFacing,
            rotate: false,
            ..StampParams::default()
        };
        let hit = fixed_hit();
        let gizmo = surface_gizmo(&hit);
        let transport = ready_transport();

        let from_front = place(
            &hit,
            &gizmo,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &transport,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        let from_side = place(
            &hit,
            &gizmo,
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &transport,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();

        assert!(from_front.rotation.angle_between(from_side.rotation) > 0.1);
    }

    #[test]
    fn test_surface_aligned_follows_the_gizmo() {
        let params = StampParams {
            policy: OrientationPolicy::SurfaceAligned,
            rotate: false,
            ..StampParams::default()
        };
        let hit = fixed_hit();
        let gizmo = surface_gizmo(&hit);
        let transport = ready_transport();

        let placement = place(
            &hit,
            &gizmo,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &transport,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();

        // Identity anchor: anchor-local rotation equals the gizmo's world
        // rotation, +Z pointing into the surface.
        let forward = placement.rotation * Vec3::Z;
        assert!((forward + hit.normal).length() < 1e-4);
    }

    #[test]
    fn test_random_roll_spins_about_projection_axis() {
        let params = StampParams {
            policy: OrientationPolicy::SurfaceAligned,
            rotate: true,
            ..StampParams::default()
        };
        let hit = fixed_hit();
        let gizmo = surface_gizmo(&hit);
        let transport = ready_transport();

        let a = place(
            &hit,
            &gizmo,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &transport,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        let b = place(
            &hit,
            &gizmo,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &params,
            &transport,
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();

        // Roll differs between seeds but the projection axis is unchanged.
        assert!(a.rotation.angle_between(b.rotation) > 1e-3);
        assert!(((a.rotation * Vec3::Z) - (b.rotation * Vec3::Z)).length() < 1e-4);
    }

    #[test]
    fn test_place_requires_an_anchor_pose() {
        let hit = fixed_hit();
        let result = place(
            &hit,
            &surface_gizmo(&hit),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            &StampParams::default(),
            &FrameTransport::new(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(result.unwrap_err(), SpaceError::NoAnchorPose);
    }

    #[test]
    fn test_position_lands_in_anchor_space() {
        let mut transport = FrameTransport::new();
        transport.refresh(&Transform::from_position(Vec3::new(0.0, 0.0, 0.5)));

        let hit = fixed_hit();
        let params = StampParams {
            rotate: false,
            ..StampParams::default()
        };
        let placement = place(
            &hit,
            &surface_gizmo(&hit),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 0.5),
            &params,
            &transport,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        // World hit (0,0,0.5) with anchor at (0,0,0.5) is the anchor origin.
        assert!(placement.position.length() < 1e-5);
    }
}
