//! Screen-to-surface hit resolution.
//!
//! Converts a device coordinate into a world-space ray, intersects it with
//! the target mesh only (never other scene content, which would let decals
//! occlude their own placement), and reports the nearest hit in world space.

use glam::{Mat3, Vec2, Vec3};
use tracing::trace;

use imprint_data::Transform;

use crate::camera::ViewCamera;
use crate::math::{look_rotation, screen_to_ndc};
use crate::surface::TargetSurface;

/// How far along the outward normal the gizmo's look target sits.
const GIZMO_LOOK_OFFSET: f32 = 0.01;

/// Intersection epsilon for the ray-triangle test.
const RAY_EPSILON: f32 = 1e-7;

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// The result of a successful hit test, in world space.
///
/// Both the point and the face normal are world-space quantities; the normal
/// is never left in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Nearest intersection point.
    pub point: Vec3,
    /// Unit face normal of the hit triangle.
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Index of the hit triangle in the target mesh.
    pub triangle: usize,
}

/// World-space pose of the visual hit marker.
///
/// Updated on every successful hit test, before any frame-transport
/// conversion, because the surface-aligned orientation policy samples this
/// pose in world space at placement time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGizmo {
    pub position: Vec3,
    /// Orientation with local +Z pointing into the surface (along the
    /// negated outward normal).
    pub rotation: glam::Quat,
    pub visible: bool,
}

impl Default for PointerGizmo {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            visible: false,
        }
    }
}

/// Möller–Trumbore ray-triangle intersection. Returns the ray parameter `t`
/// of the hit, or `None` for misses, backside grazes at parallel incidence,
/// and hits behind the origin. Both triangle sides are accepted.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;

    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}

/// Nearest intersection of a mesh-local ray with the mesh. Returns the ray
/// parameter and triangle index.
fn cast_ray_mesh(ray: &Ray, mesh: &imprint_data::TriMesh) -> Option<(f32, usize)> {
    let mut nearest: Option<(f32, usize)> = None;
    for index in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(index);
        if let Some(t) = ray_triangle(ray, a.position, b.position, c.position) {
            if nearest.is_none_or(|(best, _)| t < best) {
                nearest = Some((t, index));
            }
        }
    }
    nearest
}

/// Resolve a device coordinate to a world-space hit on the target surface.
///
/// On a hit, the gizmo is repositioned at the hit point and oriented to look
/// along the negated outward normal (its look target sits a small offset
/// outside the surface). On a miss the gizmo is left untouched and `None` is
/// returned; callers must not attempt a placement.
pub fn resolve(
    device: Vec2,
    viewport: Vec2,
    camera: &ViewCamera,
    surface: &TargetSurface,
    anchor_to_world: &Transform,
    gizmo: &mut PointerGizmo,
) -> Option<SurfaceHit> {
    let ndc = screen_to_ndc(device, viewport);
    let world_ray = camera.pick_ray(ndc);

    // Intersect in mesh-local space: one matrix inverse instead of
    // transforming every vertex. Ray parameters stay ordered under the
    // affine map, so the nearest local hit is the nearest world hit.
    let mesh_to_world = surface.world_matrix(anchor_to_world);
    let world_to_mesh = mesh_to_world.inverse();
    let local_ray = Ray::new(
        world_to_mesh.transform_point3(world_ray.origin),
        world_to_mesh.transform_vector3(world_ray.direction),
    );

    let (t, triangle) = cast_ray_mesh(&local_ray, &surface.mesh)?;

    let point = mesh_to_world.transform_point3(local_ray.at(t));

    // Face normal to world space, direction-only (inverse-transpose,
    // translation ignored).
    let normal_matrix = Mat3::from_mat4(mesh_to_world).inverse().transpose();
    let normal = (normal_matrix * surface.mesh.face_normal(triangle)).normalize_or_zero();

    let hit = SurfaceHit {
        point,
        normal,
        distance: (point - world_ray.origin).length(),
        triangle,
    };

    gizmo.position = hit.point;
    let look_target = hit.point + hit.normal * GIZMO_LOOK_OFFSET;
    gizmo.rotation = look_rotation(hit.point - look_target, Vec3::Y);
    gizmo.visible = true;

    trace!(
        "Pointer hit triangle {} at {:?}, distance {:.4}",
        hit.triangle, hit.point, hit.distance
    );

    Some(hit)
}
