//! The stamping session controller.
//!
//! Owns every piece of mutable state the core operates on and exposes the
//! three callbacks the host wires up. The required ordering is: the host
//! calls [`StampSession::on_frame`] with the current pose and views BEFORE
//! delivering any pointer events for that frame, so the frame transport
//! never serves a stale inverse.

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

use imprint_core::{
    DecalCollection, DecalPrimitive, FrameTransport, MaterialTemplate, PointerGizmo, SpaceError,
    StampParams, SurfaceHit, TargetSurface, ViewCamera, build_patch, place, resolve,
};
use imprint_data::Transform;

use crate::tracking::{TrackedPose, Visibility};

/// Errors surfaced by the session dispatcher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Placement attempted before any valid anchor pose was ever observed.
    #[error("anchor has never been seen; stamping requires a tracked pose")]
    AnchorNeverSeen,

    /// The anchor is currently lost; its content is detached from the world.
    #[error("anchor is not currently tracked; the surface is detached")]
    AnchorDetached,

    /// No sub-view has been delivered yet, so there is no camera to cast
    /// rays from.
    #[error("no view delivered yet; cannot cast a pointer ray")]
    NoView,

    #[error(transparent)]
    Space(#[from] SpaceError),
}

/// Everything the host hands over once per display frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// This frame's anchor pose sample, if the tracker produced one.
    pub anchor: Option<TrackedPose>,
    /// Camera pose + projection per rendered sub-view. One entry means mono
    /// rendering, more means stereo.
    pub views: &'a [ViewCamera],
    /// Full viewport size in device pixels.
    pub viewport: Vec2,
}

/// The single-threaded controller owning all stamping state.
pub struct StampSession {
    surface: TargetSurface,
    /// Last known anchor world pose; only meaningful once `ever_seen`.
    anchor: Transform,
    transport: FrameTransport,
    /// Whether the anchor's content is currently attached to the world.
    attached: bool,
    gizmo: PointerGizmo,
    /// Live-bound parameter block; the host GUI mutates this directly.
    pub params: StampParams,
    template: MaterialTemplate,
    collection: DecalCollection,
    views: Vec<ViewCamera>,
    viewport: Vec2,
    rng: StdRng,
    last_hit: Option<SurfaceHit>,
}

impl StampSession {
    /// Create a session around the decorable surface.
    pub fn new(surface: TargetSurface, params: StampParams) -> Self {
        Self::with_seed(surface, params, rand::random())
    }

    /// Create a session with a deterministic random stream.
    pub fn with_seed(surface: TargetSurface, params: StampParams, seed: u64) -> Self {
        Self {
            surface,
            anchor: Transform::default(),
            transport: FrameTransport::new(),
            attached: false,
            gizmo: PointerGizmo::default(),
            params,
            template: MaterialTemplate::default(),
            collection: DecalCollection::new(),
            views: Vec::new(),
            viewport: Vec2::ONE,
            rng: StdRng::seed_from_u64(seed),
            last_hit: None,
        }
    }

    /// Per-frame update. Refreshes the frame transport from the tracked pose
    /// and latches the sub-view cameras used by subsequent pointer events.
    pub fn on_frame(&mut self, input: &FrameInput<'_>) {
        self.views.clear();
        self.views.extend_from_slice(input.views);
        self.viewport = input.viewport;

        let Some(pose) = input.anchor else {
            return;
        };

        match pose.visibility {
            Visibility::Found => {
                info!("Anchor acquired; attaching surface content");
                self.attached = true;
                self.update_anchor(&pose);
            }
            Visibility::Tracked => {
                self.update_anchor(&pose);
            }
            Visibility::Lost => {
                // Detach only; decal history survives loss and reacquisition.
                info!(
                    "Anchor lost; detaching surface content ({} decals retained)",
                    self.collection.len()
                );
                self.attached = false;
            }
        }
    }

    fn update_anchor(&mut self, pose: &TrackedPose) {
        self.anchor = Transform::from_position_rotation(pose.position, pose.orientation);
        self.transport.refresh(&self.anchor);
    }

    /// Hover hit test. Runs only in mono rendering mode (in stereo the
    /// gizmo's pose would be ambiguous across sub-views) and only while the
    /// surface is attached.
    pub fn on_pointer_move(&mut self, device: Vec2) -> Option<SurfaceHit> {
        if !self.is_mono() || !self.attached {
            return None;
        }
        let camera = *self.views.first()?;
        self.last_hit = resolve(
            device,
            self.viewport,
            &camera,
            &self.surface,
            &self.anchor,
            &mut self.gizmo,
        );
        self.last_hit
    }

    /// Tap / click: hit test and, on a hit, stamp a new decal.
    ///
    /// Returns the index of the appended primitive, or `None` when the ray
    /// missed the surface (a silent no-op, never an error).
    pub fn on_pointer_up(&mut self, device: Vec2) -> Result<Option<usize>, SessionError> {
        if !self.transport.is_ready() {
            return Err(SessionError::AnchorNeverSeen);
        }
        if !self.attached {
            return Err(SessionError::AnchorDetached);
        }
        let camera = *self.views.first().ok_or(SessionError::NoView)?;

        let Some(hit) = resolve(
            device,
            self.viewport,
            &camera,
            &self.surface,
            &self.anchor,
            &mut self.gizmo,
        ) else {
            debug!("Pointer up missed the surface");
            self.last_hit = None;
            return Ok(None);
        };
        self.last_hit = Some(hit);

        let placement = place(
            &hit,
            &self.gizmo,
            camera.position,
            self.anchor.position,
            &self.params,
            &self.transport,
            &mut self.rng,
        )?;
        let patch = build_patch(&placement, &self.surface);
        let material = self.template.instantiate(placement.tint);
        self.collection.push(DecalPrimitive::new(patch, material));

        Ok(Some(self.collection.len() - 1))
    }

    /// Remove all stamped decals.
    pub fn clear(&mut self) {
        self.collection.clear();
    }

    /// Consolidate decals sharing a material into one primitive per
    /// material. Intended as a draw-call optimization once editing is done.
    pub fn merge(&mut self) {
        self.collection.merge_by_material();
    }

    pub fn decals(&self) -> &DecalCollection {
        &self.collection
    }

    pub fn gizmo(&self) -> &PointerGizmo {
        &self.gizmo
    }

    pub fn last_hit(&self) -> Option<SurfaceHit> {
        self.last_hit
    }

    /// Whether the anchor's content is currently attached to the world.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Mono rendering mode: exactly one sub-view this frame.
    pub fn is_mono(&self) -> bool {
        self.views.len() == 1
    }

    pub fn surface(&self) -> &TargetSurface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat, Vec3};
    use imprint_core::OrientationPolicy;
    use imprint_data::cube_mesh;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn test_session() -> StampSession {
        let surface = TargetSurface::new(cube_mesh(1.0), Transform::default());
        StampSession::with_seed(surface, StampParams::default(), 7)
    }

    fn front_view() -> ViewCamera {
        ViewCamera::looking_at(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::ZERO,
            Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_3, 800.0 / 600.0, 0.1, 100.0),
        )
    }

    fn found_pose() -> TrackedPose {
        TrackedPose::new(Vec3::ZERO, Quat::IDENTITY, Visibility::Found)
    }

    fn tracked_pose() -> TrackedPose {
        TrackedPose::new(Vec3::ZERO, Quat::IDENTITY, Visibility::Tracked)
    }

    fn lost_pose() -> TrackedPose {
        TrackedPose::new(Vec3::ZERO, Quat::IDENTITY, Visibility::Lost)
    }

    fn frame(session: &mut StampSession, pose: Option<TrackedPose>, views: &[ViewCamera]) {
        session.on_frame(&FrameInput {
            anchor: pose,
            views,
            viewport: VIEWPORT,
        });
    }

    #[test]
    fn test_stamp_before_any_pose_is_rejected() {
        let mut session = test_session();
        frame(&mut session, None, &[front_view()]);
        let result = session.on_pointer_up(VIEWPORT / 2.0);
        assert_eq!(result.unwrap_err(), SessionError::AnchorNeverSeen);
    }

    #[test]
    fn test_center_tap_stamps_a_decal() {
        let mut session = test_session();
        frame(&mut session, Some(found_pose()), &[front_view()]);

        let index = session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        assert_eq!(index, Some(0));
        assert_eq!(session.decals().len(), 1);

        let primitive = session.decals().iter().next().unwrap();
        assert!(!primitive.patch.is_empty());
    }

    #[test]
    fn test_missed_tap_is_a_silent_noop() {
        let mut session = test_session();
        frame(&mut session, Some(found_pose()), &[front_view()]);

        let index = session.on_pointer_up(Vec2::new(1.0, 1.0)).unwrap();
        assert_eq!(index, None);
        assert!(session.decals().is_empty());
    }

    #[test]
    fn test_clear_after_five_placements() {
        let mut session = test_session();
        frame(&mut session, Some(found_pose()), &[front_view()]);

        for _ in 0..5 {
            session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        }
        assert_eq!(session.decals().len(), 5);

        session.clear();
        assert_eq!(session.decals().len(), 0);

        session.merge();
        assert_eq!(session.decals().len(), 0);
    }

    #[test]
    fn test_pointer_move_requires_mono_mode() {
        let mut session = test_session();
        let views = [front_view(), front_view()];
        frame(&mut session, Some(found_pose()), &views);

        assert!(!session.is_mono());
        assert!(session.on_pointer_move(VIEWPORT / 2.0).is_none());

        frame(&mut session, Some(tracked_pose()), &views[..1]);
        assert!(session.is_mono());
        assert!(session.on_pointer_move(VIEWPORT / 2.0).is_some());
    }

    #[test]
    fn test_stereo_tap_still_stamps() {
        let mut session = test_session();
        let views = [front_view(), front_view()];
        frame(&mut session, Some(found_pose()), &views);

        let index = session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        assert_eq!(index, Some(0));
    }

    #[test]
    fn test_tracking_loss_detaches_but_keeps_history() {
        let mut session = test_session();
        frame(&mut session, Some(found_pose()), &[front_view()]);
        for _ in 0..3 {
            session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        }

        frame(&mut session, Some(lost_pose()), &[front_view()]);
        assert!(!session.is_attached());
        assert_eq!(
            session.on_pointer_up(VIEWPORT / 2.0).unwrap_err(),
            SessionError::AnchorDetached
        );
        assert!(session.on_pointer_move(VIEWPORT / 2.0).is_none());

        // Reacquisition restores the surface with its decal history intact.
        frame(&mut session, Some(found_pose()), &[front_view()]);
        assert!(session.is_attached());
        assert_eq!(session.decals().len(), 3);
        session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        assert_eq!(session.decals().len(), 4);
    }

    #[test]
    fn test_anchor_motion_moves_placements() {
        let mut session = test_session();
        session.params.rotate = false;
        frame(&mut session, Some(found_pose()), &[front_view()]);
        session.on_pointer_up(VIEWPORT / 2.0).unwrap();

        // Anchor slides; the same screen tap lands on a different part of
        // the surface, expressed in anchor-local coordinates.
        let moved = TrackedPose::new(Vec3::new(0.25, 0.0, 0.0), Quat::IDENTITY, Visibility::Tracked);
        frame(&mut session, Some(moved), &[front_view()]);
        session.on_pointer_up(VIEWPORT / 2.0).unwrap();

        let decals: Vec<_> = session.decals().iter().collect();
        let first_x = decals[0].patch.positions.iter().map(|p| p.x).sum::<f32>()
            / decals[0].patch.positions.len() as f32;
        let second_x = decals[1].patch.positions.iter().map(|p| p.x).sum::<f32>()
            / decals[1].patch.positions.len() as f32;
        // The world-space tap stayed centered, so in anchor space the second
        // decal sits on the opposite side of the shift.
        assert!(second_x < first_x - 0.1);
    }

    #[test]
    fn test_merged_session_decals_keep_triangles() {
        let mut session = test_session();
        frame(&mut session, Some(found_pose()), &[front_view()]);
        for _ in 0..4 {
            session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        }

        let before = session.decals().total_triangles();
        session.merge();
        // Each placement cloned the template, so every decal keeps its own
        // material group.
        assert_eq!(session.decals().len(), 4);
        assert_eq!(session.decals().total_triangles(), before);
    }

    #[test]
    fn test_camera_facing_policy_in_session() {
        let mut session = test_session();
        session.params.policy = OrientationPolicy::CameraFacing;
        frame(&mut session, Some(found_pose()), &[front_view()]);
        let index = session.on_pointer_up(VIEWPORT / 2.0).unwrap();
        assert_eq!(index, Some(0));
        assert!(!session.decals().iter().next().unwrap().patch.is_empty());
    }

    #[test]
    fn test_params_serde_round_trip() {
        let params = StampParams {
            policy: OrientationPolicy::CameraFacing,
            min_scale: 3.0,
            max_scale: 12.0,
            rotate: false,
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: StampParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
