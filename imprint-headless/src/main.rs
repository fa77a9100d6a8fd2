//! Imprint Headless Demo
//!
//! Drives a scripted stamping session without a GPU or window: a cube target
//! on a slowly orbiting anchor, a fixed camera, and a burst of synthetic
//! taps. Useful for eyeballing the placement pipeline from logs alone.

use clap::{Parser, ValueEnum};
use glam::{Mat4, Quat, Vec2, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use imprint_core::{OrientationPolicy, StampParams, TargetSurface, ViewCamera};
use imprint_data::{Transform, cube_mesh};
use imprint_session::{FrameInput, SessionError, StampSession, TrackedPose, Visibility};

/// CLI mirror of [`OrientationPolicy`] so clap validates and enumerates the
/// accepted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    CameraFacing,
    SurfaceAligned,
}

impl From<PolicyArg> for OrientationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::CameraFacing => OrientationPolicy::CameraFacing,
            PolicyArg::SurfaceAligned => OrientationPolicy::SurfaceAligned,
        }
    }
}

/// Imprint - headless decal stamping demo
#[derive(Parser, Debug)]
#[command(name = "imprint-headless")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of synthetic taps to stamp
    #[arg(short, long, default_value_t = 8)]
    taps: usize,

    /// Orientation policy for new decals
    #[arg(short, long, value_enum, default_value = "surface-aligned")]
    policy: PolicyArg,

    /// Seed for the placement random stream
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Merge decals by material after stamping
    #[arg(short, long)]
    merge: bool,
}

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SessionError> {
    let policy = OrientationPolicy::from(args.policy);

    let params = StampParams {
        policy,
        ..StampParams::default()
    };
    let surface = TargetSurface::new(cube_mesh(0.2), Transform::default());
    let mut session = StampSession::with_seed(surface, params, args.seed);

    let projection = Mat4::perspective_rh_gl(
        std::f32::consts::FRAC_PI_3,
        VIEWPORT.x / VIEWPORT.y,
        0.01,
        100.0,
    );
    let camera = ViewCamera::looking_at(Vec3::new(0.0, 0.0, 0.6), Vec3::ZERO, projection);

    info!("Stamping {} taps with policy {:?}", args.taps, policy);

    let mut stamped = 0;
    for frame in 0..args.taps {
        // The anchor wobbles a little each frame, like a handheld target.
        let angle = frame as f32 * 0.05;
        let pose = TrackedPose::new(
            Vec3::new(angle.sin() * 0.02, 0.0, 0.0),
            Quat::from_rotation_y(angle),
            if frame == 0 {
                Visibility::Found
            } else {
                Visibility::Tracked
            },
        );
        session.on_frame(&FrameInput {
            anchor: Some(pose),
            views: &[camera],
            viewport: VIEWPORT,
        });

        // Taps wander around the screen center.
        let tap = VIEWPORT / 2.0
            + Vec2::new(
                (frame as f32 * 1.7).sin() * VIEWPORT.x * 0.05,
                (frame as f32 * 2.3).cos() * VIEWPORT.y * 0.05,
            );
        let _ = session.on_pointer_move(tap);

        match session.on_pointer_up(tap)? {
            Some(index) => {
                if let Some(primitive) = session.decals().iter().nth(index) {
                    info!(
                        "Tap {} stamped decal #{} ({} triangles, tint {:?})",
                        frame,
                        index,
                        primitive.patch.triangle_count(),
                        primitive.material.tint
                    );
                }
                stamped += 1;
            }
            None => info!("Tap {} missed the target", frame),
        }
    }

    info!(
        "Session done: {} of {} taps stamped, {} triangles total",
        stamped,
        args.taps,
        session.decals().total_triangles()
    );

    if args.merge {
        session.merge();
        info!(
            "Merged into {} material groups ({} triangles)",
            session.decals().len(),
            session.decals().total_triangles()
        );
    }

    Ok(())
}
