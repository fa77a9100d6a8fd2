//! Imprint Core Crate
//!
//! The algorithmic core of decal stamping on a tracked surface: converting a
//! 2D pointer event into a 3D surface hit, transporting geometry between
//! world space and the moving anchor frame, and synthesizing clipped decal
//! patches that conform to the target mesh.
//!
//! ## Modules
//!
//! - [`camera`]: per-view camera pose + projection, pick-ray construction
//! - [`pointer`]: screen-to-surface hit resolution against the target mesh
//! - [`frame`]: cached world-to-anchor transport
//! - [`stamp`]: placement recipes (orientation policy, scale, tint)
//! - [`patch`]: oriented-box clipping of the target mesh into decal patches
//! - [`material`]: per-decal material instances derived from a template
//! - [`collection`]: ordered decal storage with clear and merge operations

pub mod camera;
pub mod collection;
pub mod frame;
pub mod material;
pub mod math;
pub mod patch;
pub mod pointer;
pub mod stamp;
pub mod surface;

pub use camera::ViewCamera;
pub use collection::{DecalCollection, DecalPrimitive};
pub use frame::{FrameTransport, SpaceError};
pub use material::{DecalMaterial, MaterialId, MaterialTemplate};
pub use patch::{DecalPatch, build_patch};
pub use pointer::{PointerGizmo, Ray, SurfaceHit, resolve};
pub use stamp::{DecalPlacement, OrientationPolicy, StampParams, place};
pub use surface::TargetSurface;
