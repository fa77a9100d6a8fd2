//! Imprint Session Crate
//!
//! Event-driven orchestration of the decal core. The host (render loop +
//! input system + tracking framework) drives a [`StampSession`] through a
//! small dispatcher surface: `on_frame`, `on_pointer_move`, `on_pointer_up`.
//! All shared state lives in the session object; there are no globals and no
//! threads.

pub mod session;
pub mod tracking;

pub use imprint_core::{OrientationPolicy, StampParams};
pub use session::{FrameInput, SessionError, StampSession};
pub use tracking::{TrackedPose, Visibility};
