//! The Orrery viewer: frame clock, per-frame update and the winit host.

pub mod clock;
pub mod error;
pub mod frame;
pub mod state;
pub mod window;

pub use clock::{FrameClock, FrameTime, MAX_FRAME_TIME};
pub use error::AppError;
pub use frame::{FrameStats, FrameView, Programs, render_frame};
pub use state::{AppState, HeadlessRenderer, Renderer, register_scene_models};
pub use window::{ViewerApp, run_with_config, window_attributes_from_config};
