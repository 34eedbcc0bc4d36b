//! Configuration system for Orrery.
//!
//! Provides runtime-configurable settings that persist to disk as RON files,
//! including the solar-system scene description. Supports CLI overrides via
//! clap, hot-reload detection, and forward/backward compatible serialization.

mod app_dirs;
mod cli;
mod config;
mod error;
mod scene;

pub use app_dirs::AppDirs;
pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, Config, DebugConfig, InputConfig, OrbitCameraConfig,
    RenderConfig, SimulationConfig, WindowConfig, config_path,
};
pub use error::ConfigError;
pub use scene::{BodyConfig, GlowConfig, ORBIT_RATE_SCALE, SceneConfig, TextureConfig};
