//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::SceneConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Free-fly camera settings.
    pub camera: CameraConfig,
    /// Scripted orbit-camera settings.
    pub orbit_camera: OrbitCameraConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Scene clock settings.
    pub simulation: SimulationConfig,
    /// Bodies that make up the solar system.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Window title.
    pub title: String,
}

/// Initial state and tuning of the free-fly camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position in world space.
    pub position: [f32; 3],
    /// World up direction used to derive the camera basis.
    pub world_up: [f32; 3],
    /// Starting yaw in degrees (-90 looks down -Z).
    pub yaw: f32,
    /// Starting pitch in degrees.
    pub pitch: f32,
    /// Starting field of view in degrees.
    pub zoom: f32,
    /// Movement speed in world units per second.
    pub movement_speed: f32,
    /// Degrees of rotation per pixel of mouse movement.
    pub mouse_sensitivity: f32,
}

/// Parameters of the scripted orbit camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitCameraConfig {
    /// Name of the body the camera circles.
    pub target: String,
    /// Horizontal distance from the target.
    pub radius: f32,
    /// Angular rate of the camera around the target in rad/s.
    pub speed: f32,
    /// Height of the camera above the target.
    pub height: f32,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Invert the vertical mouse-look axis.
    pub invert_y: bool,
    /// Hide and lock the cursor to the window on startup.
    pub capture_cursor: bool,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Background clear color (RGBA).
    pub clear_color: [f32; 4],
    /// Cubemap face images for the skybox, in +X, -X, +Y, -Y, +Z, -Z order.
    pub skybox_faces: Vec<String>,
    /// Draw glow billboards for bodies that have one.
    pub glow: bool,
}

/// Scene clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier applied to wall-clock time before it reaches the scene.
    pub time_scale: f64,
    /// Start with the scene clock paused.
    pub start_paused: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show camera state in the window title.
    pub title_status: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            fullscreen: false,
            title: "Solar System".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 20.0, 200.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: -5.0,
            zoom: 45.0,
            movement_speed: 5.0,
            mouse_sensitivity: 0.1,
        }
    }
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            target: "Earth".to_string(),
            radius: 6.0,
            speed: 0.5,
            height: 2.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            invert_y: false,
            capture_cursor: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 2000.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            skybox_faces: ["right", "left", "top", "bottom", "front", "back"]
                .iter()
                .map(|face| format!("assets/skybox/{face}.png"))
                .collect(),
            glow: true,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            start_paused: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            title_status: true,
            log_level: "info".to_string(),
        }
    }
}

// --- Persistence ---

/// File name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "orrery.ron";

/// Where the settings file lives inside `config_dir`.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Reads `orrery.ron` from `config_dir`, writing the defaults there
    /// first if the file does not exist.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_path(config_dir);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default settings to {}", path.display());
            return Ok(config);
        }
        let config = read_file(&path)?;
        log::info!(
            "Loaded settings from {} ({} bodies)",
            path.display(),
            config.scene.bodies.len()
        );
        Ok(config)
    }

    /// Writes the settings as pretty RON, creating `config_dir` if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_path(config_dir);
        let write_error = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        // Bodies nest four levels deep; keep them readable on one line each.
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(write_error)
    }

    /// Re-reads the file. `Some` only if it now differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_file(&config_path(config_dir))?;
        if &fresh == self {
            return Ok(None);
        }
        log::info!("Settings changed on disk");
        Ok(Some(fresh))
    }
}
