//! Orrery: a real-time solar system viewer.
//!
//! Run with: `cargo run -p orrery-app`

use std::process::ExitCode;

use clap::Parser;
use orrery_config::{AppDirs, CliArgs, Config};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(dir) => Ok(AppDirs::from_config_dir(dir)),
        None => AppDirs::resolve(),
    };

    // Logging is not up yet; problems are reported once it is.
    let (mut config, load_error) = match &dirs {
        Ok(dirs) => match Config::load_or_create(&dirs.config_dir) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
        Err(_) => (Config::default(), None),
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs.as_ref().ok().map(|d| d.log_dir.as_path());
    orrery_log::init_logging(log_dir, cfg!(debug_assertions), Some(&config));

    info!("Orrery {}", env!("CARGO_PKG_VERSION"));
    match &dirs {
        Ok(dirs) => info!("Config directory: {}", dirs.config_dir.display()),
        Err(e) => warn!("{e}; running with defaults"),
    }
    if let Some(e) = load_error {
        warn!("Could not load config ({e}); running with defaults");
    }
    info!(
        "Window: {}x{} | time scale: {} | bodies: {}",
        config.window.width,
        config.window.height,
        config.simulation.time_scale,
        config.scene.bodies.len()
    );

    match orrery_app::run_with_config(config) {
        Ok(()) => {
            info!("Exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
