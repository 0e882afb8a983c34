//! Cellular Threshold entry point
//!
//! Opens the game window, brings up Vulkan and runs the main loop until the
//! window is closed.

use std::process::ExitCode;

use threshold_engine::config::Config;
use threshold_engine::core::{EngineConfig, WindowConfig, DEFAULT_APPLICATION_NAME};
use threshold_engine::foundation::logging;
use threshold_engine::Engine;

/// Names a TOML or RON file that replaces the built-in configuration
const CONFIG_ENV_VAR: &str = "CELLULAR_THRESHOLD_CONFIG";

fn default_config() -> EngineConfig {
    EngineConfig::new(DEFAULT_APPLICATION_NAME)
        .with_window(WindowConfig::new(DEFAULT_APPLICATION_NAME, 1280, 720).with_resizable(true))
        .with_validation(cfg!(debug_assertions))
}

fn load_config() -> EngineConfig {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return default_config();
    };

    match EngineConfig::load_from_file(&path) {
        Ok(config) => {
            log::info!("Loaded configuration from {}", path);
            config
        }
        Err(e) => {
            log::warn!("Ignoring configuration file {}: {}", path, e);
            default_config()
        }
    }
}

fn main() -> ExitCode {
    logging::init_with_level(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    log::info!("Starting {}", DEFAULT_APPLICATION_NAME);

    let config = load_config();
    let mut engine = Engine::new();

    if let Err(e) = engine.initialize(&config) {
        log::error!("Failed to initialize engine: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!("Initialization successful. Running main loop...");

    if let Err(e) = engine.run() {
        log::error!("Main loop failed: {}", e);
    }

    engine.shutdown();
    ExitCode::SUCCESS
}
