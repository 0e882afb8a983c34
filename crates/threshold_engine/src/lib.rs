//! # Threshold Engine
//!
//! Bootstrap layer of the Cellular Threshold game: a GLFW window, a Vulkan
//! context bound to it, and an (as yet empty) main loop.
//!
//! ## Features
//!
//! - **Window management**: GLFW window with framebuffer resize tracking
//! - **Vulkan bring-up**: instance, optional validation, surface, GPU
//!   selection, logical device and queues
//! - **Ordered teardown**: every Vulkan object is a RAII wrapper released in
//!   reverse creation order
//! - **Configuration**: serde-backed settings loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threshold_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     threshold_engine::foundation::logging::init();
//!
//!     let mut engine = Engine::new();
//!     engine.initialize(&EngineConfig::default())?;
//!     engine.run()?;
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::{EngineConfig, GraphicsContextConfig, WindowConfig},
        render::{GraphicsContext, QueueFamilyIndices, VulkanError, Window, WindowError},
        Engine, EngineError,
    };
}
