//! # Core Engine Module
//!
//! Shared configuration types used by the window, the Vulkan context and
//! the engine loop.

pub mod config;

pub use config::{EngineConfig, GraphicsContextConfig, WindowConfig, DEFAULT_APPLICATION_NAME};
