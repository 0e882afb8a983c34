//! # Engine Configuration
//!
//! Settings consumed during engine bootstrap: the window, the Vulkan
//! context, and the main loop. All structs are serde-capable and tolerate
//! partially specified files (missing fields fall back to defaults).

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Name used for the window title and Vulkan application info by default
pub const DEFAULT_APPLICATION_NAME: &str = "Cellular Threshold";

/// # Window Configuration
///
/// Immutable input to window creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Requested width in screen coordinates
    pub width: u32,
    /// Requested height in screen coordinates
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
    /// Cover the primary monitor at its current video mode
    pub fullscreen: bool,
    /// Request vertical sync
    ///
    /// Stored and round-tripped only; nothing reads it until a swapchain
    /// picks its present mode.
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a windowed configuration with the given title and size
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Set whether the window is resizable
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set fullscreen mode
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Set vsync preference
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Window title cannot be empty".to_string());
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window dimensions must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_APPLICATION_NAME.to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// # Graphics Context Configuration
///
/// Application metadata and debug options for Vulkan instance creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsContextConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Request the Khronos validation layer and debug messenger
    pub enable_validation: bool,
}

impl GraphicsContextConfig {
    /// Create a configuration for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Set application version
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Enable or disable validation layers
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.application_name.is_empty() {
            return Err("Application name cannot be empty".to_string());
        }
        if self.application_name.contains('\0') {
            return Err("Application name cannot contain NUL bytes".to_string());
        }
        Ok(())
    }
}

impl Default for GraphicsContextConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            application_version: (0, 1, 0),
            // Validation in debug builds only
            enable_validation: cfg!(debug_assertions),
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration handed to [`crate::Engine::initialize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Whether to enable Vulkan validation layers
    pub enable_validation: bool,
    /// Stop the main loop after this many frames; `None` runs until close
    pub frame_limit: Option<u64>,
}

impl EngineConfig {
    /// Create a configuration for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            window: WindowConfig {
                title: app_name.clone(),
                ..WindowConfig::default()
            },
            application_name: app_name,
            ..Self::default()
        }
    }

    /// Replace the window settings
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Enable or disable validation layers
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = enabled;
        self
    }

    /// Stop the main loop after `frames` frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Settings for the graphics context derived from this configuration
    pub fn graphics_config(&self) -> GraphicsContextConfig {
        GraphicsContextConfig {
            application_name: self.application_name.clone(),
            application_version: self.application_version,
            enable_validation: self.enable_validation,
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate().map_err(ConfigError::Invalid)?;
        self.graphics_config().validate().map_err(ConfigError::Invalid)?;
        if self.frame_limit == Some(0) {
            return Err(ConfigError::Invalid("Frame limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let graphics = GraphicsContextConfig::default();
        Self {
            window: WindowConfig::default(),
            application_name: graphics.application_name,
            application_version: graphics.application_version,
            enable_validation: graphics.enable_validation,
            frame_limit: None,
        }
    }
}

impl Config for EngineConfig {}
