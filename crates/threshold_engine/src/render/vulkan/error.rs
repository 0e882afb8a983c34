//! Vulkan-specific error types

use ash::vk;
use thiserror::Error;

use crate::render::window::WindowError;

/// Vulkan context errors
#[derive(Error, Debug)]
pub enum VulkanError {
    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loader(String),

    /// A Vulkan call returned an error code
    #[error("Vulkan API error during {operation}: {result:?}")]
    Api {
        /// What the context was doing when the call failed
        operation: &'static str,
        /// Result code returned by the driver
        result: vk::Result,
    },

    /// A name passed to Vulkan contained an interior NUL byte
    #[error("Invalid name {0:?}: contains a NUL byte")]
    InvalidName(String),

    /// The window could not provide extensions or a surface
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Enumeration found no Vulkan-capable device at all
    #[error("Failed to find GPUs with Vulkan support")]
    NoDevices,

    /// Devices exist but none can render and present to the surface
    #[error("Failed to find a suitable GPU")]
    NoSuitableDevice,

    /// `vkCreateDebugUtilsMessengerEXT` is not exposed by the driver
    #[error("Debug utils messenger functions are not available")]
    DebugUtilsUnavailable,

    /// `initialize` was called on a live context
    #[error("Graphics context is already initialized")]
    AlreadyInitialized,
}

impl VulkanError {
    /// Build a mapper for `map_err` that tags a `vk::Result` with `operation`
    pub(crate) fn api(operation: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |result| Self::Api { operation, result }
    }
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;
