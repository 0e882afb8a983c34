//! Platform window backend contract
//!
//! [`super::Window`] owns exactly one boxed backend while open. The GLFW
//! implementation lives in [`super::glfw_backend`]; tests substitute an
//! in-memory backend.

use ash::vk;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The platform layer failed to initialize
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// The platform layer found no Vulkan loader
    #[error("Vulkan is not supported by GLFW")]
    VulkanUnsupported,

    /// The native window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// The configuration was rejected before touching the platform
    #[error("Invalid window configuration: {0}")]
    InvalidConfig(String),

    /// The window already owns a native handle
    #[error("Window is already initialized")]
    AlreadyInitialized,

    /// The operation needs an open window
    #[error("Window is not initialized")]
    NotInitialized,

    /// Any other platform failure
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Events a backend reports back to the owning window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The framebuffer changed size, in pixels
    FramebufferResized {
        /// New framebuffer width
        width: u32,
        /// New framebuffer height
        height: u32,
    },
    /// The user asked the window to close
    CloseRequested,
}

/// Platform window backend
///
/// Not `Send`: window system calls must stay on the thread that created the
/// window.
pub trait WindowBackend {
    /// Whether a close was requested by the user or the application
    fn should_close(&self) -> bool;

    /// Request or cancel closing the window
    fn set_should_close(&mut self, should_close: bool);

    /// Drain the platform event queue once
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    /// Current framebuffer size in pixels
    fn framebuffer_size(&self) -> (u32, u32);

    /// Vulkan instance extensions the platform needs for surface creation
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Create a presentable surface for this window on `instance`
    ///
    /// The caller owns the returned surface and must destroy it before the
    /// window goes away.
    fn create_vulkan_surface(&mut self, instance: vk::Instance) -> WindowResult<vk::SurfaceKHR>;
}
