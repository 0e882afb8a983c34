//! Rendering subsystem
//!
//! - **`window`**: native window ownership and resize tracking
//! - **`vulkan`**: the graphics context bound to that window

pub mod vulkan;
pub mod window;

pub use vulkan::{GraphicsContext, QueueFamilyIndices, VulkanError, VulkanResult};
pub use window::{Window, WindowBackend, WindowError, WindowEvent, WindowResult};
