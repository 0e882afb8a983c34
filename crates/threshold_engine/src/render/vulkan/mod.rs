//! Vulkan backend: instance, diagnostics, surface and device bring-up

pub mod context;
pub mod debug;
pub mod device;
pub mod error;
pub mod instance;
pub mod surface;

pub use context::GraphicsContext;
pub use debug::DebugMessenger;
pub use device::{LogicalDevice, PhysicalDeviceInfo, QueueFamilyIndices};
pub use error::{VulkanError, VulkanResult};
pub use instance::VulkanInstance;
pub use surface::PresentationSurface;
