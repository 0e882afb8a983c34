//! Vulkan surface management
//!
//! Wraps the presentable surface the window creates for an instance.

use ash::{extensions::khr, vk};

use super::error::{VulkanError, VulkanResult};
use super::instance::VulkanInstance;
use crate::render::window::Window;

/// Vulkan surface wrapper for presentation
pub struct PresentationSurface {
    surface_loader: khr::Surface,
    surface: vk::SurfaceKHR,
}

impl PresentationSurface {
    /// Ask `window` for a surface bound to `instance`
    pub fn new(instance: &VulkanInstance, window: &mut Window) -> VulkanResult<Self> {
        let surface_loader = khr::Surface::new(instance.entry(), instance.raw());
        let surface = window.create_vulkan_surface(instance.handle())?;

        log::info!("Window surface created");
        Ok(Self { surface_loader, surface })
    }

    /// Get the underlying surface handle
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Check if a queue family supports presentation to this surface
    pub fn supports_present(&self, physical_device: vk::PhysicalDevice, queue_family_index: u32) -> VulkanResult<bool> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_support(physical_device, queue_family_index, self.surface)
                .map_err(VulkanError::api("surface support query"))
        }
    }
}

impl Drop for PresentationSurface {
    fn drop(&mut self) {
        unsafe {
            self.surface_loader.destroy_surface(self.surface, None);
        }
        log::debug!("Window surface destroyed");
    }
}
