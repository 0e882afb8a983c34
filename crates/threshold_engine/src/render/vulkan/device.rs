//! Physical device selection and logical device creation

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device};
use std::collections::BTreeSet;
use std::ffi::{c_char, CStr};

use super::error::{VulkanError, VulkanResult};
use super::instance::{missing_names, VulkanInstance, VALIDATION_LAYER};
use super::surface::PresentationSurface;

/// Device extensions every selected GPU must support
pub fn required_device_extensions() -> [&'static CStr; 1] {
    [SwapchainLoader::name()]
}

/// Queue family indices for different queue types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// Family supporting graphics operations
    pub graphics_family: Option<u32>,
    /// Family able to present to the surface
    pub present_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Walk `families` in order until both a graphics and a present family
    /// are known
    ///
    /// A later matching family replaces an earlier one, so a family that can
    /// do both tends to be picked for both.
    pub fn find<F>(families: &[vk::QueueFamilyProperties], mut supports_present: F) -> VulkanResult<Self>
    where
        F: FnMut(u32) -> VulkanResult<bool>,
    {
        let mut indices = Self::default();

        for (index, family) in (0u32..).zip(families) {
            if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics_family = Some(index);
            }
            if supports_present(index)? {
                indices.present_family = Some(index);
            }
            if indices.is_complete() {
                break;
            }
        }

        Ok(indices)
    }

    /// True iff both families are known
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// Graphics and present family, once both are known
    pub fn resolved(&self) -> Option<(u32, u32)> {
        self.graphics_family.zip(self.present_family)
    }

    /// Distinct family indices, ascending
    pub fn unique_families(&self) -> Vec<u32> {
        [self.graphics_family, self.present_family]
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// First candidate `evaluate` accepts, in enumeration order
///
/// Placeholder policy: no scoring between several capable GPUs.
pub(crate) fn first_suitable<D, T>(candidates: &[D], evaluate: impl FnMut(&D) -> Option<T>) -> VulkanResult<T> {
    if candidates.is_empty() {
        return Err(VulkanError::NoDevices);
    }
    candidates.iter().find_map(evaluate).ok_or(VulkanError::NoSuitableDevice)
}

/// Selected GPU and the queue families it will use
#[derive(Debug, Clone)]
pub struct PhysicalDeviceInfo {
    /// Vulkan physical device handle (owned by the instance)
    pub device: vk::PhysicalDevice,
    /// Human-readable device name
    pub name: String,
    /// Device properties and limits
    pub properties: vk::PhysicalDeviceProperties,
    /// Resolved queue families, complete for every selected device
    pub queue_families: QueueFamilyIndices,
}

impl PhysicalDeviceInfo {
    /// Select the first device that can render and present to `surface`
    pub fn select(instance: &VulkanInstance, surface: &PresentationSurface) -> VulkanResult<Self> {
        let devices = unsafe { instance.raw().enumerate_physical_devices() }
            .map_err(VulkanError::api("physical device enumeration"))?;

        log::info!("Found {} GPU(s)", devices.len());

        let selected = first_suitable(&devices, |&device| {
            match Self::evaluate(instance, surface, device) {
                Ok(info) => info,
                Err(e) => {
                    log::debug!("Skipping device that failed evaluation: {}", e);
                    None
                }
            }
        })?;

        log::info!("Selected GPU: {}", selected.name);
        Ok(selected)
    }

    fn evaluate(
        instance: &VulkanInstance,
        surface: &PresentationSurface,
        device: vk::PhysicalDevice,
    ) -> VulkanResult<Option<Self>> {
        let raw = instance.raw();
        let properties = unsafe { raw.get_physical_device_properties(device) };
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        log::info!("  - {}", name);

        let families = unsafe { raw.get_physical_device_queue_family_properties(device) };
        let queue_families =
            QueueFamilyIndices::find(&families, |index| surface.supports_present(device, index))?;
        if !queue_families.is_complete() {
            log::debug!("{}: missing graphics or present queue family", name);
            return Ok(None);
        }

        let extensions = unsafe { raw.enumerate_device_extension_properties(device) }
            .map_err(VulkanError::api("device extension enumeration"))?;
        let available: Vec<&CStr> = extensions
            .iter()
            .map(|ext| unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) })
            .collect();
        let missing = missing_names(&available, &required_device_extensions());
        if !missing.is_empty() {
            log::debug!("{}: missing device extensions {:?}", name, missing);
            return Ok(None);
        }

        Ok(Some(Self {
            device,
            name,
            properties,
            queue_families,
        }))
    }
}

/// Logical device wrapper with RAII cleanup
pub struct LogicalDevice {
    device: Device,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
}

impl LogicalDevice {
    /// Create a logical device with one queue per unique family
    ///
    /// Validation layers are also requested at device level for
    /// implementations older than Vulkan 1.1.
    pub fn new(
        instance: &VulkanInstance,
        physical_device: &PhysicalDeviceInfo,
        validation_enabled: bool,
    ) -> VulkanResult<Self> {
        let families = physical_device.queue_families;
        let (graphics_family, present_family) = families.resolved().ok_or(VulkanError::NoSuitableDevice)?;

        let priorities = [1.0_f32];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = families
            .unique_families()
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(family)
                    .queue_priorities(&priorities)
                    .build()
            })
            .collect();

        let extension_ptrs: Vec<*const c_char> =
            required_device_extensions().iter().map(|ext| ext.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = if validation_enabled {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            Vec::new()
        };
        let features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&features);

        let device = unsafe { instance.raw().create_device(physical_device.device, &create_info, None) }
            .map_err(VulkanError::api("logical device creation"))?;

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };

        log::info!("Logical device created ({} queue families)", queue_infos.len());
        Ok(Self {
            device,
            graphics_queue,
            present_queue,
        })
    }

    /// Loaded device function table
    pub fn raw(&self) -> &Device {
        &self.device
    }

    /// Graphics operations queue
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Surface presentation queue
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    /// Block until all submitted work has finished
    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.device.device_wait_idle() }.map_err(VulkanError::api("device wait idle"))
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            // Ensure device is idle before destruction
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
        log::debug!("Logical device destroyed");
    }
}
