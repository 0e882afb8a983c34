//! Vulkan instance creation
//!
//! Loads the Vulkan entry, decides whether validation can actually be
//! enabled, and owns the resulting instance.

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};
use std::ffi::{c_char, CStr, CString};

use super::debug;
use super::error::{VulkanError, VulkanResult};
use crate::core::GraphicsContextConfig;

/// Khronos validation layer
pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Engine name reported in the application info
pub const ENGINE_NAME: &CStr = c"Cellular Threshold Engine";

/// Load the system Vulkan library
pub fn load_entry() -> VulkanResult<Entry> {
    unsafe { Entry::load() }.map_err(|e| VulkanError::Loader(e.to_string()))
}

/// Whether the Khronos validation layer is installed
///
/// An enumeration failure counts as "not installed".
pub fn validation_layer_available(entry: &Entry) -> bool {
    let layers = match unsafe { entry.enumerate_instance_layer_properties() } {
        Ok(layers) => layers,
        Err(e) => {
            log::warn!("Failed to enumerate instance layers: {:?}", e);
            return false;
        }
    };
    let names: Vec<&CStr> = layers
        .iter()
        .map(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) })
        .collect();
    missing_names(&names, &[VALIDATION_LAYER]).is_empty()
}

/// Decide whether validation stays on given the installed layers
///
/// A missing layer downgrades validation instead of failing.
pub(crate) fn resolve_validation(requested: bool, layer_available: bool) -> bool {
    if requested && !layer_available {
        log::warn!(
            "Validation layers requested but not available ({}); continuing without them",
            VALIDATION_LAYER.to_string_lossy()
        );
        return false;
    }
    requested
}

/// Names from `required` that do not appear in `available`
pub(crate) fn missing_names<'a>(available: &[&CStr], required: &[&'a CStr]) -> Vec<&'a CStr> {
    required
        .iter()
        .copied()
        .filter(|name| !available.contains(name))
        .collect()
}

/// Platform-required instance extensions plus debug utils when validating
pub(crate) fn instance_extension_names(platform: &[String], validation: bool) -> VulkanResult<Vec<CString>> {
    let mut extensions = platform
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|_| VulkanError::InvalidName(name.clone())))
        .collect::<VulkanResult<Vec<_>>>()?;

    if validation {
        extensions.push(DebugUtils::name().to_owned());
    }

    Ok(extensions)
}

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    entry: Entry,
    instance: Instance,
}

impl VulkanInstance {
    /// Create an instance exposing `platform_extensions`
    ///
    /// With `validation_enabled` the validation layer and debug utils are
    /// switched on, and a messenger create-info is chained so instance
    /// creation and destruction are reported as well.
    pub fn new(
        entry: Entry,
        config: &GraphicsContextConfig,
        platform_extensions: &[String],
        validation_enabled: bool,
    ) -> VulkanResult<Self> {
        let app_name = CString::new(config.application_name.as_str())
            .map_err(|_| VulkanError::InvalidName(config.application_name.clone()))?;
        let (major, minor, patch) = config.application_version;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_3);

        let extensions = instance_extension_names(platform_extensions, validation_enabled)?;
        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|ext| ext.as_ptr()).collect();

        let layer_ptrs: Vec<*const c_char> = if validation_enabled {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            Vec::new()
        };

        let mut debug_info = debug::messenger_create_info();
        let mut create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);
        if validation_enabled {
            create_info = create_info.push_next(&mut debug_info);
        }

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(VulkanError::api("instance creation"))?;

        log::info!("Vulkan instance created ({} extensions)", extensions.len());
        Ok(Self { entry, instance })
    }

    /// Vulkan entry the instance was created from
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Loaded instance function table
    pub fn raw(&self) -> &Instance {
        &self.instance
    }

    /// Raw instance handle
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            self.instance.destroy_instance(None);
        }
        log::debug!("Vulkan instance destroyed");
    }
}
