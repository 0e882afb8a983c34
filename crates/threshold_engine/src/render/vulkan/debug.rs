//! Validation-layer message routing
//!
//! The messenger entry points belong to an extension, so they are resolved
//! at runtime. A driver that lacks them is not an error for the context;
//! it just runs without diagnostics.

use ash::extensions::ext::DebugUtils;
use ash::vk;
use std::ffi::{c_void, CStr};

use super::error::{VulkanError, VulkanResult};
use super::instance::VulkanInstance;

const CREATE_MESSENGER_FN: &CStr = c"vkCreateDebugUtilsMessengerEXT";

/// Create-info shared by the messenger and instance creation
pub(crate) fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
        .build()
}

/// Log level a validation message is reported at
pub(crate) fn severity_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::Level::Error
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        log::Level::Warn
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        log::Level::Info
    } else {
        log::Level::Debug
    }
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    log::log!(severity_level(message_severity), "[Vulkan] {:?} - {}", message_type, message);

    vk::FALSE
}

/// Debug utils messenger with RAII cleanup
pub struct DebugMessenger {
    loader: DebugUtils,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    /// Register the validation callback on `instance`
    ///
    /// Returns [`VulkanError::DebugUtilsUnavailable`] when the driver does not
    /// expose the messenger functions.
    pub fn new(instance: &VulkanInstance) -> VulkanResult<Self> {
        let create_fn = unsafe {
            instance
                .entry()
                .get_instance_proc_addr(instance.handle(), CREATE_MESSENGER_FN.as_ptr())
        };
        if create_fn.is_none() {
            return Err(VulkanError::DebugUtilsUnavailable);
        }

        let loader = DebugUtils::new(instance.entry(), instance.raw());
        let create_info = messenger_create_info();
        let messenger = unsafe { loader.create_debug_utils_messenger(&create_info, None) }
            .map_err(VulkanError::api("debug messenger creation"))?;

        log::info!("Debug messenger created");
        Ok(Self { loader, messenger })
    }

    /// Raw messenger handle
    pub fn handle(&self) -> vk::DebugUtilsMessengerEXT {
        self.messenger
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_debug_utils_messenger(self.messenger, None);
        }
        log::debug!("Debug messenger destroyed");
    }
}
