//! Vulkan context management
//!
//! [`GraphicsContext`] owns the instance, the optional debug messenger, the
//! window surface, the selected GPU and the logical device with its queues.
//! Every resource is a RAII wrapper, and they live together in
//! `ContextCore`, whose field order is the release order:
//!
//! ```text
//! create:  instance -> messenger -> surface -> physical device -> device
//! release: device -> messenger -> surface -> instance
//! ```
//!
//! A failing initialization step returns early; the wrappers already built
//! are dropped as locals in reverse declaration order, so nothing leaks and
//! the context stays uninitialized.

use ash::{vk, Device, Entry, Instance};

use super::debug::DebugMessenger;
use super::device::{LogicalDevice, PhysicalDeviceInfo, QueueFamilyIndices};
use super::error::{VulkanError, VulkanResult};
use super::instance::{self, VulkanInstance};
use super::surface::PresentationSurface;
use crate::core::GraphicsContextConfig;
use crate::render::window::Window;

/// Live Vulkan resources
///
/// Fields drop top to bottom.
struct ContextCore {
    device: LogicalDevice,
    debug_messenger: Option<DebugMessenger>,
    surface: PresentationSurface,
    physical_device: PhysicalDeviceInfo,
    instance: VulkanInstance,
    validation_enabled: bool,
}

impl ContextCore {
    fn create(config: &GraphicsContextConfig, window: &mut Window) -> VulkanResult<Self> {
        // Step 1: instance
        let entry = instance::load_entry()?;
        let validation_enabled = instance::resolve_validation(
            config.enable_validation,
            config.enable_validation && instance::validation_layer_available(&entry),
        );
        let platform_extensions = window.required_instance_extensions()?;
        let instance = VulkanInstance::new(entry, config, &platform_extensions, validation_enabled)?;

        // Step 2: diagnostics, never fatal
        let debug_messenger = if validation_enabled {
            optional_messenger(DebugMessenger::new(&instance))
        } else {
            None
        };

        // Step 3: surface
        let surface = PresentationSurface::new(&instance, window)?;

        // Step 4: physical device
        let physical_device = PhysicalDeviceInfo::select(&instance, &surface)?;

        // Step 5: logical device and queues
        let device = LogicalDevice::new(&instance, &physical_device, validation_enabled)?;

        Ok(Self {
            device,
            debug_messenger,
            surface,
            physical_device,
            instance,
            validation_enabled,
        })
    }
}

/// Keep a messenger that was created; log and drop the failure otherwise
fn optional_messenger<T>(result: VulkanResult<T>) -> Option<T> {
    match result {
        Ok(messenger) => Some(messenger),
        Err(e) => {
            log::warn!("Failed to set up debug messenger: {}", e);
            None
        }
    }
}

/// Main Vulkan context that owns all core Vulkan resources
///
/// The surface belongs to the window passed to [`GraphicsContext::initialize`];
/// shut the context down before that window.
#[derive(Default)]
pub struct GraphicsContext {
    core: Option<ContextCore>,
}

impl GraphicsContext {
    /// Create an uninitialized context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every Vulkan resource for `window`
    ///
    /// Missing validation support and a failed debug messenger are logged
    /// and skipped. Any other failure releases what was created and leaves
    /// the context uninitialized.
    pub fn initialize(&mut self, config: &GraphicsContextConfig, window: &mut Window) -> VulkanResult<()> {
        if self.core.is_some() {
            return Err(VulkanError::AlreadyInitialized);
        }

        log::info!("Initializing Vulkan context...");
        let core = ContextCore::create(config, window)?;
        self.core = Some(core);
        log::info!("Vulkan context initialized successfully");
        Ok(())
    }

    /// Release device, messenger, surface and instance, in that order
    ///
    /// Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(core) = self.core.take() {
            drop(core);
            log::info!("Vulkan context shut down");
        }
    }

    /// Block until the device has finished all submitted work
    ///
    /// Does nothing when no device exists.
    pub fn wait_idle(&self) -> VulkanResult<()> {
        match &self.core {
            Some(core) => core.device.wait_idle(),
            None => Ok(()),
        }
    }

    /// Whether all resources are live
    pub fn is_initialized(&self) -> bool {
        self.core.is_some()
    }

    /// Vulkan entry, if initialized
    pub fn entry(&self) -> Option<&Entry> {
        self.core.as_ref().map(|core| core.instance.entry())
    }

    /// Vulkan instance, if initialized
    pub fn instance(&self) -> Option<&Instance> {
        self.core.as_ref().map(|core| core.instance.raw())
    }

    /// Selected GPU, or a null handle
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.core
            .as_ref()
            .map_or_else(vk::PhysicalDevice::null, |core| core.physical_device.device)
    }

    /// Name of the selected GPU
    pub fn device_name(&self) -> Option<&str> {
        self.core.as_ref().map(|core| core.physical_device.name.as_str())
    }

    /// Logical device, if initialized
    pub fn device(&self) -> Option<&Device> {
        self.core.as_ref().map(|core| core.device.raw())
    }

    /// Window surface, or a null handle
    pub fn surface(&self) -> vk::SurfaceKHR {
        self.core
            .as_ref()
            .map_or_else(vk::SurfaceKHR::null, |core| core.surface.handle())
    }

    /// Debug messenger, or a null handle when diagnostics are off
    pub fn debug_messenger(&self) -> vk::DebugUtilsMessengerEXT {
        self.core
            .as_ref()
            .and_then(|core| core.debug_messenger.as_ref())
            .map_or_else(vk::DebugUtilsMessengerEXT::null, DebugMessenger::handle)
    }

    /// Graphics queue, or a null handle
    pub fn graphics_queue(&self) -> vk::Queue {
        self.core
            .as_ref()
            .map_or_else(vk::Queue::null, |core| core.device.graphics_queue())
    }

    /// Present queue, or a null handle
    pub fn present_queue(&self) -> vk::Queue {
        self.core
            .as_ref()
            .map_or_else(vk::Queue::null, |core| core.device.present_queue())
    }

    /// Queue families of the selected GPU
    pub fn queue_family_indices(&self) -> QueueFamilyIndices {
        self.core
            .as_ref()
            .map(|core| core.physical_device.queue_families)
            .unwrap_or_default()
    }

    /// Whether validation layers ended up enabled
    pub fn validation_enabled(&self) -> bool {
        self.core.as_ref().is_some_and(|core| core.validation_enabled)
    }
}

impl std::fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("initialized", &self.is_initialized())
            .field("device_name", &self.device_name())
            .field("queue_family_indices", &self.queue_family_indices())
            .field("validation_enabled", &self.validation_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WindowConfig;
    use crate::render::window::tests::FakeBackend;

    fn assert_released(context: &GraphicsContext) {
        assert!(!context.is_initialized());
        assert!(context.entry().is_none());
        assert!(context.instance().is_none());
        assert!(context.device().is_none());
        assert!(context.device_name().is_none());
        assert_eq!(context.physical_device(), vk::PhysicalDevice::null());
        assert_eq!(context.surface(), vk::SurfaceKHR::null());
        assert_eq!(context.debug_messenger(), vk::DebugUtilsMessengerEXT::null());
        assert_eq!(context.graphics_queue(), vk::Queue::null());
        assert_eq!(context.present_queue(), vk::Queue::null());
        assert_eq!(context.queue_family_indices(), QueueFamilyIndices::default());
        assert!(!context.validation_enabled());
    }

    #[test]
    fn test_new_context_holds_no_handles() {
        assert_released(&GraphicsContext::new());
    }

    #[test]
    fn test_shutdown_without_initialize_is_noop() {
        let mut context = GraphicsContext::new();
        context.shutdown();
        context.shutdown();
        assert_released(&context);
    }

    #[test]
    fn test_wait_idle_without_device() {
        assert!(GraphicsContext::new().wait_idle().is_ok());
    }

    #[test]
    fn test_missing_debug_utils_does_not_abort_setup() {
        let messenger: Option<u64> = optional_messenger(Err(VulkanError::DebugUtilsUnavailable));
        assert!(messenger.is_none());

        let messenger = optional_messenger(Err(VulkanError::Api {
            operation: "debug messenger creation",
            result: vk::Result::ERROR_OUT_OF_HOST_MEMORY,
        }));
        assert_eq!(messenger, None::<u64>);

        assert_eq!(optional_messenger::<u64>(Ok(7)), Some(7));
    }

    #[test]
    fn test_initialize_without_window_fails_cleanly() {
        // Fails at the loader or at the extension query, depending on the host
        let mut window = Window::new();
        let mut context = GraphicsContext::new();
        let config = GraphicsContextConfig::new("test").with_validation(false);

        assert!(context.initialize(&config, &mut window).is_err());
        assert_released(&context);
    }

    #[test]
    fn test_failed_surface_creation_releases_everything() {
        let (backend, platform) = FakeBackend::new(1280, 720);
        platform.borrow_mut().surface_result = Some(vk::Result::ERROR_INITIALIZATION_FAILED);
        let mut window = Window::new();
        window.initialize_with_backend(backend).unwrap();

        let mut context = GraphicsContext::new();
        let config = GraphicsContextConfig::new("test").with_validation(false);
        assert!(context.initialize(&config, &mut window).is_err());
        assert_released(&context);

        // The window is untouched by the failed attempt
        assert!(window.is_open());
    }

    #[test]
    #[ignore = "requires a display and a Vulkan-capable GPU"]
    fn test_initialize_then_shutdown_restores_fresh_state() {
        let mut window = Window::new();
        window.initialize(&WindowConfig::default()).unwrap();

        let mut context = GraphicsContext::new();
        let config = GraphicsContextConfig::new("test").with_validation(true);
        context.initialize(&config, &mut window).unwrap();

        assert!(context.device().is_some());
        assert_ne!(context.graphics_queue(), vk::Queue::null());
        assert_ne!(context.present_queue(), vk::Queue::null());
        assert!(context.queue_family_indices().is_complete());
        assert!(matches!(
            context.initialize(&config, &mut window),
            Err(VulkanError::AlreadyInitialized)
        ));

        assert!(context.wait_idle().is_ok());
        context.shutdown();
        assert_released(&context);
        context.shutdown();
        assert_released(&context);

        window.shutdown();
    }
}
