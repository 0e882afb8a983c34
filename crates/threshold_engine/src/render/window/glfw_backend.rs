//! GLFW-based window backend for Vulkan rendering
//!
//! Creates a window without a client API (Vulkan manages its own surface)
//! and reports framebuffer resizes through GLFW's event queue.

use ash::vk;

use super::backend::{WindowBackend, WindowError, WindowEvent, WindowResult};
use crate::core::WindowConfig;

/// GLFW window wrapper with proper resource management
///
/// Dropping the backend destroys the window, then terminates GLFW once the
/// last `Glfw` handle goes away.
pub struct GlfwBackend {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
}

impl GlfwBackend {
    /// Initialize GLFW and open a window described by `config`
    pub fn create(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::log_errors).map_err(|e| {
            log::error!("Failed to initialize GLFW: {:?}", e);
            WindowError::InitializationFailed
        })?;

        if !glfw.vulkan_supported() {
            log::error!("Vulkan is not supported by GLFW");
            return Err(WindowError::VulkanUnsupported);
        }

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let created = if config.fullscreen {
            glfw.with_primary_monitor(|glfw, monitor| {
                let monitor = monitor?;
                let mode = monitor.get_video_mode()?;
                glfw.create_window(
                    mode.width,
                    mode.height,
                    &config.title,
                    glfw::WindowMode::FullScreen(&*monitor),
                )
            })
        } else {
            glfw.create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
        };

        // `glfw` drops here on failure, which terminates the library
        let (mut window, events) = created.ok_or_else(|| {
            log::error!("Failed to create GLFW window");
            WindowError::CreationFailed
        })?;

        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        Ok(Self { window, events, glfw })
    }
}

impl WindowBackend for GlfwBackend {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| match event {
                glfw::WindowEvent::FramebufferSize(width, height) => Some(WindowEvent::FramebufferResized {
                    width: u32::try_from(width).unwrap_or(0),
                    height: u32::try_from(height).unwrap_or(0),
                }),
                glfw::WindowEvent::Close => Some(WindowEvent::CloseRequested),
                _ => None,
            })
            .collect()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (u32::try_from(width).unwrap_or(0), u32::try_from(height).unwrap_or(0))
    }

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or_else(|| WindowError::GlfwError("Failed to get required extensions".to_string()))
    }

    fn create_vulkan_surface(&mut self, instance: vk::Instance) -> WindowResult<vk::SurfaceKHR> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self.window.create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(WindowError::GlfwError(format!("Failed to create Vulkan surface: {:?}", result)))
        }
    }
}
