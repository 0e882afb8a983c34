//! Core engine implementation
//!
//! The engine owns one [`Window`] and one [`GraphicsContext`]. Acquisition
//! goes window first, then context; release goes the other way.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::EngineConfig;
use crate::render::{GraphicsContext, VulkanError, Window, WindowError};

/// Main engine struct
///
/// The engine coordinates the window and the Vulkan context and drives the
/// main loop.
#[derive(Debug, Default)]
pub struct Engine {
    // Declared before `window` so the context also drops first
    graphics_context: GraphicsContext,
    window: Window,
    frame_limit: Option<u64>,
    running: bool,
    stop_requested: bool,
    initialized: bool,
}

impl Engine {
    /// Create an engine with nothing initialized
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window, then bring up Vulkan on it
    ///
    /// When the graphics context fails the window is closed again, so the
    /// engine is left exactly as before the call.
    pub fn initialize(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }
        config.validate()?;

        log::info!("Initializing Cellular Threshold Engine...");

        if let Err(e) = self.window.initialize(&config.window) {
            log::error!("Failed to initialize window system: {}", e);
            return Err(e.into());
        }

        if let Err(e) = self
            .graphics_context
            .initialize(&config.graphics_config(), &mut self.window)
        {
            log::error!("Failed to initialize Vulkan context: {}", e);
            self.window.shutdown();
            return Err(e.into());
        }

        self.frame_limit = config.frame_limit;
        self.initialized = true;
        log::info!("Engine initialization complete");
        Ok(())
    }

    /// Run the main loop until a close is requested or the engine is stopped
    ///
    /// Returns the number of frames processed. The device is idle when this
    /// returns.
    pub fn run(&mut self) -> Result<u64, EngineError> {
        if !self.initialized {
            log::error!("Engine not initialized. Call initialize() first.");
            return Err(EngineError::NotInitialized);
        }

        log::info!("Starting main loop...");
        self.running = true;

        let mut frames = 0u64;
        while !self.stop_requested && !self.window.should_close() {
            self.tick();
            frames += 1;

            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                log::info!("Frame limit of {} reached", frames);
                self.stop_requested = true;
            }
        }
        self.running = false;
        self.stop_requested = false;

        // Wait for GPU to finish before cleanup
        if let Err(e) = self.graphics_context.wait_idle() {
            log::warn!("Device wait idle failed after main loop: {}", e);
        }

        log::info!("Main loop ended after {} frame(s)", frames);
        Ok(frames)
    }

    /// Process one frame
    fn tick(&mut self) {
        self.window.poll_events();

        if self.window.was_resized() {
            log::debug!(
                "Framebuffer resized to {}x{}",
                self.window.width(),
                self.window.height()
            );
            // TODO: recreate the swapchain here once presentation exists
            self.window.reset_resize_flag();
        }
    }

    /// Stop the main loop before its next frame
    ///
    /// A request made while the loop is not running makes the next `run`
    /// return without processing a frame. The request is consumed by `run`.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Whether a stop was requested and not yet consumed by `run`
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Release the graphics context, then the window
    ///
    /// Does nothing if the engine was never initialized.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        log::info!("Shutting down engine...");
        self.running = false;
        self.stop_requested = false;

        // Reverse order of initialization
        self.graphics_context.shutdown();
        self.window.shutdown();

        self.frame_limit = None;
        self.initialized = false;
        log::info!("Engine shutdown complete");
    }

    /// Whether the main loop is currently executing
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether window and graphics context are both live
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the window
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Get mutable access to the window
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// Get the Vulkan context
    pub fn graphics_context(&self) -> &GraphicsContext {
        &self.graphics_context
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The window could not be created
    #[error("Window initialization failed: {0}")]
    Window(#[from] WindowError),

    /// The Vulkan context could not be created
    #[error("Vulkan context initialization failed: {0}")]
    Graphics(#[from] VulkanError),

    /// The configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `run` was called before a successful `initialize`
    #[error("Engine is not initialized")]
    NotInitialized,

    /// `initialize` was called twice without `shutdown`
    #[error("Engine is already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WindowConfig;
    use crate::render::window::tests::FakeBackend;

    /// Engine whose window is a fake and whose graphics context stays down
    fn headless_engine(frame_limit: Option<u64>) -> Engine {
        let (backend, _platform) = FakeBackend::new(1280, 720);
        let mut engine = Engine::new();
        engine.window.initialize_with_backend(backend).unwrap();
        engine.frame_limit = frame_limit;
        engine.initialized = true;
        engine
    }

    #[test]
    fn test_stop_requested_before_run_skips_all_frames() {
        let mut engine = headless_engine(Some(5));
        engine.request_stop();
        assert!(engine.stop_requested());

        assert_eq!(engine.run().unwrap(), 0);
        assert!(!engine.is_running());
        assert!(!engine.stop_requested());

        // The request was consumed, so the next run goes to the frame limit
        assert_eq!(engine.run().unwrap(), 5);
    }

    #[test]
    fn test_frame_limit_bounds_run() {
        let mut engine = headless_engine(Some(3));
        assert_eq!(engine.run().unwrap(), 3);
        assert!(!engine.stop_requested());
        assert_eq!(engine.run().unwrap(), 3);
    }

    #[test]
    fn test_close_request_on_fake_window_ends_loop() {
        let mut engine = headless_engine(Some(5));
        engine.window_mut().request_close();
        assert_eq!(engine.run().unwrap(), 0);
    }

    #[test]
    fn test_shutdown_clears_pending_stop() {
        let mut engine = headless_engine(None);
        engine.request_stop();
        engine.shutdown();
        assert!(!engine.stop_requested());
        assert!(!engine.window().is_open());
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = Engine::new();
        assert!(!engine.is_initialized());
        assert!(!engine.is_running());
        assert!(!engine.window().is_open());
        assert!(!engine.graphics_context().is_initialized());
    }

    #[test]
    fn test_run_refuses_without_initialize() {
        let mut engine = Engine::new();
        assert!(matches!(engine.run(), Err(EngineError::NotInitialized)));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_shutdown_without_initialize_is_noop() {
        let mut engine = Engine::new();
        engine.shutdown();
        engine.shutdown();
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_invalid_config_rejected_before_window() {
        let mut engine = Engine::new();
        let config = EngineConfig::default().with_window(WindowConfig::new("bad", 0, 720));
        assert!(matches!(engine.initialize(&config), Err(EngineError::Config(_))));
        assert!(!engine.is_initialized());
        assert!(!engine.window().is_open());
    }

    #[test]
    #[ignore = "requires a display and a Vulkan-capable GPU"]
    fn test_end_to_end_initialize_run_shutdown() {
        let config = EngineConfig::default()
            .with_window(WindowConfig::new("Cellular Threshold", 1280, 720).with_resizable(true))
            .with_validation(true)
            .with_frame_limit(3);

        let mut engine = Engine::new();
        engine.initialize(&config).unwrap();
        assert!(engine.is_initialized());
        assert!(matches!(engine.initialize(&config), Err(EngineError::AlreadyInitialized)));

        // Exact only without display scaling
        assert_eq!(engine.window().width(), 1280);
        assert_eq!(engine.window().height(), 720);
        assert!(!engine.window().should_close());

        let context = engine.graphics_context();
        assert!(context.device().is_some());
        assert_ne!(context.graphics_queue(), ash::vk::Queue::null());
        assert_ne!(context.present_queue(), ash::vk::Queue::null());

        assert_eq!(engine.run().unwrap(), 3);
        assert!(!engine.is_running());

        engine.shutdown();
        assert!(!engine.is_initialized());
        assert!(!engine.window().is_open());
        assert!(!engine.graphics_context().is_initialized());
        engine.shutdown();
    }

    #[test]
    #[ignore = "requires a display and a Vulkan-capable GPU"]
    fn test_close_request_ends_loop() {
        let mut engine = Engine::new();
        engine.initialize(&EngineConfig::default().with_validation(false)).unwrap();

        engine.window_mut().request_close();
        assert_eq!(engine.run().unwrap(), 0);
    }
}
