//! Window management subsystem
//!
//! [`Window`] owns the native window through a [`WindowBackend`] and tracks
//! the framebuffer size plus a one-shot resize flag. The flag is raised while
//! [`Window::poll_events`] drains the platform queue and stays raised until
//! the owner calls [`Window::reset_resize_flag`].
//!
//! Resize state lives inside `Window` itself, so moving a window (or taking
//! it with `std::mem::take`) carries the state along and later resize events
//! reach the new owner.

pub mod backend;
pub mod glfw_backend;

pub use backend::{WindowBackend, WindowError, WindowEvent, WindowResult};
pub use glfw_backend::GlfwBackend;

use ash::vk;

use crate::core::WindowConfig;

/// Application window
#[derive(Default)]
pub struct Window {
    backend: Option<Box<dyn WindowBackend>>,
    width: u32,
    height: u32,
    framebuffer_resized: bool,
}

impl Window {
    /// Create an uninitialized window
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a GLFW window described by `config`
    ///
    /// On failure the window stays uninitialized and GLFW is torn down.
    pub fn initialize(&mut self, config: &WindowConfig) -> WindowResult<()> {
        self.ensure_closed()?;
        config.validate().map_err(WindowError::InvalidConfig)?;

        let backend = GlfwBackend::create(config)?;
        self.attach(Box::new(backend));

        log::info!("Window created: {} ({}x{})", config.title, self.width, self.height);
        Ok(())
    }

    /// Adopt an already created backend
    ///
    /// Used for platforms other than GLFW and for tests.
    pub fn initialize_with_backend(&mut self, backend: Box<dyn WindowBackend>) -> WindowResult<()> {
        self.ensure_closed()?;
        self.attach(backend);
        Ok(())
    }

    fn ensure_closed(&self) -> WindowResult<()> {
        if self.backend.is_some() {
            return Err(WindowError::AlreadyInitialized);
        }
        Ok(())
    }

    fn attach(&mut self, backend: Box<dyn WindowBackend>) {
        // The framebuffer may be larger than the requested size on high-DPI displays
        let (width, height) = backend.framebuffer_size();
        self.width = width;
        self.height = height;
        self.framebuffer_resized = false;
        self.backend = Some(backend);
    }

    /// Destroy the native window and reset all state
    ///
    /// Safe to call on a window that is already shut down.
    pub fn shutdown(&mut self) {
        if self.backend.take().is_some() {
            log::debug!("Window destroyed");
        }
        self.width = 0;
        self.height = 0;
        self.framebuffer_resized = false;
    }

    /// Whether a native window currently exists
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// True iff the window is open and a close was requested
    pub fn should_close(&self) -> bool {
        self.backend.as_ref().is_some_and(|backend| backend.should_close())
    }

    /// Ask the window to close at the end of the current frame
    pub fn request_close(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.set_should_close(true);
        }
    }

    /// Drain pending window events once
    pub fn poll_events(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        for event in backend.poll_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::FramebufferResized { width, height } => {
                self.framebuffer_resized = true;
                self.width = width;
                self.height = height;
            }
            WindowEvent::CloseRequested => log::debug!("Window close requested"),
        }
    }

    /// Current framebuffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current framebuffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the framebuffer was resized since the flag was last reset
    pub fn was_resized(&self) -> bool {
        self.framebuffer_resized
    }

    /// Clear the resize flag (call after handling a resize)
    pub fn reset_resize_flag(&mut self) {
        self.framebuffer_resized = false;
    }

    /// Vulkan instance extensions needed to present to this window
    pub fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.backend
            .as_ref()
            .ok_or(WindowError::NotInitialized)?
            .required_instance_extensions()
    }

    /// Create a Vulkan surface bound to this window
    pub fn create_vulkan_surface(&mut self, instance: vk::Instance) -> WindowResult<vk::SurfaceKHR> {
        self.backend
            .as_mut()
            .ok_or(WindowError::NotInitialized)?
            .create_vulkan_surface(instance)
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("open", &self.is_open())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("framebuffer_resized", &self.framebuffer_resized)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ash::vk::Handle;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Shared state of a [`FakeBackend`], kept by the test after the
    /// backend moves into a window
    #[derive(Default)]
    pub(crate) struct FakePlatform {
        pub pending: VecDeque<WindowEvent>,
        pub should_close: bool,
        pub framebuffer: (u32, u32),
        pub extensions: Vec<String>,
        pub surface_result: Option<vk::Result>,
        pub dropped: bool,
    }

    pub(crate) struct FakeBackend {
        pub platform: Rc<RefCell<FakePlatform>>,
    }

    impl FakeBackend {
        pub(crate) fn new(width: u32, height: u32) -> (Box<Self>, Rc<RefCell<FakePlatform>>) {
            let platform = Rc::new(RefCell::new(FakePlatform {
                framebuffer: (width, height),
                extensions: vec!["VK_KHR_surface".to_string()],
                ..FakePlatform::default()
            }));
            (Box::new(Self { platform: Rc::clone(&platform) }), platform)
        }
    }

    impl Drop for FakeBackend {
        fn drop(&mut self) {
            self.platform.borrow_mut().dropped = true;
        }
    }

    impl WindowBackend for FakeBackend {
        fn should_close(&self) -> bool {
            self.platform.borrow().should_close
        }

        fn set_should_close(&mut self, should_close: bool) {
            self.platform.borrow_mut().should_close = should_close;
        }

        fn poll_events(&mut self) -> Vec<WindowEvent> {
            self.platform.borrow_mut().pending.drain(..).collect()
        }

        fn framebuffer_size(&self) -> (u32, u32) {
            self.platform.borrow().framebuffer
        }

        fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
            Ok(self.platform.borrow().extensions.clone())
        }

        fn create_vulkan_surface(&mut self, _instance: vk::Instance) -> WindowResult<vk::SurfaceKHR> {
            match self.platform.borrow().surface_result {
                None | Some(vk::Result::SUCCESS) => Ok(vk::SurfaceKHR::from_raw(1)),
                Some(err) => Err(WindowError::GlfwError(format!("{err:?}"))),
            }
        }
    }

    fn resize(platform: &Rc<RefCell<FakePlatform>>, width: u32, height: u32) {
        platform
            .borrow_mut()
            .pending
            .push_back(WindowEvent::FramebufferResized { width, height });
    }

    fn open_window(width: u32, height: u32) -> (Window, Rc<RefCell<FakePlatform>>) {
        let (backend, platform) = FakeBackend::new(width, height);
        let mut window = Window::new();
        window.initialize_with_backend(backend).unwrap();
        (window, platform)
    }

    fn assert_pristine(window: &Window) {
        assert!(!window.is_open());
        assert_eq!(window.width(), 0);
        assert_eq!(window.height(), 0);
        assert!(!window.was_resized());
        assert!(!window.should_close());
    }

    #[test]
    fn test_new_window_is_uninitialized() {
        let window = Window::new();
        assert_pristine(&window);
        assert!(matches!(window.required_instance_extensions(), Err(WindowError::NotInitialized)));
    }

    #[test]
    fn test_initialize_records_framebuffer_size() {
        // Framebuffer larger than the logical size, as under display scaling
        let (window, _platform) = open_window(2560, 1440);
        assert!(window.is_open());
        assert_eq!((window.width(), window.height()), (2560, 1440));
        assert!(!window.was_resized());
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let (mut window, _platform) = open_window(1280, 720);
        let (second, second_platform) = FakeBackend::new(640, 480);
        assert!(matches!(
            window.initialize_with_backend(second),
            Err(WindowError::AlreadyInitialized)
        ));
        // The rejected backend was dropped, the original kept
        assert!(second_platform.borrow().dropped);
        assert_eq!(window.width(), 1280);
    }

    #[test]
    fn test_invalid_config_rejected_before_platform() {
        let mut window = Window::new();
        let config = WindowConfig::new("zero", 0, 0);
        assert!(matches!(window.initialize(&config), Err(WindowError::InvalidConfig(_))));
        assert_pristine(&window);
    }

    #[test]
    fn test_shutdown_resets_state_and_is_idempotent() {
        let (mut window, platform) = open_window(1280, 720);
        resize(&platform, 800, 600);
        window.poll_events();

        window.shutdown();
        assert!(platform.borrow().dropped);
        assert_pristine(&window);

        window.shutdown();
        assert_pristine(&window);
    }

    #[test]
    fn test_resize_flag_is_one_shot() {
        let (mut window, platform) = open_window(1280, 720);

        window.poll_events();
        assert!(!window.was_resized());

        resize(&platform, 1920, 1080);
        window.poll_events();
        assert!(window.was_resized());
        assert_eq!((window.width(), window.height()), (1920, 1080));

        // Without a reset the flag keeps reporting on later frames
        window.poll_events();
        assert!(window.was_resized());

        window.reset_resize_flag();
        window.poll_events();
        assert!(!window.was_resized());
        assert_eq!(window.width(), 1920);
    }

    #[test]
    fn test_should_close_follows_platform() {
        let (mut window, platform) = open_window(1280, 720);
        assert!(!window.should_close());

        platform.borrow_mut().should_close = true;
        assert!(window.should_close());

        platform.borrow_mut().should_close = false;
        window.request_close();
        assert!(window.should_close());
    }

    #[test]
    fn test_move_preserves_resize_state() {
        let (mut window, platform) = open_window(1280, 720);
        resize(&platform, 1024, 768);
        window.poll_events();

        let moved = Box::new(window);
        assert!(moved.was_resized());
        assert_eq!((moved.width(), moved.height()), (1024, 768));
    }

    #[test]
    fn test_resize_after_move_reaches_new_owner() {
        let (mut source, platform) = open_window(1280, 720);
        let mut target = std::mem::take(&mut source);

        resize(&platform, 300, 200);
        source.poll_events();
        target.poll_events();

        assert_pristine(&source);
        assert!(target.was_resized());
        assert_eq!((target.width(), target.height()), (300, 200));
        assert!(!platform.borrow().dropped);
    }

    #[test]
    fn test_surface_creation_delegates_to_backend() {
        let (mut window, platform) = open_window(1280, 720);
        assert!(window.create_vulkan_surface(vk::Instance::null()).is_ok());

        platform.borrow_mut().surface_result = Some(vk::Result::ERROR_INITIALIZATION_FAILED);
        assert!(window.create_vulkan_surface(vk::Instance::null()).is_err());

        window.shutdown();
        assert!(matches!(
            window.create_vulkan_surface(vk::Instance::null()),
            Err(WindowError::NotInitialized)
        ));
    }

    #[test]
    fn test_required_extensions_from_backend() {
        let (window, _platform) = open_window(1280, 720);
        assert_eq!(window.required_instance_extensions().unwrap(), vec!["VK_KHR_surface".to_string()]);
    }
}
