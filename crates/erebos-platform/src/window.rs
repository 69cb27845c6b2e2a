//! Native window and event loop.

use std::sync::Arc;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use tracing::info;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::{PlatformConfig, PlatformError, Result};

/// A native window together with the event loop that drives it.
pub struct Window {
    event_loop: EventLoop<()>,
    window: Arc<winit::window::Window>,
}

impl Window {
    /// Open a window with the given title and default settings.
    pub fn new(title: impl Into<String>) -> Result<Self> {
        Self::with_config(PlatformConfig::new(title))
    }

    /// Open a window described by `config`.
    pub fn with_config(config: PlatformConfig) -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        let attributes = winit::window::Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        // The GPU context needs the window before the loop starts running
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        info!(
            "Window '{}' created ({}x{})",
            config.title, config.width, config.height
        );

        Ok(Self {
            event_loop,
            window: Arc::new(window),
        })
    }

    /// The underlying winit window.
    pub fn handle(&self) -> &Arc<winit::window::Window> {
        &self.window
    }

    /// Run the event loop until the window is closed.
    pub fn run_loop(self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Wait);

        let mut handler = LoopHandler {
            window: self.window,
        };
        self.event_loop
            .run_app(&mut handler)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))
    }
}

impl HasDisplayHandle for Window {
    fn display_handle(&self) -> std::result::Result<DisplayHandle<'_>, HandleError> {
        self.window.display_handle()
    }
}

impl HasWindowHandle for Window {
    fn window_handle(&self) -> std::result::Result<WindowHandle<'_>, HandleError> {
        self.window.window_handle()
    }
}

struct LoopHandler {
    window: Arc<winit::window::Window>,
}

impl ApplicationHandler for LoopHandler {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        self.window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if id != self.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                tracing::debug!("Resized to {}x{}", size.width, size.height);
            }
            _ => {}
        }
    }
}
