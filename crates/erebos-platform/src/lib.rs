//! Platform abstraction for the Erebos engine.
//!
//! Provides window creation and the blocking event loop via winit.

mod window;

pub use window::Window;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Erebos Engine".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl PlatformConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Allow or forbid resizing.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = PlatformConfig::new("Editor").with_size(800, 600).with_resizable(false);
        assert_eq!(config.title, "Editor");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.resizable);
    }

    #[test]
    fn default_config_is_resizable() {
        let config = PlatformConfig::default();
        assert!(config.resizable);
        assert!(config.width > 0 && config.height > 0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            PlatformError::WindowCreation("no display".to_string()).to_string(),
            "Window creation failed: no display"
        );
    }
}
