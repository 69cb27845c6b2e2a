//! GPU error types.

use crate::result::describe_result;
use ash::vk;
use thiserror::Error;

/// GPU-related errors.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Instance, surface or device bring-up failed.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// A driver enumeration call failed.
    #[error("Enumeration failed: {0}")]
    Enumeration(String),

    /// No queue family supports both graphics and presentation.
    #[error("No queue family supports graphics and presentation")]
    NoSuitableQueueFamily,

    /// The logical device could not be created.
    #[error("Unable to create device: {0}")]
    DeviceCreation(String),

    /// The memory allocator could not be created.
    #[error("Unable to create memory allocator: {0}")]
    AllocatorCreation(String),
}

impl GpuError {
    /// Initialization failure caused by a driver call.
    pub fn initialization(what: &str, result: vk::Result) -> Self {
        Self::Initialization(format!("{what}: {}", describe_result(result)))
    }

    /// Enumeration failure caused by a driver call.
    pub fn enumeration(what: &str, result: vk::Result) -> Self {
        Self::Enumeration(format!("{what}: {}", describe_result(result)))
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
