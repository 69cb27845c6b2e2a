//! Human-readable names for Vulkan result codes.

use ash::vk;

/// Translate a Vulkan result code into a human-readable message.
///
/// Codes outside the table render as `Unknown (<code>)` with the raw value.
pub fn describe_result(result: vk::Result) -> String {
    let message = match result {
        vk::Result::SUCCESS => "Success",
        vk::Result::NOT_READY => "Not ready",
        vk::Result::TIMEOUT => "Timed out",
        vk::Result::INCOMPLETE => "Incomplete",
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => "Out of device memory",
        vk::Result::ERROR_OUT_OF_HOST_MEMORY => "Out of host memory",
        vk::Result::ERROR_INITIALIZATION_FAILED => "Initialization failed",
        vk::Result::ERROR_DEVICE_LOST => "Device lost",
        vk::Result::ERROR_MEMORY_MAP_FAILED => "Memory map failed",
        vk::Result::ERROR_LAYER_NOT_PRESENT => "Layer not present",
        vk::Result::ERROR_EXTENSION_NOT_PRESENT => "Extension not present",
        vk::Result::ERROR_FEATURE_NOT_PRESENT => "Feature not present",
        vk::Result::ERROR_INCOMPATIBLE_DRIVER => "Incompatible driver",
        vk::Result::ERROR_TOO_MANY_OBJECTS => "Too many objects",
        vk::Result::ERROR_FORMAT_NOT_SUPPORTED => "Format not supported",
        vk::Result::ERROR_FRAGMENTED_POOL => "Fragmented pool",
        vk::Result::ERROR_UNKNOWN => "Unknown error",
        vk::Result::ERROR_SURFACE_LOST_KHR => "Surface lost",
        vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR => "Native window in use",
        vk::Result::ERROR_OUT_OF_DATE_KHR => "Out of date",
        vk::Result::PIPELINE_COMPILE_REQUIRED => "Pipeline compile required",
        vk::Result::ERROR_INVALID_SHADER_NV => "Invalid shader",
        vk::Result::ERROR_INVALID_OPAQUE_CAPTURE_ADDRESS => "Invalid device address",
        other => return format!("Unknown ({})", other.as_raw()),
    };
    message.to_string()
}
