//! Window surface binding and surface-format negotiation.

use crate::error::{GpuError, Result};
use crate::handle::Destroy;
use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// Pixel formats the engine's color pipeline accepts for presentation.
pub const ACCEPTED_SURFACE_FORMATS: [vk::Format; 6] = [
    vk::Format::B8G8R8A8_SRGB,
    vk::Format::R8G8B8A8_SRGB,
    vk::Format::A8B8G8R8_SRGB_PACK32,
    vk::Format::B8G8R8A8_UNORM,
    vk::Format::R8G8B8A8_UNORM,
    vk::Format::A8B8G8R8_UNORM_PACK32,
];

/// A presentation surface bound to a window.
pub struct Surface {
    loader: ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
}

impl Surface {
    /// Bind a surface to `window`.
    ///
    /// # Safety
    /// The instance must have been created with the extensions required by the
    /// window's display, and the window must outlive the surface.
    pub unsafe fn new<W>(entry: &ash::Entry, instance: &ash::Instance, window: &W) -> Result<Self>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        let display = window
            .display_handle()
            .map_err(|e| GpuError::Initialization(format!("Failed to get display handle: {e}")))?;
        let window_handle = window
            .window_handle()
            .map_err(|e| GpuError::Initialization(format!("Failed to get window handle: {e}")))?;

        // SAFETY: Caller guarantees the instance and window are valid
        let surface = unsafe {
            ash_window::create_surface(
                entry,
                instance,
                display.as_raw(),
                window_handle.as_raw(),
                None,
            )
        }
        .map_err(|e| GpuError::initialization("Unable to create window surface", e))?;

        Ok(Self {
            loader: ash::khr::surface::Instance::new(entry, instance),
            surface,
        })
    }

    /// The raw surface handle.
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Whether `queue_family` of `physical_device` can present to this surface.
    pub fn supports_presentation(
        &self,
        physical_device: vk::PhysicalDevice,
        queue_family: u32,
    ) -> Result<bool> {
        // SAFETY: The physical device comes from the instance that owns this surface
        unsafe {
            self.loader.get_physical_device_surface_support(
                physical_device,
                queue_family,
                self.surface,
            )
        }
        .map_err(|e| GpuError::enumeration("Unable to query presentation support", e))
    }

    /// All (format, color space) pairs `physical_device` supports for this surface.
    pub fn formats(&self, physical_device: vk::PhysicalDevice) -> Result<Vec<vk::SurfaceFormatKHR>> {
        // SAFETY: The physical device comes from the instance that owns this surface
        unsafe {
            self.loader
                .get_physical_device_surface_formats(physical_device, self.surface)
        }
        .map_err(|e| GpuError::enumeration("Unable to get surface formats", e))
    }
}

impl Destroy for Surface {
    unsafe fn destroy(self) {
        tracing::debug!("Destroying window surface");
        // SAFETY: Caller guarantees no swapchain still uses the surface
        unsafe { self.loader.destroy_surface(self.surface, None) };
    }
}

/// Whether the engine can present with `format`.
pub fn is_accepted_format(format: vk::Format) -> bool {
    ACCEPTED_SURFACE_FORMATS.contains(&format)
}

/// Keep only the accepted formats, in the order the driver reported them.
pub fn acceptable_surface_formats(available: &[vk::SurfaceFormatKHR]) -> Vec<vk::SurfaceFormatKHR> {
    available
        .iter()
        .filter(|f| is_accepted_format(f.format))
        .copied()
        .collect()
}

/// The first accepted format in driver order, if any.
pub fn preferred_surface_format(available: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    available
        .iter()
        .find(|f| is_accepted_format(f.format))
        .copied()
}
