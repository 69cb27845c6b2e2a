//! Vulkan context: the instance and the window surface bound to it.

use crate::error::{GpuError, Result};
use crate::handle::{Destroy, Owned};
use crate::instance::{create_instance, DebugMessenger};
use crate::surface::Surface;
use erebos_platform::Window;
use raw_window_handle::HasDisplayHandle;
use std::ops::Deref;
use std::sync::Arc;

/// The root of the GPU ownership graph.
///
/// Owns the Vulkan instance and the surface of the window it was created
/// for. Every [`Device`](crate::Device) borrows its context, so the
/// instance always outlives the devices created from it.
pub struct VulkanContext {
    handles: ContextHandles<Surface, DebugMessenger, ash::Instance>,
    // The loader library must stay loaded until the instance is gone
    entry: ash::Entry,
    window: Arc<winit::window::Window>,
}

impl VulkanContext {
    /// Create a context for `window` with default settings.
    pub fn new(window: &Window) -> Result<Self> {
        ContextBuilder::new().build(window)
    }

    /// The Vulkan loader entry points.
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// The Vulkan instance.
    pub fn instance(&self) -> &ash::Instance {
        &self.handles.instance
    }

    /// The surface bound to the context's window.
    pub fn surface(&self) -> &Surface {
        &self.handles.surface
    }

    /// The window this context presents to.
    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }

    /// Whether driver validation messages are routed into the log.
    pub fn validation_enabled(&self) -> bool {
        self.handles.debug_messenger.is_some()
    }
}

impl Deref for VulkanContext {
    type Target = ash::Instance;

    fn deref(&self) -> &ash::Instance {
        &self.handles.instance
    }
}

/// Builder for creating a [`VulkanContext`].
pub struct ContextBuilder {
    app_name: String,
    enable_validation: bool,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            app_name: "Erebos".to_string(),
            enable_validation: cfg!(debug_assertions),
        }
    }
}

impl ContextBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Enable or disable validation layers.
    pub fn validation(mut self, enable: bool) -> Self {
        self.enable_validation = enable;
        self
    }

    /// Build the context for `window`.
    pub fn build(self, window: &Window) -> Result<VulkanContext> {
        // SAFETY: The loaded library is kept alive by the context
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| GpuError::Initialization(format!("Failed to load Vulkan: {e}")))?;

        let display = window
            .display_handle()
            .map_err(|e| GpuError::Initialization(format!("Failed to get display handle: {e}")))?
            .as_raw();

        let enable_validation = self.enable_validation;
        // SAFETY: The entry was just loaded
        let instance =
            unsafe { create_instance(&entry, &self.app_name, display, enable_validation) }?;

        let handles = ContextHandles::new(
            instance,
            |instance| {
                if !enable_validation {
                    return Ok(None);
                }
                // SAFETY: Debug utils was requested for validation-enabled instances
                unsafe { DebugMessenger::new(&entry, instance) }.map(Some)
            },
            |instance| {
                // SAFETY: The instance carries the window's surface extensions and
                // the context keeps the window alive for as long as the surface exists
                unsafe { Surface::new(&entry, instance, window) }
            },
        )?;

        tracing::info!(
            "Vulkan context created for '{}' (validation: {})",
            self.app_name,
            self.enable_validation
        );

        Ok(VulkanContext {
            handles,
            entry,
            window: Arc::clone(window.handle()),
        })
    }
}

/// Native objects owned by a context.
struct ContextHandles<S: Destroy, M: Destroy, I: Destroy> {
    // Declaration order is teardown order
    surface: Owned<S>,
    debug_messenger: Option<Owned<M>>,
    instance: Owned<I>,
}

impl<S: Destroy, M: Destroy, I: Destroy> ContextHandles<S, M, I> {
    /// Take ownership of `instance` and create its messenger and surface.
    ///
    /// Whatever was created before a failing step is released, newest
    /// first, before the error is returned.
    fn new<FM, FS>(instance: I, create_messenger: FM, create_surface: FS) -> Result<Self>
    where
        FM: FnOnce(&I) -> Result<Option<M>>,
        FS: FnOnce(&I) -> Result<S>,
    {
        let instance = Owned::new(instance);
        let debug_messenger = create_messenger(&instance)?.map(Owned::new);
        let surface = Owned::new(create_surface(&instance)?);
        Ok(Self {
            surface,
            debug_messenger,
            instance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::{CallLog, Tracked};

    fn surface_lost() -> GpuError {
        GpuError::initialization(
            "Unable to create window surface",
            ash::vk::Result::ERROR_SURFACE_LOST_KHR,
        )
    }

    #[test]
    fn teardown_releases_surface_then_messenger_then_instance() {
        let log = CallLog::default();
        let handles = ContextHandles::<Tracked, Tracked, Tracked>::new(
            log.create("instance"),
            |_| Ok(Some(log.create("messenger"))),
            |_| Ok(log.create("surface")),
        )
        .unwrap();
        assert_eq!(log.count("destroy"), 0);

        drop(handles);
        assert_eq!(
            log.calls(),
            [
                "create instance",
                "create messenger",
                "create surface",
                "destroy surface",
                "destroy messenger",
                "destroy instance",
            ]
        );
    }

    #[test]
    fn teardown_without_validation_skips_messenger() {
        let log = CallLog::default();
        let handles = ContextHandles::<Tracked, Tracked, Tracked>::new(
            log.create("instance"),
            |_| Ok(None),
            |_| Ok(log.create("surface")),
        )
        .unwrap();
        assert!(handles.debug_messenger.is_none());

        drop(handles);
        assert_eq!(
            log.calls(),
            [
                "create instance",
                "create surface",
                "destroy surface",
                "destroy instance",
            ]
        );
    }

    #[test]
    fn surface_failure_releases_messenger_then_instance() {
        let log = CallLog::default();
        let result = ContextHandles::<Tracked, Tracked, Tracked>::new(
            log.create("instance"),
            |_| Ok(Some(log.create("messenger"))),
            |_| Err(surface_lost()),
        );

        assert!(matches!(result, Err(GpuError::Initialization(_))));
        assert_eq!(
            log.calls(),
            [
                "create instance",
                "create messenger",
                "destroy messenger",
                "destroy instance",
            ]
        );
    }

    #[test]
    fn messenger_failure_releases_instance_without_creating_surface() {
        let log = CallLog::default();
        let result = ContextHandles::<Tracked, Tracked, Tracked>::new(
            log.create("instance"),
            |_| {
                Err(GpuError::initialization(
                    "Unable to create debug messenger",
                    ash::vk::Result::ERROR_OUT_OF_HOST_MEMORY,
                ))
            },
            |_| Ok(log.create("surface")),
        );

        assert!(result.is_err());
        assert_eq!(log.calls(), ["create instance", "destroy instance"]);
    }
}
