//! Logical device creation and teardown.

use crate::capabilities::DeviceInfo;
use crate::context::VulkanContext;
use crate::error::{GpuError, Result};
use crate::handle::{Destroy, Owned};
use crate::memory::MemoryAllocator;
use crate::queue::{select_queue_family, Queue};
use crate::result::describe_result;
use crate::surface::{acceptable_surface_formats, preferred_surface_format};
use ash::vk;
use std::ffi::{c_char, CStr};
use std::ops::Deref;

/// Priority of every queue the engine creates.
const QUEUE_PRIORITY: f32 = 1.0;

/// Required device extensions.
fn required_device_extensions() -> Vec<&'static CStr> {
    vec![ash::khr::swapchain::NAME]
}

/// A logical device with its queues and memory allocator.
///
/// Borrows the [`VulkanContext`] it was created from, so it cannot outlive
/// the instance. Dropping the device releases the allocator first and the
/// logical device second.
pub struct Device<'ctx> {
    context: &'ctx VulkanContext,
    physical_device: vk::PhysicalDevice,
    info: DeviceInfo,
    handles: DeviceHandles<ash::Device, MemoryAllocator>,
    queues: Vec<Queue>,
}

impl<'ctx> Device<'ctx> {
    /// Create a logical device on `physical_device`.
    ///
    /// `physical_device` must have been enumerated from `context`.
    pub fn new(context: &'ctx VulkanContext, physical_device: vk::PhysicalDevice) -> Result<Self> {
        let instance = context.instance();

        // SAFETY: The physical device belongs to the context's instance
        let info = unsafe { DeviceInfo::query(instance, physical_device) };
        if !info.supports_vulkan_1_3() {
            return Err(GpuError::Initialization(format!(
                "Device '{}' does not support Vulkan 1.3",
                info.name
            )));
        }

        // SAFETY: Vulkan 1.3 devices support the features2 query
        if !unsafe { supports_dynamic_rendering(instance, physical_device) } {
            return Err(GpuError::Initialization(format!(
                "Device '{}' does not support dynamic rendering",
                info.name
            )));
        }

        // SAFETY: The physical device belongs to the context's instance
        let families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
        let queue_family = select_queue_family(&families, |family| {
            context
                .surface()
                .supports_presentation(physical_device, family)
        })?;

        tracing::info!(
            "Creating device '{}' (Driver Version: {})",
            info.name,
            info.driver_version_string()
        );

        // SAFETY: The physical device belongs to the context's instance
        let device = unsafe { create_logical_device(instance, physical_device, queue_family) }?;

        // SAFETY: The family was requested with one queue at creation
        let queues = vec![Queue::new(queue_family, 0, unsafe {
            device.get_device_queue(queue_family, 0)
        })];

        let handles = DeviceHandles::new(device, |device| {
            // SAFETY: The entry is valid for the lifetime of the context
            let api_version = unsafe { context.entry().try_enumerate_instance_version() }
                .map_err(|e| {
                    GpuError::AllocatorCreation(format!(
                        "Unable to get instance version: {}",
                        describe_result(e)
                    ))
                })?
                .unwrap_or(vk::API_VERSION_1_0);
            tracing::debug!(
                "Creating memory allocator (instance version {}.{}.{})",
                vk::api_version_major(api_version),
                vk::api_version_minor(api_version),
                vk::api_version_patch(api_version),
            );

            // SAFETY: Instance, physical device and device belong together
            unsafe { MemoryAllocator::new(instance, device, physical_device) }
        })?;

        tracing::info!("Device ready: {}", info.summary());

        Ok(Self {
            context,
            physical_device,
            info,
            handles,
            queues,
        })
    }

    /// The context this device was created from.
    pub fn context(&self) -> &'ctx VulkanContext {
        self.context
    }

    /// The physical device handle.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Description of the physical device.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// The queues created with the device.
    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    /// The queue used for graphics submission and presentation.
    pub fn graphics_queue(&self) -> &Queue {
        // Construction always creates exactly one queue
        &self.queues[0]
    }

    /// The device's memory allocator.
    pub fn allocator(&self) -> &MemoryAllocator {
        &self.handles.allocator
    }

    /// The first surface format the engine accepts, in driver order.
    ///
    /// `Ok(None)` means the surface offers no acceptable format.
    pub fn find_preferred_surface_format(&self) -> Result<Option<vk::SurfaceFormatKHR>> {
        let formats = self.context.surface().formats(self.physical_device)?;
        Ok(preferred_surface_format(&formats))
    }

    /// Every surface format the engine accepts, in driver order.
    pub fn acceptable_surface_formats(&self) -> Result<Vec<vk::SurfaceFormatKHR>> {
        let formats = self.context.surface().formats(self.physical_device)?;
        Ok(acceptable_surface_formats(&formats))
    }
}

impl Deref for Device<'_> {
    type Target = ash::Device;

    fn deref(&self) -> &ash::Device {
        &self.handles.device
    }
}

impl Drop for Device<'_> {
    fn drop(&mut self) {
        tracing::info!("Releasing device '{}'", self.info.name);
    }
}

/// Native objects owned by a device.
struct DeviceHandles<D: Destroy, A: Destroy> {
    // Declaration order is teardown order: the allocator wraps the device
    allocator: Owned<A>,
    device: Owned<D>,
}

impl<D: Destroy, A: Destroy> DeviceHandles<D, A> {
    /// Take ownership of `device` and create its allocator.
    ///
    /// If allocator creation fails the device is released before the error
    /// is returned.
    fn new<F>(device: D, create_allocator: F) -> Result<Self>
    where
        F: FnOnce(&D) -> Result<A>,
    {
        let device = Owned::new(device);
        let allocator = Owned::new(create_allocator(&device)?);
        Ok(Self { allocator, device })
    }
}

/// Whether `physical_device` supports dynamic rendering.
///
/// # Safety
/// The physical device must support Vulkan 1.1 or later.
unsafe fn supports_dynamic_rendering(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> bool {
    let mut vulkan_1_3_features = vk::PhysicalDeviceVulkan13Features::default();
    {
        let mut features2 =
            vk::PhysicalDeviceFeatures2::default().push_next(&mut vulkan_1_3_features);
        // SAFETY: Caller guarantees features2 is supported
        unsafe { instance.get_physical_device_features2(physical_device, &mut features2) };
    }
    vulkan_1_3_features.dynamic_rendering == vk::TRUE
}

/// Create the logical device with one queue from `queue_family`.
///
/// # Safety
/// The instance and physical device must be valid.
unsafe fn create_logical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    queue_family: u32,
) -> Result<ash::Device> {
    let queue_create_infos = [vk::DeviceQueueCreateInfo::default()
        .queue_family_index(queue_family)
        .queue_priorities(std::slice::from_ref(&QUEUE_PRIORITY))];

    let extensions = required_device_extensions();
    let extension_names: Vec<*const c_char> = extensions.iter().map(|ext| ext.as_ptr()).collect();

    let mut vulkan_1_3_features = vk::PhysicalDeviceVulkan13Features::default().dynamic_rendering(true);
    let mut features2 = vk::PhysicalDeviceFeatures2::default().push_next(&mut vulkan_1_3_features);

    let device_create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_create_infos)
        .enabled_extension_names(&extension_names)
        .push_next(&mut features2);

    // SAFETY: Caller guarantees validity; all pointers outlive the call
    unsafe { instance.create_device(physical_device, &device_create_info, None) }
        .map_err(|e| GpuError::DeviceCreation(describe_result(e)))
}
