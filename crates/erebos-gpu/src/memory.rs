//! GPU memory allocator owned by a device.

use crate::error::{GpuError, Result};
use crate::handle::Destroy;
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use gpu_allocator::AllocatorDebugSettings;
use parking_lot::{Mutex, MutexGuard};

/// GPU memory allocator wrapper.
///
/// Sub-allocates device memory on behalf of the engine. The allocator calls
/// into the same instance and device function tables the engine uses, so it
/// must be destroyed before the device it was created for.
pub struct MemoryAllocator {
    allocator: Mutex<Allocator>,
}

impl MemoryAllocator {
    /// Create an allocator for the (instance, physical device, device) triple.
    ///
    /// # Safety
    /// The instance, device, and physical device must be valid and related.
    pub unsafe fn new(
        instance: &ash::Instance,
        device: &ash::Device,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Self> {
        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: instance.clone(),
            device: device.clone(),
            physical_device,
            debug_settings: AllocatorDebugSettings {
                log_memory_information: cfg!(debug_assertions),
                log_leaks_on_shutdown: true,
                ..Default::default()
            },
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })
        .map_err(|e| GpuError::AllocatorCreation(e.to_string()))?;

        Ok(Self {
            allocator: Mutex::new(allocator),
        })
    }

    /// Lock the allocator for allocation or freeing.
    ///
    /// Callers on different threads are serialized here.
    pub fn lock(&self) -> MutexGuard<'_, Allocator> {
        self.allocator.lock()
    }
}

impl Destroy for MemoryAllocator {
    unsafe fn destroy(self) {
        tracing::debug!("Destroying memory allocator");
        // Dropping the allocator frees every VkDeviceMemory block it still holds
        drop(self.allocator.into_inner());
    }
}
