//! Physical device description.

use ash::vk;

/// GPU vendor identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Other(u32),
}

impl GpuVendor {
    /// Identify vendor from PCI vendor ID.
    pub fn from_vendor_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            other => Self::Other(other),
        }
    }
}

/// Read-only description of a physical device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// GPU vendor
    pub vendor: GpuVendor,
    /// Device name
    pub name: String,
    /// Discrete, integrated, virtual, CPU...
    pub device_type: vk::PhysicalDeviceType,
    /// Highest Vulkan version the device supports
    pub api_version: u32,
    /// Vendor-encoded driver version
    pub driver_version: u32,
    /// Sum of all device-local heaps in bytes
    pub device_local_memory: u64,
}

impl DeviceInfo {
    /// Describe `physical_device`.
    ///
    /// # Safety
    /// The instance and physical device must be valid.
    pub unsafe fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        // SAFETY: Caller guarantees validity
        let (properties, memory) = unsafe {
            (
                instance.get_physical_device_properties(physical_device),
                instance.get_physical_device_memory_properties(physical_device),
            )
        };
        Self::from_properties(&properties, &memory)
    }

    /// Build a description from already queried properties.
    pub fn from_properties(
        properties: &vk::PhysicalDeviceProperties,
        memory: &vk::PhysicalDeviceMemoryProperties,
    ) -> Self {
        let name = properties
            .device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "<unnamed device>".to_string());

        Self {
            vendor: GpuVendor::from_vendor_id(properties.vendor_id),
            name,
            device_type: properties.device_type,
            api_version: properties.api_version,
            driver_version: properties.driver_version,
            device_local_memory: device_local_heap_size(memory),
        }
    }

    /// Whether the device implements Vulkan 1.3, which the engine requires.
    pub fn supports_vulkan_1_3(&self) -> bool {
        vk::api_version_major(self.api_version) > 1
            || (vk::api_version_major(self.api_version) == 1
                && vk::api_version_minor(self.api_version) >= 3)
    }

    /// Driver version as `major.minor.patch`.
    pub fn driver_version_string(&self) -> String {
        format!(
            "{}.{}.{}",
            vk::api_version_major(self.driver_version),
            vk::api_version_minor(self.driver_version),
            vk::api_version_patch(self.driver_version),
        )
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:?}, {:?}) - Vulkan {}.{}.{} - {} MB device-local",
            self.name,
            self.vendor,
            self.device_type,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
            self.device_local_memory / (1024 * 1024),
        )
    }
}

/// Total size in bytes of the heaps that live on the GPU.
///
/// Host-visible system memory heaps are not counted.
pub fn device_local_heap_size(memory: &vk::PhysicalDeviceMemoryProperties) -> u64 {
    memory
        .memory_heaps
        .iter()
        .take(memory.memory_heap_count as usize)
        .filter(|heap| heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
        .map(|heap| heap.size)
        .sum()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    /// Memory properties with one heap per `(size, device_local)` entry.
    pub(crate) fn memory(heaps: &[(u64, bool)]) -> vk::PhysicalDeviceMemoryProperties {
        let mut memory = vk::PhysicalDeviceMemoryProperties {
            memory_heap_count: heaps.len() as u32,
            ..Default::default()
        };
        for (slot, &(size, local)) in memory.memory_heaps.iter_mut().zip(heaps) {
            slot.size = size;
            if local {
                slot.flags = vk::MemoryHeapFlags::DEVICE_LOCAL;
            }
        }
        memory
    }

    #[test]
    fn vendor_identification() {
        assert_eq!(GpuVendor::from_vendor_id(0x10DE), GpuVendor::Nvidia);
        assert_eq!(GpuVendor::from_vendor_id(0x1002), GpuVendor::Amd);
        assert_eq!(GpuVendor::from_vendor_id(0x8086), GpuVendor::Intel);
        assert_eq!(GpuVendor::from_vendor_id(0x5143), GpuVendor::Other(0x5143));
    }

    #[test]
    fn only_device_local_heaps_count() {
        let memory = memory(&[(8 * GIB, true), (16 * GIB, false), (256 * 1024 * 1024, true)]);
        assert_eq!(device_local_heap_size(&memory), 8 * GIB + 256 * 1024 * 1024);
    }

    #[test]
    fn heaps_past_the_count_are_ignored() {
        let mut memory = memory(&[(2 * GIB, true)]);
        memory.memory_heaps[1].size = 64 * GIB;
        memory.memory_heaps[1].flags = vk::MemoryHeapFlags::DEVICE_LOCAL;
        assert_eq!(device_local_heap_size(&memory), 2 * GIB);
    }

    #[test]
    fn large_heaps_do_not_overflow() {
        let memory = memory(&[(24 * GIB, true), (24 * GIB, true)]);
        assert_eq!(device_local_heap_size(&memory), 48 * GIB);
    }

    #[test]
    fn version_checks() {
        let props = vk::PhysicalDeviceProperties {
            api_version: vk::make_api_version(0, 1, 2, 198),
            driver_version: vk::make_api_version(0, 23, 1, 4),
            ..Default::default()
        };
        let info = DeviceInfo::from_properties(&props, &memory(&[]));
        assert!(!info.supports_vulkan_1_3());
        assert_eq!(info.driver_version_string(), "23.1.4");

        let props = vk::PhysicalDeviceProperties {
            api_version: vk::API_VERSION_1_3,
            ..Default::default()
        };
        assert!(DeviceInfo::from_properties(&props, &memory(&[])).supports_vulkan_1_3());
    }
}
