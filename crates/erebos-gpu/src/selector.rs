//! Physical device selection.

use crate::capabilities::{device_local_heap_size, DeviceInfo};
use crate::context::VulkanContext;
use crate::device::Device;
use crate::error::{GpuError, Result};
use ash::vk;

/// Create a device on the GPU with the most device-local memory.
///
/// Returns `Ok(None)` when the driver reports no physical devices. The
/// context is not modified, so calling this again yields the same choice.
pub fn find_preferred_device(context: &VulkanContext) -> Result<Option<Device<'_>>> {
    // SAFETY: The instance is valid for the lifetime of the context
    let physical_devices = unsafe { context.enumerate_physical_devices() }
        .map_err(|e| GpuError::enumeration("Unable to get physical devices", e))?;
    tracing::info!("Found {} devices in total", physical_devices.len());

    let memory: Vec<vk::PhysicalDeviceMemoryProperties> = physical_devices
        .iter()
        .map(|&physical_device| {
            // SAFETY: The physical device was just enumerated from this instance
            let (properties, memory) = unsafe {
                (
                    context.get_physical_device_properties(physical_device),
                    context.get_physical_device_memory_properties(physical_device),
                )
            };
            tracing::debug!(
                "Candidate: {}",
                DeviceInfo::from_properties(&properties, &memory).summary()
            );
            memory
        })
        .collect();

    let Some(index) = select_by_memory(&memory) else {
        return Ok(None);
    };

    Device::new(context, physical_devices[index]).map(Some)
}

/// Index of the largest device-local heap size.
///
/// Ties resolve to the earliest entry, so the driver's enumeration order
/// breaks them. Empty input selects nothing.
pub fn select_largest_heap(heap_sizes: &[u64]) -> Option<usize> {
    heap_sizes
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u64)>, (index, &size)| match best {
            Some((_, best_size)) if best_size >= size => best,
            _ => Some((index, size)),
        })
        .map(|(index, _)| index)
}

/// Index of the memory layout with the most device-local memory.
pub fn select_by_memory(memory: &[vk::PhysicalDeviceMemoryProperties]) -> Option<usize> {
    let sizes: Vec<u64> = memory.iter().map(device_local_heap_size).collect();
    select_largest_heap(&sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::tests::memory;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn picks_largest_heap() {
        assert_eq!(select_largest_heap(&[4 * GIB, 8 * GIB, 2 * GIB]), Some(1));
    }

    #[test]
    fn ties_go_to_first_enumerated() {
        assert_eq!(select_largest_heap(&[8 * GIB, 8 * GIB]), Some(0));
        assert_eq!(select_largest_heap(&[2 * GIB, 8 * GIB, 4 * GIB, 8 * GIB]), Some(1));
        assert_eq!(select_largest_heap(&[0, 0, 0]), Some(0));
    }

    #[test]
    fn singleton_is_selected() {
        assert_eq!(select_largest_heap(&[0]), Some(0));
        assert_eq!(select_largest_heap(&[16 * GIB]), Some(0));
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(select_largest_heap(&[]), None);
        assert_eq!(select_by_memory(&[]), None);
    }

    #[test]
    fn selection_is_maximal_and_first() {
        let lists: [&[u64]; 6] = [
            &[1, 2, 3],
            &[3, 2, 1],
            &[5, 9, 9, 1],
            &[7, 7, 7, 7],
            &[0, 10, 3, 10, 2],
            &[u64::MAX, 1, u64::MAX],
        ];
        for list in lists {
            let index = select_largest_heap(list).unwrap();
            let max = *list.iter().max().unwrap();
            assert_eq!(list[index], max, "not maximal for {list:?}");
            assert!(list[..index].iter().all(|&size| size < max), "not first for {list:?}");
        }
    }

    #[test]
    fn host_visible_heaps_do_not_win() {
        let devices = [
            // Integrated GPU: small carve-out plus a large shared system heap
            memory(&[(512 * 1024 * 1024, true), (32 * GIB, false)]),
            // Discrete GPU
            memory(&[(8 * GIB, true), (16 * GIB, false)]),
            memory(&[(4 * GIB, true), (2 * GIB, true)]),
        ];
        assert_eq!(select_by_memory(&devices), Some(1));
    }

    #[test]
    fn memory_ties_go_to_first_enumerated() {
        let devices = [
            memory(&[(4 * GIB, true), (8 * GIB, false)]),
            memory(&[(2 * GIB, true), (2 * GIB, true)]),
            memory(&[]),
        ];
        assert_eq!(select_by_memory(&devices), Some(0));
        assert_eq!(select_by_memory(&[memory(&[])]), Some(0));
    }
}
