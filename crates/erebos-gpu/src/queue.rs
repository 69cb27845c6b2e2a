//! Device queues and queue-family selection.

use crate::error::{GpuError, Result};
use ash::vk;

/// A command queue retrieved from a [`Device`](crate::Device).
///
/// Queues are released together with their device and are only handed out
/// by reference, so a `Queue` never outlives the device it belongs to.
/// Submissions to one queue must be serialized by the caller.
#[derive(Debug)]
pub struct Queue {
    family_index: u32,
    index: u32,
    handle: vk::Queue,
}

impl Queue {
    pub(crate) fn new(family_index: u32, index: u32, handle: vk::Queue) -> Self {
        Self {
            family_index,
            index,
            handle,
        }
    }

    /// Index of the queue family this queue belongs to.
    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    /// Index of the queue within its family.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The raw queue handle.
    pub fn handle(&self) -> vk::Queue {
        self.handle
    }
}

/// Pick the first queue family that can both submit graphics work and
/// present to the surface.
///
/// `supports_presentation` is only asked about graphics-capable families.
pub fn select_queue_family<F>(
    families: &[vk::QueueFamilyProperties],
    mut supports_presentation: F,
) -> Result<u32>
where
    F: FnMut(u32) -> Result<bool>,
{
    for (index, family) in families.iter().enumerate() {
        let index = index as u32;
        if family.queue_count == 0 || !family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            continue;
        }
        if supports_presentation(index)? {
            return Ok(index);
        }
    }

    Err(GpuError::NoSuitableQueueFamily)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags, count: u32) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: count,
            ..Default::default()
        }
    }

    #[test]
    fn first_graphics_family_with_presentation_wins() {
        let families = [
            family(vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER, 2),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 16),
            family(vk::QueueFlags::GRAPHICS, 1),
        ];
        assert_eq!(select_queue_family(&families, |_| Ok(true)).unwrap(), 1);
    }

    #[test]
    fn presentation_support_is_required() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::GRAPHICS, 1),
        ];
        let mut asked = Vec::new();
        let selected = select_queue_family(&families, |index| {
            asked.push(index);
            Ok(index == 1)
        })
        .unwrap();
        assert_eq!(selected, 1);
        assert_eq!(asked, [0, 1]);
    }

    #[test]
    fn non_graphics_families_are_never_queried() {
        let families = [family(vk::QueueFlags::TRANSFER, 1)];
        let result = select_queue_family(&families, |_| panic!("queried a transfer family"));
        assert!(matches!(result, Err(GpuError::NoSuitableQueueFamily)));
    }

    #[test]
    fn no_family_is_an_error() {
        let families = [
            family(vk::QueueFlags::COMPUTE, 1),
            family(vk::QueueFlags::GRAPHICS, 0),
            family(vk::QueueFlags::GRAPHICS, 4),
        ];
        let result = select_queue_family(&families, |_| Ok(false));
        assert!(matches!(result, Err(GpuError::NoSuitableQueueFamily)));
        assert!(matches!(select_queue_family(&[], |_| Ok(true)), Err(GpuError::NoSuitableQueueFamily)));
    }

    #[test]
    fn query_failures_propagate() {
        let families = [family(vk::QueueFlags::GRAPHICS, 1)];
        let result = select_queue_family(&families, |_| {
            Err(GpuError::enumeration(
                "Unable to query presentation support",
                vk::Result::ERROR_SURFACE_LOST_KHR,
            ))
        });
        assert!(matches!(result, Err(GpuError::Enumeration(_))));
    }
}
