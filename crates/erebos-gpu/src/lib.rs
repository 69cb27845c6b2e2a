//! Vulkan device and context lifecycle for the Erebos engine.
//!
//! This crate provides:
//! - Vulkan instance creation bound to a window surface
//! - Physical device selection by device-local memory
//! - Logical device, queue and memory allocator setup
//! - Surface format negotiation
//! - Ordered, exactly-once teardown of every native object
//!
//! Ownership is strictly nested: the allocator lives inside the device,
//! which borrows the context that owns the instance.

pub mod capabilities;
pub mod context;
pub mod device;
pub mod error;
pub mod handle;
pub mod instance;
pub mod memory;
pub mod queue;
pub mod result;
pub mod selector;
pub mod surface;

pub use capabilities::{device_local_heap_size, DeviceInfo, GpuVendor};
pub use context::{ContextBuilder, VulkanContext};
pub use device::Device;
pub use error::{GpuError, Result};
pub use handle::{Destroy, Owned};
pub use memory::MemoryAllocator;
pub use queue::{select_queue_family, Queue};
pub use result::describe_result;
pub use selector::{find_preferred_device, select_by_memory, select_largest_heap};
pub use surface::{acceptable_surface_formats, preferred_surface_format, Surface};
