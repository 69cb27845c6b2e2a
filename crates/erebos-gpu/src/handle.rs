//! Exclusive ownership of native Vulkan objects.
//!
//! Native handles carry no ownership information of their own. Every object
//! the engine creates is wrapped in an [`Owned`] value immediately after
//! creation, so it is released exactly once: when its owner is dropped, or
//! on the error path of whatever construction step failed after it.

use std::mem::ManuallyDrop;
use std::ops::Deref;

/// A native object that can be released.
pub trait Destroy {
    /// Release the native object.
    ///
    /// # Safety
    /// Nothing created from this object may still be alive or in use by the GPU.
    unsafe fn destroy(self);
}

/// Move-only owner of a native object.
///
/// The object is destroyed when the owner is dropped. Moving an `Owned`
/// transfers the obligation; the source of a move is never dropped.
pub struct Owned<T: Destroy> {
    inner: ManuallyDrop<T>,
}

impl<T: Destroy> Owned<T> {
    /// Take ownership of a freshly created object.
    pub fn new(inner: T) -> Self {
        Self {
            inner: ManuallyDrop::new(inner),
        }
    }

    /// Give up ownership without destroying the object.
    pub fn into_inner(self) -> T {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the value is moved out exactly once.
        unsafe { ManuallyDrop::take(&mut this.inner) }
    }
}

impl<T: Destroy> Deref for Owned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Destroy> Drop for Owned<T> {
    fn drop(&mut self) {
        // SAFETY: `inner` is taken once, here, and never touched again.
        unsafe { ManuallyDrop::take(&mut self.inner).destroy() }
    }
}

impl Destroy for ash::Instance {
    unsafe fn destroy(self) {
        tracing::debug!("Destroying Vulkan instance");
        // SAFETY: Caller guarantees no child object is alive
        unsafe { self.destroy_instance(None) };
    }
}

impl Destroy for ash::Device {
    unsafe fn destroy(self) {
        tracing::debug!("Destroying logical device");
        // SAFETY: Caller guarantees no child object is alive
        unsafe {
            if let Err(e) = self.device_wait_idle() {
                tracing::warn!("Device did not go idle before teardown: {e}");
            }
            self.destroy_device(None);
        }
    }
}
