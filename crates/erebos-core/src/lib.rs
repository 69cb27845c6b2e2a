//! Shared process-wide services for the Erebos engine.
//!
//! - Logging setup, performed once at startup
//! - Engine-wide constants

pub mod logging;

pub use logging::{init_logging, LogConfig};

/// Engine-wide constants
pub mod constants {
    /// Name reported to drivers and in logs
    pub const ENGINE_NAME: &str = "Erebos";
    /// Engine version, taken from the crate manifest
    pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
