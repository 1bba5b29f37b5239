//! Device abstraction layer for AORUS WATERFORCE coolers.
//!
//! Provides the high-level session type and the transport seam.

pub mod waterforce;

pub use waterforce::{DeviceKind, Transport, Waterforce};
