//! Custom error types for AORUS WATERFORCE devices.
//!
//! This module provides fine-grained error handling for device communication,
//! protocol framing, and input validation.

use thiserror::Error;

/// Main error type for WATERFORCE device operations.
#[derive(Error, Debug)]
pub enum WaterforceError {
    /// Device not found during enumeration.
    #[error("AORUS WATERFORCE not found. Check USB connection and permissions.")]
    DeviceNotFound,

    /// HID communication error.
    #[error("HID communication error: {0}")]
    HidError(#[from] hidapi::HidError),

    /// Command payload does not fit in a single HID report.
    #[error("Command payload too large: {len} bytes, at most {max} allowed")]
    PayloadTooLarge { len: usize, max: usize },

    /// Invalid or malformed response from device.
    #[error("Invalid response from device: {message}")]
    InvalidResponse { message: String },

    /// Operation not supported by this device or driver.
    #[error("Operation not supported by the device")]
    NotSupported,

    /// Generic invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for WATERFORCE operations.
pub type Result<T> = std::result::Result<T, WaterforceError>;
