//! WATERFORCE Rust Devices Library
//!
//! A Rust driver for Gigabyte AORUS WATERFORCE X liquid coolers.
//!
//! # Features
//!
//! - Read device status (temperature, RPM, duty, active modes)
//! - Resolve model variant and firmware version at initialization
//! - Set fixed fan and pump speeds
//!
//! Lighting/RGB control is not supported by this device class.
//!
//! # Example
//!
//! ```no_run
//! use waterforce_rust_devices::device::Waterforce;
//! use waterforce_rust_devices::protocol::Channel;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open and initialize the device
//!     let mut cooler = Waterforce::open()?;
//!     let info = cooler.initialize()?;
//!     print!("{}", info);
//!
//!     // Read current status
//!     let status = cooler.get_status()?;
//!     print!("{}", status);
//!
//!     // Set fixed speeds
//!     cooler.set_fixed_speed(Channel::Fan, 50)?;
//!     cooler.set_fixed_speed(Channel::Pump, 80)?;
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod protocol;
pub mod utils;

// Re-exports for convenience
pub use device::{DeviceKind, Transport, Waterforce};
pub use error::{Result, WaterforceError};
pub use protocol::{Channel, CoolingMode, StatusReport};
