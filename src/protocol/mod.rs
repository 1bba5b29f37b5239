//! HID protocol implementation for AORUS WATERFORCE coolers.
//!
//! This module contains the low-level HID command constants, frame builders,
//! mode table, and response parsing logic based on the reverse-engineered
//! protocol from liquidctl.

pub mod commands;
pub mod modes;
pub mod status;

pub use commands::*;
pub use modes::*;
pub use status::*;
