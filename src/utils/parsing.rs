//! Parsing utilities for CLI arguments.
//!
//! This module provides reusable parsing functions for common input formats
//! used throughout the application.

use crate::error::{Result, WaterforceError};
use crate::protocol::{Channel, CoolingMode};

// =============================================================================
// Channel Parsing
// =============================================================================

/// Parse a channel name string into a Channel enum.
///
/// # Arguments
/// * `name` - Channel name: "fan" or "pump"
///
/// # Returns
/// The corresponding Channel variant
pub fn parse_channel(name: &str) -> Result<Channel> {
    match name.to_lowercase().as_str() {
        "fan" => Ok(Channel::Fan),
        "pump" => Ok(Channel::Pump),
        _ => Err(WaterforceError::InvalidInput(format!(
            "Unknown channel '{}'. Use: fan or pump",
            name
        ))),
    }
}

// =============================================================================
// Mode Parsing
// =============================================================================

/// Parse a cooling mode name into a CoolingMode enum.
///
/// # Arguments
/// * `name` - Profile name, e.g. "quiet", "performance", "zero rpm"
pub fn parse_mode(name: &str) -> Result<CoolingMode> {
    CoolingMode::from_name(&name.to_lowercase()).ok_or_else(|| {
        let names: Vec<_> = CoolingMode::ALL.iter().map(|m| m.name()).collect();
        WaterforceError::InvalidInput(format!(
            "Unknown mode '{}'. Use one of: {}",
            name,
            names.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel() {
        assert!(matches!(parse_channel("fan").unwrap(), Channel::Fan));
        assert!(matches!(parse_channel("PUMP").unwrap(), Channel::Pump));
        assert!(parse_channel("invalid").is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("quiet").unwrap(), CoolingMode::Quiet);
        assert_eq!(parse_mode("Zero RPM").unwrap(), CoolingMode::ZeroRpm);
        assert!(parse_mode("turbo").is_err());
    }
}
