//! HID command definitions and frame builders for AORUS WATERFORCE coolers.
//!
//! Protocol based on reverse-engineering from the liquidctl project:
//! https://github.com/liquidctl/liquidctl/blob/main/liquidctl/driver/waterforce.py

use crate::error::{Result, WaterforceError};

// =============================================================================
// Constants
// =============================================================================

/// HID report length for reads and writes.
pub const HID_REPORT_LENGTH: usize = 64;

/// Maximum payload bytes in a single command (after prefix and opcode).
pub const MAX_PAYLOAD_LENGTH: usize = HID_REPORT_LENGTH - 2;

/// Every command and response starts with this prefix byte.
pub const CMD_PREFIX: u8 = 0x99;

/// Gigabyte Vendor ID.
pub const GIGABYTE_VID: u16 = 0x1044;

/// WATERFORCE X (240, 280, 360) Product ID. Three models share this PID.
pub const WATERFORCE_X_PID: u16 = 0x7A4D;

/// WATERFORCE X 360G Product ID.
pub const WATERFORCE_XG_PID: u16 = 0x7A52;

/// WATERFORCE EX 360 Product ID.
pub const WATERFORCE_EX_PID: u16 = 0x7A53;

/// Maximum fan speed in RPM.
pub const FAN_MAX_RPM: u16 = 2500;

/// Default maximum pump speed in RPM (pre-F1.4 firmware).
pub const PUMP_MAX_RPM: u16 = 2800;

/// Maximum pump speed in RPM on firmware F1.4 or later.
pub const PUMP_MAX_RPM_EXTENDED: u16 = 3200;

/// Minimum pump speed enforced by Gigabyte in RPM.
pub const PUMP_MIN_RPM: u16 = 750;

// =============================================================================
// Opcodes
// =============================================================================

/// Request firmware version.
pub const CMD_READ_FIRMWARE_VER: u8 = 0xD6;

/// Request device angle (defined by the vendor protocol, unused here).
pub const CMD_READ_DEVICE_ANGLE: u8 = 0xD7;

/// Request device speed (unused here, status report covers it).
pub const CMD_READ_DEVICE_SPEED: u8 = 0xD8;

/// Request device speed curve (unused here).
pub const CMD_READ_DEVICE_CURVE: u8 = 0xD9;

/// Request device status (temperature, RPM, duty).
pub const CMD_READ_DEVICE_STATUS: u8 = 0xDA;

/// Request current fan/pump mode.
pub const CMD_READ_DEVICE_MODE: u8 = 0xDD;

/// Request model variant (WATERFORCE X only, three models share one PID).
pub const CMD_READ_DEVICE_VARIANT: u8 = 0xDE;

/// Push CPU telemetry to the device (unused here).
pub const CMD_WRITE_CPU_INFO: u8 = 0xE0;

/// Push CPU name string to the device (unused here).
pub const CMD_WRITE_CPU_NAME: u8 = 0xE1;

/// Write to the device display (unused here).
pub const CMD_WRITE_DISPLAY: u8 = 0xE2;

/// Set fan/pump mode. Defined by the vendor DLL but incomplete; not exposed.
pub const CMD_WRITE_FANPUMP_MODE: u8 = 0xE5;

/// Set fixed fan/pump speed.
pub const CMD_WRITE_FANPUMP_SPEED: u8 = 0xEB;

// =============================================================================
// Speed Channels
// =============================================================================

/// Speed control channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Fan channel.
    Fan,
    /// Pump channel - firmware enforces a minimum of 750 RPM.
    Pump,
}

impl Channel {
    /// Get the wire identifier for this channel.
    pub const fn id(&self) -> u8 {
        match self {
            Channel::Fan => 0x1,
            Channel::Pump => 0x2,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Fan => write!(f, "Fan"),
            Channel::Pump => write!(f, "Pump"),
        }
    }
}

// =============================================================================
// Command Builders
// =============================================================================

/// Build a command frame: prefix, opcode, payload, zero-padded to 64 bytes.
///
/// # Arguments
/// * `opcode` - Command opcode (second byte of the frame)
/// * `payload` - Opcode-specific payload, at most 62 bytes
///
/// # Errors
/// Returns `PayloadTooLarge` if the payload does not fit in one report.
pub fn build_command(opcode: u8, payload: &[u8]) -> Result<[u8; HID_REPORT_LENGTH]> {
    if payload.len() > MAX_PAYLOAD_LENGTH {
        return Err(WaterforceError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_LENGTH,
        });
    }

    let mut buf = [0u8; HID_REPORT_LENGTH];
    buf[0] = CMD_PREFIX;
    buf[1] = opcode;
    buf[2..2 + payload.len()].copy_from_slice(payload);

    Ok(buf)
}

/// Build a fixed speed command.
///
/// The device expects the speed as a single duty byte. For the pump channel,
/// firmware enforces a minimum of 750 RPM: duties that would fall below it
/// are replaced by `(750 / max_pump_rpm) * 100` in integer arithmetic, which
/// evaluates to 0 for every shipped pump limit. This matches the vendor tool
/// byte for byte; see the pump floor notes in DESIGN.md.
///
/// # Arguments
/// * `channel` - The channel to set (Fan or Pump)
/// * `duty` - Requested duty percentage (0-100, not range-checked here)
/// * `max_pump_rpm` - The session's current pump RPM limit
///
/// # Returns
/// A 64-byte HID report ready to send to the device.
pub fn build_fixed_speed_cmd(
    channel: Channel,
    duty: u8,
    max_pump_rpm: u16,
) -> Result<[u8; HID_REPORT_LENGTH]> {
    let mut duty = duty;

    if channel == Channel::Pump {
        // Pump max duty is limited on earlier WATERFORCE X firmware.
        let rpm = (max_pump_rpm as u32 / 100) * duty as u32;
        if rpm < PUMP_MIN_RPM as u32 {
            duty = ((PUMP_MIN_RPM as u32 / max_pump_rpm as u32) * 100) as u8;
        }
    }

    build_command(CMD_WRITE_FANPUMP_SPEED, &[channel.id(), duty])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ids() {
        assert_eq!(Channel::Fan.id(), 0x1);
        assert_eq!(Channel::Pump.id(), 0x2);
    }

    #[test]
    fn test_build_command_layout() {
        let cmd = build_command(CMD_READ_DEVICE_STATUS, &[]).unwrap();
        assert_eq!(cmd.len(), HID_REPORT_LENGTH);
        assert_eq!(cmd[0], CMD_PREFIX);
        assert_eq!(cmd[1], CMD_READ_DEVICE_STATUS);
        assert!(cmd[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_build_command_payload_limit() {
        let payload = [0u8; MAX_PAYLOAD_LENGTH];
        assert!(build_command(0xEB, &payload).is_ok());

        let too_long = [0u8; MAX_PAYLOAD_LENGTH + 1];
        assert!(matches!(
            build_command(0xEB, &too_long),
            Err(WaterforceError::PayloadTooLarge { len: 63, max: 62 })
        ));
    }

    #[test]
    fn test_fixed_speed_cmd() {
        let cmd = build_fixed_speed_cmd(Channel::Fan, 50, PUMP_MAX_RPM).unwrap();
        assert_eq!(cmd.len(), HID_REPORT_LENGTH);
        assert_eq!(cmd[0], CMD_PREFIX);
        assert_eq!(cmd[1], CMD_WRITE_FANPUMP_SPEED);
        assert_eq!(cmd[2], 0x1);
        assert_eq!(cmd[3], 50);
        assert!(cmd[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pump_duty_above_floor_unchanged() {
        // 28 RPM per duty point at the default limit; 50% = 1400 RPM.
        let cmd = build_fixed_speed_cmd(Channel::Pump, 50, PUMP_MAX_RPM).unwrap();
        assert_eq!(cmd[2], 0x2);
        assert_eq!(cmd[3], 50);
    }

    #[test]
    fn test_pump_duty_below_floor_collapses_to_zero() {
        // 10% of 2800 = 280 RPM, below the 750 RPM floor. The vendor fallback
        // is (750 / 2800) * 100 in integer arithmetic, i.e. 0.
        let cmd = build_fixed_speed_cmd(Channel::Pump, 10, PUMP_MAX_RPM).unwrap();
        assert_eq!(cmd[3], 0);

        // Same at the extended limit: 20% of 3200 = 640 RPM.
        let cmd = build_fixed_speed_cmd(Channel::Pump, 20, PUMP_MAX_RPM_EXTENDED).unwrap();
        assert_eq!(cmd[3], 0);
    }

    #[test]
    fn test_fan_duty_not_floored() {
        let cmd = build_fixed_speed_cmd(Channel::Fan, 5, PUMP_MAX_RPM).unwrap();
        assert_eq!(cmd[3], 5);
    }
}
