//! Device status parsing for AORUS WATERFORCE coolers.
//!
//! Parses HID response buffers into structured status data. Offsets taken
//! from the liquidctl waterforce driver.

use log::warn;

use crate::error::{Result, WaterforceError};
use crate::protocol::commands::{
    CMD_PREFIX, CMD_READ_DEVICE_STATUS, PUMP_MAX_RPM, PUMP_MAX_RPM_EXTENDED,
};
use crate::protocol::modes::CoolingMode;

// =============================================================================
// Response Parsing Offsets
// =============================================================================

/// Offset for fan RPM low byte (status response).
const OFFSET_FAN_RPM_LO: usize = 2;
/// Offset for fan RPM high byte.
const OFFSET_FAN_RPM_HI: usize = 3;
/// Offset for pump RPM low byte.
const OFFSET_PUMP_RPM_LO: usize = 5;
/// Offset for pump RPM high byte.
const OFFSET_PUMP_RPM_HI: usize = 6;
/// Offset for fan duty percentage.
const OFFSET_FAN_DUTY: usize = 8;
/// Offset for pump duty percentage.
const OFFSET_PUMP_DUTY: usize = 9;
/// Offset for liquid temperature in whole °C.
const OFFSET_TEMP: usize = 0xD;

/// Offset for the fan mode code (mode response).
const OFFSET_FAN_MODE: usize = 2;
/// Offset for the pump mode code.
const OFFSET_PUMP_MODE: usize = 3;

/// Offset for the variant code (variant response).
const OFFSET_VARIANT: usize = 2;

/// Offsets for the firmware major/minor bytes (firmware response).
const OFFSET_FW_MAJOR: usize = 2;
const OFFSET_FW_MINOR: usize = 3;

// =============================================================================
// Property names
// =============================================================================

pub const STATUS_TEMPERATURE: &str = "Liquid temperature";
pub const STATUS_FAN_SPEED: &str = "Fan speed";
pub const STATUS_PUMP_SPEED: &str = "Pump speed";
pub const STATUS_FAN_DUTY: &str = "Fan duty";
pub const STATUS_PUMP_DUTY: &str = "Pump duty";
pub const STATUS_FAN_MODE: &str = "Fan mode";
pub const STATUS_PUMP_MODE: &str = "Pump mode";
pub const STATUS_FIRMWARE_VER: &str = "Firmware version";
pub const STATUS_VARIANT: &str = "Model variant";

// =============================================================================
// Status Report
// =============================================================================

/// A single status field value.
///
/// Unknown enumerated codes (mode, variant) decode to `Absent` rather than
/// failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(u16),
    Text(String),
    Absent,
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Absent => write!(f, "-"),
        }
    }
}

/// One (property, value, unit) triple of a status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusField {
    pub property: &'static str,
    pub value: FieldValue,
    pub unit: &'static str,
}

impl StatusField {
    pub fn new(property: &'static str, value: FieldValue, unit: &'static str) -> Self {
        Self {
            property,
            value,
            unit,
        }
    }
}

/// Ordered list of status fields, as returned by `initialize` and
/// `get_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport(pub Vec<StatusField>);

impl StatusReport {
    /// Sort fields by property name (used for the initialization report).
    pub fn sorted(mut self) -> Self {
        self.0.sort_by(|a, b| a.property.cmp(b.property));
        self
    }

    pub fn fields(&self) -> &[StatusField] {
        &self.0
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .0
            .iter()
            .map(|field| field.property.len())
            .max()
            .unwrap_or(0);

        for field in &self.0 {
            if field.unit.is_empty() {
                writeln!(f, "{:<width$}  {}", field.property, field.value)?;
            } else {
                writeln!(
                    f,
                    "{:<width$}  {} {}",
                    field.property, field.value, field.unit
                )?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Device Status
// =============================================================================

/// Cooling readings from a single status round trip pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatus {
    /// Liquid coolant temperature in whole °C.
    pub liquid_temp_c: u8,
    /// Fan speed in RPM.
    pub fan_rpm: u16,
    /// Pump speed in RPM.
    pub pump_rpm: u16,
    /// Fan duty cycle as percentage (0-100).
    pub fan_duty: u8,
    /// Pump duty cycle as percentage (0-100).
    pub pump_duty: u8,
    /// Current fan preset, if the reported code is known.
    pub fan_mode: Option<CoolingMode>,
    /// Current pump preset, if the reported code is known.
    pub pump_mode: Option<CoolingMode>,
}

impl DeviceStatus {
    /// Parse a status response (0xDA) plus a mode response (0xDD).
    ///
    /// The status response should echo [0x99, 0xDA] in its first two bytes.
    /// A mismatch is logged as a warning and decoding proceeds anyway, since
    /// some firmware revisions echo stale opcodes.
    ///
    /// # Arguments
    /// * `status_buf` - 64-byte response to CMD_READ_DEVICE_STATUS
    /// * `mode_buf` - 64-byte response to CMD_READ_DEVICE_MODE
    pub fn parse(status_buf: &[u8], mode_buf: &[u8]) -> Result<Self> {
        if status_buf.len() <= OFFSET_TEMP || mode_buf.len() <= OFFSET_PUMP_MODE {
            return Err(WaterforceError::InvalidResponse {
                message: format!(
                    "Response too short: status {} bytes, mode {} bytes",
                    status_buf.len(),
                    mode_buf.len()
                ),
            });
        }

        if !(status_buf[0] == CMD_PREFIX && status_buf[1] == CMD_READ_DEVICE_STATUS) {
            warn!(
                "unexpected status response header [{:#04x}, {:#04x}], decoding anyway",
                status_buf[0], status_buf[1]
            );
        }

        let fan_rpm = u16::from_le_bytes([status_buf[OFFSET_FAN_RPM_LO], status_buf[OFFSET_FAN_RPM_HI]]);
        let pump_rpm =
            u16::from_le_bytes([status_buf[OFFSET_PUMP_RPM_LO], status_buf[OFFSET_PUMP_RPM_HI]]);

        Ok(DeviceStatus {
            liquid_temp_c: status_buf[OFFSET_TEMP],
            fan_rpm,
            pump_rpm,
            fan_duty: status_buf[OFFSET_FAN_DUTY],
            pump_duty: status_buf[OFFSET_PUMP_DUTY],
            fan_mode: CoolingMode::from_code(mode_buf[OFFSET_FAN_MODE]),
            pump_mode: CoolingMode::from_code(mode_buf[OFFSET_PUMP_MODE]),
        })
    }

    /// Render as the seven-field report, in fixed order.
    pub fn to_report(&self) -> StatusReport {
        let mode_value = |mode: Option<CoolingMode>| match mode {
            Some(m) => FieldValue::Text(m.name().to_string()),
            None => FieldValue::Absent,
        };

        StatusReport(vec![
            StatusField::new(
                STATUS_TEMPERATURE,
                FieldValue::Int(self.liquid_temp_c as u16),
                "°C",
            ),
            StatusField::new(STATUS_FAN_SPEED, FieldValue::Int(self.fan_rpm), "rpm"),
            StatusField::new(STATUS_PUMP_SPEED, FieldValue::Int(self.pump_rpm), "rpm"),
            StatusField::new(STATUS_FAN_DUTY, FieldValue::Int(self.fan_duty as u16), "%"),
            StatusField::new(STATUS_PUMP_DUTY, FieldValue::Int(self.pump_duty as u16), "%"),
            StatusField::new(STATUS_FAN_MODE, mode_value(self.fan_mode), ""),
            StatusField::new(STATUS_PUMP_MODE, mode_value(self.pump_mode), ""),
        ])
    }
}

// =============================================================================
// Firmware Version
// =============================================================================

/// Firmware version, e.g. F1.4.
///
/// Major and minor are raw unsigned bytes, not BCD: a minor byte of 14
/// means "14", so F1.14 sorts after F1.9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl FirmwareVersion {
    /// Parse a firmware version response (0xD6).
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() <= OFFSET_FW_MINOR {
            return Err(WaterforceError::InvalidResponse {
                message: format!("Firmware response too short: {} bytes", buf.len()),
            });
        }

        Ok(FirmwareVersion {
            major: buf[OFFSET_FW_MAJOR],
            minor: buf[OFFSET_FW_MINOR],
        })
    }

    /// Whether this firmware allows the extended pump RPM range.
    ///
    /// The vendor tool compares `major * 10 + minor` against 13, i.e. F1.4
    /// and later qualify. Kept as-is even though a raw minor byte above 9
    /// skews the comparison; see DESIGN.md.
    pub const fn allows_high_pump_rpm(&self) -> bool {
        self.major as u16 * 10 + self.minor as u16 > 13
    }

    /// The pump RPM limit imposed by this firmware.
    pub const fn pump_rpm_limit(&self) -> u16 {
        if self.allows_high_pump_rpm() {
            PUMP_MAX_RPM_EXTENDED
        } else {
            PUMP_MAX_RPM
        }
    }
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{}.{}", self.major, self.minor)
    }
}

// =============================================================================
// Model Variant
// =============================================================================

/// Physical WATERFORCE X model behind the shared 0x7A4D USB identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    X240,
    X280,
    X360,
}

impl ModelVariant {
    /// Look up a variant by the code at offset 2 of the 0xDE response.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ModelVariant::X240),
            1 => Some(ModelVariant::X280),
            2 => Some(ModelVariant::X360),
            _ => None,
        }
    }

    /// Parse a variant response (0xDE). Unknown codes yield `None`.
    pub fn parse(buf: &[u8]) -> Result<Option<Self>> {
        if buf.len() <= OFFSET_VARIANT {
            return Err(WaterforceError::InvalidResponse {
                message: format!("Variant response too short: {} bytes", buf.len()),
            });
        }
        Ok(Self::from_code(buf[OFFSET_VARIANT]))
    }

    /// Full marketing name of the model.
    pub const fn name(&self) -> &'static str {
        match self {
            ModelVariant::X240 => "WATERFORCE X 240",
            ModelVariant::X280 => "WATERFORCE X 280",
            ModelVariant::X360 => "WATERFORCE X 360",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
