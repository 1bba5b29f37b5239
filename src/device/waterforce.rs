//! AORUS WATERFORCE device implementation.
//!
//! High-level interface for communicating with WATERFORCE X/XG/EX coolers.
//! The session is generic over a [`Transport`] so the protocol logic can be
//! exercised without hardware; `hidapi::HidDevice` is the real transport.

use hidapi::{HidApi, HidDevice};

use crate::error::{Result, WaterforceError};
use crate::protocol::{
    CMD_READ_DEVICE_MODE, CMD_READ_DEVICE_STATUS, CMD_READ_DEVICE_VARIANT, CMD_READ_FIRMWARE_VER,
    Channel, DeviceStatus, FieldValue, FirmwareVersion, GIGABYTE_VID, HID_REPORT_LENGTH,
    ModelVariant, PUMP_MAX_RPM, STATUS_FIRMWARE_VER, STATUS_VARIANT, StatusField, StatusReport,
    WATERFORCE_EX_PID, WATERFORCE_X_PID, WATERFORCE_XG_PID, build_command, build_fixed_speed_cmd,
};

// =============================================================================
// Transport
// =============================================================================

/// Fixed-report-size bidirectional channel to the cooler.
///
/// One call maps to exactly one HID report in either direction; the session
/// never retries or buffers across calls. Reads block until the transport
/// returns data or fails.
pub trait Transport {
    /// Write one report.
    fn write_report(&mut self, buf: &[u8]) -> Result<()>;

    /// Read one report into `buf`.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<()>;
}

impl Transport for HidDevice {
    fn write_report(&mut self, buf: &[u8]) -> Result<()> {
        self.write(buf).map_err(WaterforceError::HidError)?;
        Ok(())
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read(buf).map_err(WaterforceError::HidError)?;
        Ok(())
    }
}

// =============================================================================
// Device Kind
// =============================================================================

/// USB identity of a connected WATERFORCE cooler.
///
/// The plain X identity is ambiguous: three physical models share the PID
/// and are told apart by a runtime variant query during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// WATERFORCE X (240, 280 or 360) - shared PID, variant query needed.
    WaterforceX,
    /// WATERFORCE X 360G.
    WaterforceXg,
    /// WATERFORCE EX 360.
    WaterforceEx,
}

impl DeviceKind {
    /// Map a Gigabyte product ID to a device kind.
    pub const fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            WATERFORCE_X_PID => Some(DeviceKind::WaterforceX),
            WATERFORCE_XG_PID => Some(DeviceKind::WaterforceXg),
            WATERFORCE_EX_PID => Some(DeviceKind::WaterforceEx),
            _ => None,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            DeviceKind::WaterforceX => "AORUS WATERFORCE X (240, 280 or 360)",
            DeviceKind::WaterforceXg => "AORUS WATERFORCE X 360G",
            DeviceKind::WaterforceEx => "AORUS WATERFORCE EX 360",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Waterforce
// =============================================================================

/// AORUS WATERFORCE device handle.
///
/// Provides methods for reading status and controlling fan/pump speeds.
/// Single-threaded, synchronous: every operation is at most one write
/// followed by at most one read.
///
/// # Example
///
/// ```no_run
/// use waterforce_rust_devices::device::Waterforce;
/// use waterforce_rust_devices::protocol::Channel;
///
/// let mut cooler = Waterforce::open()?;
/// let info = cooler.initialize()?;
/// print!("{}", info);
///
/// let status = cooler.get_status()?;
/// print!("{}", status);
///
/// cooler.set_fixed_speed(Channel::Fan, 50)?;
/// # Ok::<(), waterforce_rust_devices::error::WaterforceError>(())
/// ```
pub struct Waterforce<T: Transport = HidDevice> {
    transport: T,
    kind: DeviceKind,
    firmware: Option<FirmwareVersion>,
    /// Pump RPM ceiling for this session. Written once during
    /// `initialize`, read by the speed encoder.
    max_pump_rpm: u16,
}

impl Waterforce<HidDevice> {
    /// Open the first available WATERFORCE cooler.
    ///
    /// # Errors
    /// Returns `DeviceNotFound` if no supported cooler is connected.
    pub fn open() -> Result<Self> {
        let api = HidApi::new().map_err(WaterforceError::HidError)?;

        for info in api.device_list() {
            if info.vendor_id() != GIGABYTE_VID {
                continue;
            }
            if let Some(kind) = DeviceKind::from_pid(info.product_id()) {
                let device = info.open_device(&api).map_err(WaterforceError::HidError)?;
                return Ok(Self::from_transport(device, kind));
            }
        }

        Err(WaterforceError::DeviceNotFound)
    }

    /// Open a WATERFORCE cooler by path.
    ///
    /// Useful when multiple coolers are connected.
    pub fn open_path(path: &std::ffi::CStr, kind: DeviceKind) -> Result<Self> {
        let api = HidApi::new().map_err(WaterforceError::HidError)?;
        let device = api.open_path(path).map_err(WaterforceError::HidError)?;

        Ok(Self::from_transport(device, kind))
    }

    /// List all connected WATERFORCE coolers.
    ///
    /// Returns a vector of (kind, path, serial_number) tuples.
    pub fn list_devices() -> Result<Vec<(DeviceKind, String, Option<String>)>> {
        let api = HidApi::new().map_err(WaterforceError::HidError)?;

        let devices: Vec<_> = api
            .device_list()
            .filter(|info| info.vendor_id() == GIGABYTE_VID)
            .filter_map(|info| {
                DeviceKind::from_pid(info.product_id()).map(|kind| {
                    (
                        kind,
                        info.path().to_string_lossy().into_owned(),
                        info.serial_number().map(String::from),
                    )
                })
            })
            .collect();

        Ok(devices)
    }
}

impl<T: Transport> Waterforce<T> {
    /// Wrap an already open transport.
    pub fn from_transport(transport: T, kind: DeviceKind) -> Self {
        Self {
            transport,
            kind,
            firmware: None,
            max_pump_rpm: PUMP_MAX_RPM,
        }
    }

    /// Initialize the device and the driver.
    ///
    /// Must be called after opening (or reconnecting) the device and before
    /// any control operations. Queries the model variant on the ambiguous X
    /// identity, reads the firmware version, and derives the session's pump
    /// RPM limit from it.
    ///
    /// # Returns
    /// A report of the resolved properties, sorted by property name.
    ///
    /// # Errors
    /// Any transport failure is fatal: the device must not be considered
    /// ready and no retry is attempted.
    pub fn initialize(&mut self) -> Result<StatusReport> {
        let mut fields = Vec::new();

        // Three WATERFORCE X models share the same USB identity but answer
        // a command that tells them apart.
        if self.kind == DeviceKind::WaterforceX {
            self.write_command(CMD_READ_DEVICE_VARIANT, &[])?;
            let msg = self.read_report()?;
            let variant = ModelVariant::parse(&msg)?;
            fields.push(StatusField::new(
                STATUS_VARIANT,
                match variant {
                    Some(v) => FieldValue::Text(v.name().to_string()),
                    None => FieldValue::Absent,
                },
                "",
            ));
        }

        // Firmware version determines the pump RPM ceiling.
        self.write_command(CMD_READ_FIRMWARE_VER, &[])?;
        let msg = self.read_report()?;
        let firmware = FirmwareVersion::parse(&msg)?;
        self.max_pump_rpm = firmware.pump_rpm_limit();
        self.firmware = Some(firmware);
        fields.push(StatusField::new(
            STATUS_FIRMWARE_VER,
            FieldValue::Text(firmware.to_string()),
            "",
        ));

        Ok(StatusReport(fields).sorted())
    }

    /// Get a status report.
    ///
    /// Two round trips: one for the current fan/pump modes, one for the
    /// cooling readings. Returns seven fields in fixed order.
    pub fn get_status(&mut self) -> Result<StatusReport> {
        self.write_command(CMD_READ_DEVICE_MODE, &[])?;
        let mode_msg = self.read_report()?;

        self.write_command(CMD_READ_DEVICE_STATUS, &[])?;
        let status_msg = self.read_report()?;

        let status = DeviceStatus::parse(&status_msg, &mode_msg)?;
        Ok(status.to_report())
    }

    /// Set a fixed fan or pump speed.
    ///
    /// Fire-and-forget: the protocol defines no acknowledgment for this
    /// opcode, and earlier firmware is suspected to ignore it outright, so
    /// callers must not assume the write changed device behavior.
    ///
    /// # Arguments
    /// * `channel` - The channel to set (Fan or Pump)
    /// * `duty` - Duty percentage; upper bound is the caller's responsibility
    pub fn set_fixed_speed(&mut self, channel: Channel, duty: u8) -> Result<()> {
        let cmd = build_fixed_speed_cmd(channel, duty, self.max_pump_rpm)?;
        self.transport.write_report(&cmd)
    }

    /// Set a fixed fan speed.
    pub fn set_fan_speed(&mut self, duty: u8) -> Result<()> {
        self.set_fixed_speed(Channel::Fan, duty)
    }

    /// Set a fixed pump speed.
    pub fn set_pump_speed(&mut self, duty: u8) -> Result<()> {
        self.set_fixed_speed(Channel::Pump, duty)
    }

    /// Apply a named speed profile to a channel.
    ///
    /// The vendor DLL carries a mode-write opcode for this, but it is
    /// incomplete and its channel/profile restrictions are unknown, so the
    /// driver refuses rather than attempt an undefined write.
    pub fn set_speed_profile(&mut self, _channel: Channel, _profile: &str) -> Result<()> {
        Err(WaterforceError::NotSupported)
    }

    /// Get the firmware version.
    ///
    /// Returns `None` if `initialize()` has not been called.
    pub fn firmware_version(&self) -> Option<FirmwareVersion> {
        self.firmware
    }

    /// The pump RPM ceiling currently in effect for this session.
    pub fn max_pump_rpm(&self) -> u16 {
        self.max_pump_rpm
    }

    /// The USB identity this session was opened for.
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Build and send one command frame.
    fn write_command(&mut self, opcode: u8, payload: &[u8]) -> Result<()> {
        let cmd = build_command(opcode, payload)?;
        self.transport.write_report(&cmd)
    }

    /// Read exactly one report. No interpretation happens here.
    fn read_report(&mut self) -> Result<[u8; HID_REPORT_LENGTH]> {
        let mut buf = [0u8; HID_REPORT_LENGTH];
        self.transport.read_report(&mut buf)?;
        Ok(buf)
    }
}

impl<T: Transport> std::fmt::Debug for Waterforce<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waterforce")
            .field("kind", &self.kind)
            .field("firmware", &self.firmware)
            .field("max_pump_rpm", &self.max_pump_rpm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        CMD_PREFIX, CMD_WRITE_FANPUMP_SPEED, PUMP_MAX_RPM_EXTENDED, STATUS_FAN_SPEED,
        STATUS_TEMPERATURE,
    };
    use std::collections::VecDeque;

    /// Canned transport: records writes, replays queued responses.
    struct MockTransport {
        responses: VecDeque<[u8; HID_REPORT_LENGTH]>,
        writes: Vec<Vec<u8>>,
        fail_reads: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                responses: VecDeque::new(),
                writes: Vec::new(),
                fail_reads: false,
            }
        }

        fn queue(&mut self, opcode: u8, patch: &[(usize, u8)]) {
            let mut buf = [0u8; HID_REPORT_LENGTH];
            buf[0] = CMD_PREFIX;
            buf[1] = opcode;
            for &(offset, value) in patch {
                buf[offset] = value;
            }
            self.responses.push_back(buf);
        }
    }

    impl Transport for MockTransport {
        fn write_report(&mut self, buf: &[u8]) -> Result<()> {
            self.writes.push(buf.to_vec());
            Ok(())
        }

        fn read_report(&mut self, buf: &mut [u8]) -> Result<()> {
            if self.fail_reads {
                return Err(WaterforceError::InvalidResponse {
                    message: "simulated transport failure".into(),
                });
            }
            let msg = self.responses.pop_front().expect("no queued response");
            buf.copy_from_slice(&msg);
            Ok(())
        }
    }

    fn session(kind: DeviceKind) -> Waterforce<MockTransport> {
        Waterforce::from_transport(MockTransport::new(), kind)
    }

    #[test]
    fn test_initialize_ambiguous_kind_queries_variant() {
        let mut cooler = session(DeviceKind::WaterforceX);
        cooler.transport.queue(CMD_READ_DEVICE_VARIANT, &[(2, 1)]);
        cooler.transport.queue(CMD_READ_FIRMWARE_VER, &[(2, 1), (3, 4)]);

        let report = cooler.initialize().unwrap();

        // Sorted by property name: firmware before variant.
        assert_eq!(report.fields()[0].property, STATUS_FIRMWARE_VER);
        assert_eq!(
            report.fields()[0].value,
            FieldValue::Text("F1.4".to_string())
        );
        assert_eq!(report.fields()[1].property, STATUS_VARIANT);
        assert_eq!(
            report.fields()[1].value,
            FieldValue::Text("WATERFORCE X 280".to_string())
        );

        // F1.4 unlocks the extended pump range.
        assert_eq!(cooler.max_pump_rpm(), PUMP_MAX_RPM_EXTENDED);

        // Two command frames, each 64 bytes with the protocol prefix.
        assert_eq!(cooler.transport.writes.len(), 2);
        assert_eq!(cooler.transport.writes[0][..2], [CMD_PREFIX, 0xDE]);
        assert_eq!(cooler.transport.writes[1][..2], [CMD_PREFIX, 0xD6]);
        assert!(cooler.transport.writes.iter().all(|w| w.len() == 64));
    }

    #[test]
    fn test_initialize_unambiguous_kind_skips_variant() {
        let mut cooler = session(DeviceKind::WaterforceEx);
        cooler.transport.queue(CMD_READ_FIRMWARE_VER, &[(2, 1), (3, 3)]);

        let report = cooler.initialize().unwrap();

        assert_eq!(report.fields().len(), 1);
        assert_eq!(report.fields()[0].property, STATUS_FIRMWARE_VER);
        assert_eq!(
            report.fields()[0].value,
            FieldValue::Text("F1.3".to_string())
        );
        // F1.3 keeps the default pump limit.
        assert_eq!(cooler.max_pump_rpm(), PUMP_MAX_RPM);
        assert_eq!(cooler.transport.writes.len(), 1);
    }

    #[test]
    fn test_initialize_unknown_variant_is_absent_not_fatal() {
        let mut cooler = session(DeviceKind::WaterforceX);
        cooler.transport.queue(CMD_READ_DEVICE_VARIANT, &[(2, 9)]);
        cooler.transport.queue(CMD_READ_FIRMWARE_VER, &[(2, 1), (3, 0)]);

        let report = cooler.initialize().unwrap();
        let variant = report
            .fields()
            .iter()
            .find(|f| f.property == STATUS_VARIANT)
            .unwrap();
        assert_eq!(variant.value, FieldValue::Absent);
    }

    #[test]
    fn test_initialize_transport_failure_is_fatal() {
        let mut cooler = session(DeviceKind::WaterforceXg);
        cooler.transport.fail_reads = true;

        assert!(cooler.initialize().is_err());
        assert_eq!(cooler.firmware_version(), None);
        assert_eq!(cooler.max_pump_rpm(), PUMP_MAX_RPM);
    }

    #[test]
    fn test_get_status_two_round_trips_fixed_order() {
        let mut cooler = session(DeviceKind::WaterforceXg);
        cooler.transport.queue(CMD_READ_DEVICE_MODE, &[(2, 0x6), (3, 0x0)]);
        cooler.transport.queue(
            CMD_READ_DEVICE_STATUS,
            &[(2, 0xE8), (3, 0x03), (5, 0xC4), (6, 0x09), (8, 40), (9, 75), (13, 30)],
        );

        let report = cooler.get_status().unwrap();

        assert_eq!(report.fields().len(), 7);
        assert_eq!(report.fields()[0].property, STATUS_TEMPERATURE);
        assert_eq!(report.fields()[0].value, FieldValue::Int(30));
        assert_eq!(report.fields()[1].property, STATUS_FAN_SPEED);
        assert_eq!(report.fields()[1].value, FieldValue::Int(1000));

        // Mode query goes out before the status query.
        assert_eq!(cooler.transport.writes[0][1], CMD_READ_DEVICE_MODE);
        assert_eq!(cooler.transport.writes[1][1], CMD_READ_DEVICE_STATUS);
    }

    #[test]
    fn test_set_fixed_speed_writes_without_reading() {
        let mut cooler = session(DeviceKind::WaterforceXg);
        // No responses queued at all: a solicited read would panic the mock.
        cooler.set_fixed_speed(Channel::Fan, 60).unwrap();

        assert_eq!(cooler.transport.writes.len(), 1);
        let frame = &cooler.transport.writes[0];
        assert_eq!(frame.len(), HID_REPORT_LENGTH);
        assert_eq!(frame[0], CMD_PREFIX);
        assert_eq!(frame[1], CMD_WRITE_FANPUMP_SPEED);
        assert_eq!(frame[2], 0x1);
        assert_eq!(frame[3], 60);
    }

    #[test]
    fn test_set_pump_speed_uses_session_limit() {
        let mut cooler = session(DeviceKind::WaterforceX);
        cooler.transport.queue(CMD_READ_DEVICE_VARIANT, &[(2, 2)]);
        cooler.transport.queue(CMD_READ_FIRMWARE_VER, &[(2, 1), (3, 4)]);
        cooler.initialize().unwrap();

        // 20% of 3200 = 640 RPM, under the 750 floor: duty byte collapses
        // to 0 per the vendor arithmetic.
        cooler.set_pump_speed(20).unwrap();
        let frame = cooler.transport.writes.last().unwrap();
        assert_eq!(frame[2], 0x2);
        assert_eq!(frame[3], 0);

        // 30% of 3200 = 960 RPM, above the floor: duty passes through.
        cooler.set_pump_speed(30).unwrap();
        let frame = cooler.transport.writes.last().unwrap();
        assert_eq!(frame[3], 30);
    }

    #[test]
    fn test_speed_profile_not_supported() {
        let mut cooler = session(DeviceKind::WaterforceEx);
        assert!(matches!(
            cooler.set_speed_profile(Channel::Fan, "quiet"),
            Err(WaterforceError::NotSupported)
        ));
    }

    #[test]
    fn test_device_kind_from_pid() {
        assert_eq!(DeviceKind::from_pid(0x7A4D), Some(DeviceKind::WaterforceX));
        assert_eq!(DeviceKind::from_pid(0x7A52), Some(DeviceKind::WaterforceXg));
        assert_eq!(DeviceKind::from_pid(0x7A53), Some(DeviceKind::WaterforceEx));
        assert_eq!(DeviceKind::from_pid(0x3008), None);
    }
}
