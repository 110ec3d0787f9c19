//! Frame encoding and decoding for the RS-485 link.
//!
//! Control frame (dashboard → controller, 11 bytes):
//! - FLAGS (9 bytes): one byte per button, 0 or 1, in wire order
//! - EOT (1 byte): 0x17 end-of-frame marker
//! - CHECKSUM (1 byte): checksum of the nine flag bytes
//!
//! Telemetry frame (controller → dashboard, 39 bytes):
//! - FIELDS (37 bytes): fixed-width fields, multi-byte values little-endian
//! - CHECKSUM (1 byte): checksum of the 37 field bytes
//! - EOT (1 byte): 0x17 end-of-frame marker

use crate::buttons::{ButtonState, WIRE_FLAG_COUNT};
use crate::checksum::Checksum;

/// End-of-frame marker byte
pub const EOT_BYTE: u8 = 0x17;

/// Start-of-frame byte
///
/// Reserved by the protocol but not sent by the current controller
/// firmware, so the receiver never checks for it.
pub const SOT_BYTE: u8 = 0x12;

/// Control frame length (flags + EOT + checksum)
pub const CONTROL_FRAME_LEN: usize = WIRE_FLAG_COUNT + 2;

/// Telemetry frame length (fields + checksum + EOT)
pub const TELEMETRY_FRAME_LEN: usize = TELEMETRY_PAYLOAD_LEN + 2;

/// Telemetry field bytes covered by the checksum
pub const TELEMETRY_PAYLOAD_LEN: usize = 37;

const CONTROL_EOT_INDEX: usize = WIRE_FLAG_COUNT;
const CONTROL_CHECKSUM_INDEX: usize = CONTROL_FRAME_LEN - 1;
const TELEMETRY_CHECKSUM_INDEX: usize = TELEMETRY_FRAME_LEN - 2;
const TELEMETRY_EOT_INDEX: usize = TELEMETRY_FRAME_LEN - 1;

/// Errors that can occur during frame decoding or assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte count does not match the fixed frame length
    InvalidLength,
    /// Last byte is not the EOT marker
    MissingMarker,
    /// Checksum byte does not match the computed checksum
    InvalidChecksum {
        /// Checksum carried by the frame
        received: u8,
        /// Checksum computed over the frame contents
        computed: u8,
    },
}

/// What to do with a frame whose checksum does not match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChecksumPolicy {
    /// Reject frames with a mismatching checksum
    #[default]
    Verify,
    /// Compute the checksum but accept the frame regardless
    Ignore,
}

impl ChecksumPolicy {
    /// Check `received` against the checksum of `covered`
    pub fn check<C: Checksum + ?Sized>(
        self,
        checksum: &C,
        covered: &[u8],
        received: u8,
    ) -> Result<(), FrameError> {
        let computed = checksum.checksum(covered);
        match self {
            ChecksumPolicy::Verify if computed != received => {
                Err(FrameError::InvalidChecksum { received, computed })
            }
            _ => Ok(()),
        }
    }
}

/// Encoded control frame, ready to be clocked out byte by byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFrame {
    bytes: [u8; CONTROL_FRAME_LEN],
}

impl ControlFrame {
    /// Encode the transmitted button flags into a frame
    pub fn encode<C: Checksum + ?Sized>(buttons: &ButtonState, checksum: &C) -> Self {
        let mut bytes = [0u8; CONTROL_FRAME_LEN];
        for (slot, flag) in bytes.iter_mut().zip(buttons.wire_flags()) {
            *slot = flag as u8;
        }
        bytes[CONTROL_EOT_INDEX] = EOT_BYTE;
        bytes[CONTROL_CHECKSUM_INDEX] = checksum.checksum(&bytes[..WIRE_FLAG_COUNT]);
        Self { bytes }
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8; CONTROL_FRAME_LEN] {
        &self.bytes
    }

    /// Decode a control frame back into button flags (for testing or simulation)
    ///
    /// Mode buttons are not transmitted and decode as released.
    pub fn decode<C: Checksum + ?Sized>(
        bytes: &[u8],
        checksum: &C,
        policy: ChecksumPolicy,
    ) -> Result<ButtonState, FrameError> {
        if bytes.len() != CONTROL_FRAME_LEN {
            return Err(FrameError::InvalidLength);
        }
        if bytes[CONTROL_EOT_INDEX] != EOT_BYTE {
            return Err(FrameError::MissingMarker);
        }
        policy.check(
            checksum,
            &bytes[..WIRE_FLAG_COUNT],
            bytes[CONTROL_CHECKSUM_INDEX],
        )?;

        let flag = |i: usize| bytes[i] != 0;
        Ok(ButtonState {
            half_gas: flag(0),
            full_gas: flag(1),
            horn: flag(2),
            speed_reset: flag(3),
            power_supply: flag(4),
            sc_close: flag(5),
            fuelcell_off: flag(6),
            fuelcell_prepare_to_race: flag(7),
            fuelcell_race: flag(8),
            ..Default::default()
        })
    }
}

/// Decoded telemetry from the main controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame {
    /// Instantaneous speed (km/h)
    pub speed: u8,
    /// Average speed (km/h)
    pub average_speed: u8,
    /// Lap time, minutes part
    pub lap_minutes: u16,
    /// Lap time, seconds part
    pub lap_seconds: u8,
    /// Lap time, milliseconds part
    pub lap_millis: u16,
    /// Fuel cell voltage (V)
    pub fc_voltage: f32,
    /// Fuel cell temperature (°C)
    pub fc_temperature: f32,
    /// Fuel cell fan speed (RPM)
    pub fc_fan_rpm: u16,
    /// Current from fuel cell to supercapacitor (A)
    pub current_fc_to_sc: f32,
    /// Current from supercapacitor to motor (A)
    pub current_sc_to_motor: f32,
    /// Fuel cell → supercap converter PWM duty
    pub fc_to_sc_pwm: u8,
    /// Motor PWM duty
    pub motor_pwm: u8,
    /// Supercapacitor voltage (V)
    pub sc_voltage: f32,
    /// Hydrogen sensor output voltage (V)
    pub h2_sensor_voltage: f32,
    /// Hydrogen leak digital output (1 = leak)
    pub h2_leak: u8,
    /// Emergency stop button (1 = pressed)
    pub emergency_button: u8,
}

impl TelemetryFrame {
    /// Hydrogen leak reported by the sensor
    pub fn leak_detected(&self) -> bool {
        self.h2_leak == 1
    }

    /// Emergency stop button pressed
    pub fn emergency_pressed(&self) -> bool {
        self.emergency_button == 1
    }

    /// Decode the field layout of a complete frame
    ///
    /// Checks only the EOT marker; see [`decode_checked`](Self::decode_checked)
    /// for checksum handling.
    pub fn decode(bytes: &[u8; TELEMETRY_FRAME_LEN]) -> Result<Self, FrameError> {
        if bytes[TELEMETRY_EOT_INDEX] != EOT_BYTE {
            return Err(FrameError::MissingMarker);
        }

        let mut r = FieldReader::new(&bytes[..TELEMETRY_PAYLOAD_LEN]);
        Ok(Self {
            speed: r.u8(),
            average_speed: r.u8(),
            lap_minutes: r.u16(),
            lap_seconds: r.u8(),
            lap_millis: r.u16(),
            fc_voltage: r.f32(),
            fc_temperature: r.f32(),
            fc_fan_rpm: r.u16(),
            current_fc_to_sc: r.f32(),
            current_sc_to_motor: r.f32(),
            fc_to_sc_pwm: r.u8(),
            motor_pwm: r.u8(),
            sc_voltage: r.f32(),
            h2_sensor_voltage: r.f32(),
            h2_leak: r.u8(),
            emergency_button: r.u8(),
        })
    }

    /// Decode a frame of unknown length
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FrameError> {
        let bytes: &[u8; TELEMETRY_FRAME_LEN] =
            bytes.try_into().map_err(|_| FrameError::InvalidLength)?;
        Self::decode(bytes)
    }

    /// Decode a frame, applying `policy` to the checksum byte
    pub fn decode_checked<C: Checksum + ?Sized>(
        bytes: &[u8; TELEMETRY_FRAME_LEN],
        checksum: &C,
        policy: ChecksumPolicy,
    ) -> Result<Self, FrameError> {
        if bytes[TELEMETRY_EOT_INDEX] != EOT_BYTE {
            return Err(FrameError::MissingMarker);
        }
        policy.check(
            checksum,
            &bytes[..TELEMETRY_PAYLOAD_LEN],
            bytes[TELEMETRY_CHECKSUM_INDEX],
        )?;
        Self::decode(bytes)
    }

    /// Encode into wire format (for testing or simulating the controller)
    pub fn encode<C: Checksum + ?Sized>(&self, checksum: &C) -> [u8; TELEMETRY_FRAME_LEN] {
        let mut bytes = [0u8; TELEMETRY_FRAME_LEN];
        let mut w = FieldWriter::new(&mut bytes[..TELEMETRY_PAYLOAD_LEN]);
        w.u8(self.speed);
        w.u8(self.average_speed);
        w.u16(self.lap_minutes);
        w.u8(self.lap_seconds);
        w.u16(self.lap_millis);
        w.f32(self.fc_voltage);
        w.f32(self.fc_temperature);
        w.u16(self.fc_fan_rpm);
        w.f32(self.current_fc_to_sc);
        w.f32(self.current_sc_to_motor);
        w.u8(self.fc_to_sc_pwm);
        w.u8(self.motor_pwm);
        w.f32(self.sc_voltage);
        w.f32(self.h2_sensor_voltage);
        w.u8(self.h2_leak);
        w.u8(self.emergency_button);

        bytes[TELEMETRY_CHECKSUM_INDEX] = checksum.checksum(&bytes[..TELEMETRY_PAYLOAD_LEN]);
        bytes[TELEMETRY_EOT_INDEX] = EOT_BYTE;
        bytes
    }
}

/// Sequential little-endian field reader over a fixed-size payload
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }
}

/// Sequential little-endian field writer
struct FieldWriter<'a> {
    bytes: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn put(&mut self, src: &[u8]) {
        self.bytes[self.pos..self.pos + src.len()].copy_from_slice(src);
        self.pos += src.len();
    }

    fn u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    fn u16(&mut self, value: u16) {
        self.put(&value.to_le_bytes());
    }

    fn f32(&mut self, value: f32) {
        self.put(&value.to_le_bytes());
    }
}
