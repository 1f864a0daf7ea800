//! Chunk tags and decoded record types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of chunk tags emitted by the logger firmware.
///
/// The discriminants are the wire bytes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkTag {
    /// Marks the start of a logging session within the file
    StreamHeader = b'h',
    /// Absolute wall-clock timestamp, in effect until the next marker
    TimestampMarker = b't',
    /// 9-axis inertial sample
    Imu = b'i',
    /// GPS fix sample
    Gps = b'g',
    /// Battery voltage and current draw
    Power = b'p',
    /// Barometric pressure sample
    Baro = b'b',
}

impl ChunkTag {
    /// Parse a tag from its wire byte. Returns `None` for bytes outside the
    /// closed set; the caller decides how fatal that is.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'h' => Some(ChunkTag::StreamHeader),
            b't' => Some(ChunkTag::TimestampMarker),
            b'i' => Some(ChunkTag::Imu),
            b'g' => Some(ChunkTag::Gps),
            b'p' => Some(ChunkTag::Power),
            b'b' => Some(ChunkTag::Baro),
            _ => None,
        }
    }

    /// Wire byte for this tag.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Fixed payload size in bytes. Chunk boundaries are recoverable from
    /// this table alone, so decoding never needs lookahead.
    pub fn payload_len(self) -> usize {
        match self {
            ChunkTag::StreamHeader => 0,
            ChunkTag::TimestampMarker => 4,
            ChunkTag::Imu => 36,
            ChunkTag::Gps => 13,
            ChunkTag::Power => 8,
            ChunkTag::Baro => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChunkTag::StreamHeader => "stream-header",
            ChunkTag::TimestampMarker => "timestamp-marker",
            ChunkTag::Imu => "imu-sample",
            ChunkTag::Gps => "gps-sample",
            ChunkTag::Power => "power-sample",
            ChunkTag::Baro => "barometer-sample",
        }
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One 9-axis inertial sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// Acceleration (g)
    pub accel: [f32; 3],
    /// Angular velocity (deg/s)
    pub gyro: [f32; 3],
    /// Magnetic field (uT)
    pub mag: [f32; 3],
}

/// One GPS chunk exactly as decoded, fourth field included.
///
/// The firmware emits a fourth float after longitude. It is carried here so
/// re-encoding is lossless, but nothing downstream assigns it a meaning and
/// it is dropped when the reading is turned into a [`GpsSample`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsReading {
    /// Nonzero flag byte on the wire
    pub fix_valid: bool,
    /// Latitude (deg); NaN when the receiver had no fix
    pub latitude: f32,
    /// Longitude (deg); NaN when the receiver had no fix
    pub longitude: f32,
    /// Uninterpreted trailing field
    pub extra: f32,
}

impl GpsReading {
    /// Group-level view of this reading.
    pub fn to_sample(&self) -> GpsSample {
        GpsSample {
            fix_valid: self.fix_valid,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// One GPS sample as aggregated into hour buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsSample {
    pub fix_valid: bool,
    pub latitude: f32,
    pub longitude: f32,
}

/// One battery/current sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    /// Battery voltage (V)
    pub battery: f32,
    /// Current draw (A)
    pub current: f32,
}

/// One barometer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaroSample {
    /// First pressure-related field; not registered as a channel downstream
    pub aux: f32,
    /// Pressure (kPa)
    pub pressure: f32,
}

/// One decoded chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chunk {
    StreamHeader,
    /// Seconds since the Unix epoch, UTC
    Timestamp(i32),
    Imu(ImuSample),
    Gps(GpsReading),
    Power(PowerSample),
    Baro(BaroSample),
}

impl Chunk {
    pub fn tag(&self) -> ChunkTag {
        match self {
            Chunk::StreamHeader => ChunkTag::StreamHeader,
            Chunk::Timestamp(_) => ChunkTag::TimestampMarker,
            Chunk::Imu(_) => ChunkTag::Imu,
            Chunk::Gps(_) => ChunkTag::Gps,
            Chunk::Power(_) => ChunkTag::Power,
            Chunk::Baro(_) => ChunkTag::Baro,
        }
    }

    /// Group-level sample carried by this chunk, or `None` for headers and
    /// timestamp markers.
    pub fn to_sample(&self) -> Option<SensorSample> {
        match self {
            Chunk::Imu(s) => Some(SensorSample::Imu(*s)),
            Chunk::Gps(r) => Some(SensorSample::Gps(r.to_sample())),
            Chunk::Power(s) => Some(SensorSample::Power(*s)),
            Chunk::Baro(s) => Some(SensorSample::Baro(*s)),
            Chunk::StreamHeader | Chunk::Timestamp(_) => None,
        }
    }
}

/// A sample destined for one of the four per-hour groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorSample {
    Imu(ImuSample),
    Gps(GpsSample),
    Power(PowerSample),
    Baro(BaroSample),
}
