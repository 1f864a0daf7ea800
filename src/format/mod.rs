//! OpenIMU binary log format.
//!
//! A log file is a flat sequence of chunks with no framing, checksums or
//! length prefixes. Each chunk is one ASCII tag byte followed by a payload
//! whose size is fixed by the tag:
//!
//! | tag   | meaning          | payload                          |
//! |-------|------------------|----------------------------------|
//! | `'h'` | stream header    | none                             |
//! | `'t'` | timestamp marker | `i32` seconds since epoch        |
//! | `'i'` | inertial sample  | 9 x `f32` (accel, gyro, mag)     |
//! | `'g'` | GPS sample       | `u8` flag + 3 x `f32`            |
//! | `'p'` | power sample     | 2 x `f32` (battery V, current A) |
//! | `'b'` | barometer sample | 2 x `f32`                        |
//!
//! Multi-byte fields are little-endian and packed without padding.

pub mod chunk;
pub mod decoder;
pub mod writer;

pub use chunk::{
    BaroSample, Chunk, ChunkTag, GpsReading, GpsSample, ImuSample, PowerSample, SensorSample,
};
pub use decoder::ChunkDecoder;
pub use writer::LogWriter;
