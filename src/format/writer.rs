//! Chunk encoder, the writing half of the log format.
//!
//! The firmware is the normal producer of log streams; this writer exists to
//! build fixtures, repack captures and verify that decoding is lossless.

use crate::format::chunk::{BaroSample, Chunk, ChunkTag, GpsReading, ImuSample, PowerSample};
use std::io::{self, Write};

/// Encodes chunks in the logger's wire layout.
pub struct LogWriter<W> {
    sink: W,
}

impl<W: Write> LogWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_stream_header(&mut self) -> io::Result<()> {
        self.sink.write_all(&[ChunkTag::StreamHeader.as_u8()])
    }

    pub fn write_timestamp(&mut self, t: i32) -> io::Result<()> {
        let mut buf = [0u8; 5];
        buf[0] = ChunkTag::TimestampMarker.as_u8();
        buf[1..5].copy_from_slice(&t.to_le_bytes());
        self.sink.write_all(&buf)
    }

    pub fn write_imu(&mut self, sample: &ImuSample) -> io::Result<()> {
        let mut buf = [0u8; 37];
        buf[0] = ChunkTag::Imu.as_u8();
        let fields = sample
            .accel
            .iter()
            .chain(&sample.gyro)
            .chain(&sample.mag);
        for (k, v) in fields.enumerate() {
            buf[1 + k * 4..5 + k * 4].copy_from_slice(&v.to_le_bytes());
        }
        self.sink.write_all(&buf)
    }

    pub fn write_gps(&mut self, reading: &GpsReading) -> io::Result<()> {
        let mut buf = [0u8; 14];
        buf[0] = ChunkTag::Gps.as_u8();
        buf[1] = reading.fix_valid as u8;
        buf[2..6].copy_from_slice(&reading.latitude.to_le_bytes());
        buf[6..10].copy_from_slice(&reading.longitude.to_le_bytes());
        buf[10..14].copy_from_slice(&reading.extra.to_le_bytes());
        self.sink.write_all(&buf)
    }

    pub fn write_power(&mut self, sample: &PowerSample) -> io::Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = ChunkTag::Power.as_u8();
        buf[1..5].copy_from_slice(&sample.battery.to_le_bytes());
        buf[5..9].copy_from_slice(&sample.current.to_le_bytes());
        self.sink.write_all(&buf)
    }

    pub fn write_baro(&mut self, sample: &BaroSample) -> io::Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = ChunkTag::Baro.as_u8();
        buf[1..5].copy_from_slice(&sample.aux.to_le_bytes());
        buf[5..9].copy_from_slice(&sample.pressure.to_le_bytes());
        self.sink.write_all(&buf)
    }

    /// Encode any decoded chunk back to its wire form.
    pub fn write_chunk(&mut self, chunk: &Chunk) -> io::Result<()> {
        match chunk {
            Chunk::StreamHeader => self.write_stream_header(),
            Chunk::Timestamp(t) => self.write_timestamp(*t),
            Chunk::Imu(s) => self.write_imu(s),
            Chunk::Gps(r) => self.write_gps(r),
            Chunk::Power(s) => self.write_power(s),
            Chunk::Baro(s) => self.write_baro(s),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consume the writer and hand back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
