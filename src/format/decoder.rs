//! Streaming chunk decoder.

use crate::error::{Error, Result};
use crate::format::chunk::{BaroSample, Chunk, ChunkTag, GpsReading, ImuSample, PowerSample};
use std::io::{ErrorKind, Read};

/// Largest payload in the tag table (9 x f32 inertial sample).
const MAX_PAYLOAD: usize = 36;

/// Decodes chunks from any forward-only byte source.
///
/// End of input on a tag boundary is the normal termination and yields
/// `Ok(None)`. End of input inside a payload is [`Error::TruncatedPayload`],
/// and a byte outside the tag set is [`Error::UnrecognizedTag`]; both are
/// unrecoverable for the rest of the stream because chunk boundaries cannot
/// be resynced without framing.
pub struct ChunkDecoder<R> {
    source: R,
    offset: u64,
}

impl<R: Read> ChunkDecoder<R> {
    pub fn new(source: R) -> Self {
        Self { source, offset: 0 }
    }

    /// Bytes consumed so far, including any partially read trailing chunk.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next chunk. `Ok(None)` means the stream ended cleanly.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut tag_byte = [0u8; 1];
        match self.source.read_exact(&mut tag_byte) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        }
        let tag_offset = self.offset;
        self.offset += 1;

        let tag = ChunkTag::from_u8(tag_byte[0]).ok_or(Error::UnrecognizedTag {
            tag: tag_byte[0],
            offset: tag_offset,
        })?;

        let mut payload = [0u8; MAX_PAYLOAD];
        let len = tag.payload_len();
        if len > 0 {
            self.source.read_exact(&mut payload[..len]).map_err(|e| {
                if e.kind() == ErrorKind::UnexpectedEof {
                    Error::TruncatedPayload {
                        tag,
                        expected: len,
                        offset: self.offset,
                    }
                } else {
                    Error::Io(e)
                }
            })?;
            self.offset += len as u64;
        }
        let p = &payload[..len];

        let chunk = match tag {
            ChunkTag::StreamHeader => Chunk::StreamHeader,
            ChunkTag::TimestampMarker => {
                Chunk::Timestamp(i32::from_le_bytes([p[0], p[1], p[2], p[3]]))
            }
            ChunkTag::Imu => Chunk::Imu(decode_imu(p)),
            ChunkTag::Gps => Chunk::Gps(decode_gps(p)),
            ChunkTag::Power => Chunk::Power(PowerSample {
                battery: f32_at(p, 0),
                current: f32_at(p, 4),
            }),
            ChunkTag::Baro => Chunk::Baro(BaroSample {
                aux: f32_at(p, 0),
                pressure: f32_at(p, 4),
            }),
        };
        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkDecoder<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn f32_at(p: &[u8], i: usize) -> f32 {
    f32::from_le_bytes([p[i], p[i + 1], p[i + 2], p[i + 3]])
}

fn decode_imu(p: &[u8]) -> ImuSample {
    let mut v = [0f32; 9];
    for (k, slot) in v.iter_mut().enumerate() {
        *slot = f32_at(p, k * 4);
    }
    ImuSample {
        accel: [v[0], v[1], v[2]],
        gyro: [v[3], v[4], v[5]],
        mag: [v[6], v[7], v[8]],
    }
}

fn decode_gps(p: &[u8]) -> GpsReading {
    GpsReading {
        fix_valid: p[0] != 0,
        latitude: f32_at(p, 1),
        longitude: f32_at(p, 5),
        extra: f32_at(p, 9),
    }
}
