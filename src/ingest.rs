//! Single-pass ingest driver: byte stream in, hour-bucketed timeline out.

use crate::error::{Error, Result};
use crate::format::{Chunk, ChunkDecoder, ChunkTag};
use crate::timeline::{StreamCursor, Timeline};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Why decoding stopped before a clean end of stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// Tag byte outside the closed set
    UnrecognizedTag { tag: u8, offset: u64 },
    /// Stream ended inside a fixed-size payload
    TruncatedPayload { tag: ChunkTag, offset: u64 },
}

/// Counters accumulated over one ingest pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub headers: u64,
    pub markers: u64,
    pub imu: u64,
    pub gps: u64,
    pub power: u64,
    pub baro: u64,
    /// Samples decoded before the first timestamp marker and dropped
    pub orphans: u64,
    /// Bytes consumed, including any partially read trailing chunk
    pub bytes_read: u64,
    /// Set when decoding stopped on a malformed stream; everything decoded
    /// before the halt is still in the timeline
    pub halt: Option<HaltReason>,
}

impl IngestStats {
    /// Total chunks decoded, all kinds.
    pub fn chunks(&self) -> u64 {
        self.headers + self.markers + self.imu + self.gps + self.power + self.baro
    }

    fn count(&mut self, tag: ChunkTag) {
        match tag {
            ChunkTag::StreamHeader => self.headers += 1,
            ChunkTag::TimestampMarker => self.markers += 1,
            ChunkTag::Imu => self.imu += 1,
            ChunkTag::Gps => self.gps += 1,
            ChunkTag::Power => self.power += 1,
            ChunkTag::Baro => self.baro += 1,
        }
    }
}

/// Everything one ingest pass produced.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub timeline: Timeline,
    pub stats: IngestStats,
}

/// Decode a whole byte stream into hour buckets.
///
/// Malformed streams do not fail the call: an unrecognized tag or truncated
/// payload stops the loop, is recorded in `stats.halt` and the partial
/// timeline is returned as valid data. Only genuine I/O failures propagate
/// as `Err`; end of input on a chunk boundary is the normal termination.
pub fn ingest_stream<R: Read>(source: R) -> Result<IngestOutcome> {
    let mut decoder = ChunkDecoder::new(source);
    let mut cursor = StreamCursor::new();
    let mut timeline = Timeline::new();
    let mut stats = IngestStats::default();

    loop {
        let chunk = match decoder.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(Error::UnrecognizedTag { tag, offset }) => {
                log::warn!(
                    "unrecognized chunk tag 0x{:02X} at offset {}, stopping after {} chunks",
                    tag,
                    offset,
                    stats.chunks()
                );
                stats.halt = Some(HaltReason::UnrecognizedTag { tag, offset });
                break;
            }
            Err(Error::TruncatedPayload { tag, offset, .. }) => {
                log::warn!(
                    "truncated {} payload at offset {}, stopping after {} chunks",
                    tag,
                    offset,
                    stats.chunks()
                );
                stats.halt = Some(HaltReason::TruncatedPayload { tag, offset });
                break;
            }
            Err(e) => return Err(e),
        };

        stats.count(chunk.tag());
        match chunk {
            Chunk::StreamHeader => {
                log::info!("new log stream detected");
            }
            Chunk::Timestamp(t) => {
                let t = i64::from(t);
                let hour = cursor.observe_marker(t);
                timeline.bucket_for_marker(hour, t);
            }
            sample_chunk => {
                if let Some(sample) = sample_chunk.to_sample() {
                    match cursor.position() {
                        Some((timestamp, hour)) => timeline.append(hour, timestamp, sample),
                        None => {
                            stats.orphans += 1;
                            log::debug!(
                                "dropping orphan {} before first timestamp marker",
                                sample_chunk.tag()
                            );
                        }
                    }
                }
            }
        }
    }

    stats.bytes_read = decoder.offset();
    log::debug!(
        "ingest finished: {} bytes, {} chunks, {} buckets",
        stats.bytes_read,
        stats.chunks(),
        timeline.len()
    );
    Ok(IngestOutcome { timeline, stats })
}

/// Ingest one log file from disk.
pub fn ingest_file<P: AsRef<Path>>(path: P) -> Result<IngestOutcome> {
    let file = File::open(path.as_ref())?;
    ingest_stream(BufReader::new(file))
}
