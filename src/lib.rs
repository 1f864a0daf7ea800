//! OpenIMU log ingestion library.
//!
//! Decodes the binary log files written by the OpenIMU wearable logger and
//! turns them into per-sensor time series. The pipeline is a single pass:
//! [`format::ChunkDecoder`] yields tagged chunks, [`ingest::ingest_stream`]
//! threads the timestamp context through them and fills per-hour sample
//! groups, and [`store::TimelineImporter`] hands the reconstructed series to
//! a [`store::SensorStore`] implementation.

pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod store;
pub mod timeline;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use ingest::{ingest_file, ingest_stream, IngestOutcome, IngestStats};
