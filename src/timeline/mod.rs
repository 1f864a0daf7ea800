//! Hour-bucketed aggregation and time reconstruction.
//!
//! Samples carry no per-sample clock on the wire; only timestamp markers do.
//! This module tracks the marker context ([`cursor::StreamCursor`]), groups
//! samples into per-hour, per-sensor buffers ([`bucket`]) and spreads each
//! buffer's samples evenly over its observed window ([`reconstruct`]).

pub mod bucket;
pub mod cursor;
pub mod reconstruct;

pub use bucket::{hour_floor, HourBucket, SampleGroup, Timeline, HOUR_SECS};
pub use cursor::StreamCursor;
