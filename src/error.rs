//! Error types for the ingest pipeline.

use crate::format::ChunkTag;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding, importing or configuring.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O failure (not end-of-stream, which is a normal outcome)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag byte outside the closed tag set; the stream cannot be resynced
    #[error("unrecognized chunk tag 0x{tag:02X} at offset {offset}")]
    UnrecognizedTag { tag: u8, offset: u64 },

    /// Stream ended inside a fixed-size payload
    #[error("truncated {tag} payload at offset {offset}: expected {expected} bytes")]
    TruncatedPayload {
        tag: ChunkTag,
        expected: usize,
        offset: u64,
    },

    /// Configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Store document could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage collaborator failure
    #[error("store error: {0}")]
    Store(String),
}
