use thiserror::Error;
use tracing::{debug, error};

/// Malformed input handed to one of the frame decoders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Frame too short for header: {len} bytes")]
    ShortHeader { len: usize },

    #[error("Invalid frame magic: {found:?}")]
    BadMagic { found: [u8; 8] },

    #[error("Unsupported frame version: {0}")]
    UnsupportedVersion(u16),

    #[error("Frame header CRC mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    HeaderCrcMismatch { stored: u32, computed: u32 },

    #[error("Unknown frame flags: {0:#06x}")]
    UnknownFlags(u16),

    #[error("Unexpected end of frame at offset {pos} (needed {needed} bytes, {remaining} left)")]
    UnexpectedEof {
        pos: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Field length {len} exceeds limit {limit}")]
    FieldTooLarge { len: u64, limit: usize },

    #[error("Invalid UTF-8 in frame field: {0}")]
    Utf8(String),

    #[error("Invalid empty-flag byte: {0}")]
    BadEmptyFlag(u8),

    #[error("Empty flag set on a state holding {buffer_len} buffered bytes")]
    EmptyFlagWithContent { buffer_len: usize },

    #[error("Group key has {found} parts, expected {expected}")]
    KeyArity { expected: usize, found: usize },

    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),
}

/// Errors surfaced to the host driving the aggregate.
#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("State frame decode failed: {0}")]
    Format(#[from] FormatError),

    #[error("Field '{field}' must be a string or null, found {found}")]
    NonString { field: String, found: String },
}

impl ConcatError {
    pub fn log_error(&self) {
        match self {
            ConcatError::Format(e) => {
                error!("State frame decode failed: {}", e);
                debug!("State frame error details: {:?}", e);
            }
            ConcatError::NonString { field, found } => {
                error!("Non-string input for field '{}'", field);
                debug!("Rejected value for field '{}': {}", field, found);
            }
        }
    }
}
