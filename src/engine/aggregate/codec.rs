use tracing::{debug, error};

use crate::engine::aggregate::concat::ConcatAggregator;
use crate::engine::errors::FormatError;
use crate::shared::config::AggregateConfig;
use crate::shared::frame_header::{BinaryHeader, FLAG_STRICT, FrameKind};

/// Knobs shared by the state and partial encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Carry `is_empty` explicitly instead of inferring it from the buffer length.
    pub strict: bool,
    /// Longest single string a decoder accepts.
    pub max_field_len: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_field_len: usize::MAX,
        }
    }
}

impl CodecOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &AggregateConfig) -> Self {
        Self {
            strict: cfg.strict_serialization,
            max_field_len: cfg.max_field_len,
        }
    }

    fn flags(&self) -> u16 {
        if self.strict { FLAG_STRICT } else { 0 }
    }
}

pub(crate) fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(bytes);
}

pub(crate) fn write_str(out: &mut Vec<u8>, s: &str) {
    write_bytes(out, s.as_bytes());
}

/// Bounds-checked cursor over an in-memory frame.
pub(crate) struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
    max_field_len: usize,
}

impl<'a> FrameReader<'a> {
    pub(crate) fn new(data: &'a [u8], max_field_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            max_field_len,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            error!(target: "group_concat::codec", pos = self.pos, needed = n, len = self.data.len(), "read out of bounds");
            return Err(FormatError::UnexpectedEof {
                pos: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64, FormatError> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    /// Reads a u64 element count that must fit the platform's `usize`.
    pub(crate) fn read_count(&mut self) -> Result<usize, FormatError> {
        let raw = self.read_u64()?;
        usize::try_from(raw).map_err(|_| FormatError::FieldTooLarge {
            len: raw,
            limit: usize::MAX,
        })
    }

    pub(crate) fn read_bytes(&mut self) -> Result<&'a [u8], FormatError> {
        let raw = self.read_u64()?;
        let len = match usize::try_from(raw) {
            Ok(len) if len <= self.max_field_len => len,
            _ => {
                error!(target: "group_concat::codec", len = raw, limit = self.max_field_len, "Field length too large");
                return Err(FormatError::FieldTooLarge {
                    len: raw,
                    limit: self.max_field_len,
                });
            }
        };
        self.take(len)
    }

    pub(crate) fn read_string(&mut self) -> Result<String, FormatError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            error!(target: "group_concat::codec", error = %e, "Invalid UTF-8 in string");
            FormatError::Utf8(e.to_string())
        })
    }

    pub(crate) fn finish(self) -> Result<(), FormatError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(FormatError::TrailingBytes(n)),
        }
    }
}

/// Writes one state frame: header, then `(delimiter, buffer)` each with a u64
/// length prefix, then the empty flag when strict.
pub fn encode_state(state: &ConcatAggregator, opts: &CodecOptions) -> Vec<u8> {
    let delimiter = state.delimiter();
    let buffer = state.buffer();
    let mut out =
        Vec::with_capacity(BinaryHeader::TOTAL_LEN + 16 + delimiter.len() + buffer.len() + 1);
    FrameKind::ConcatState.header(opts.flags()).write_to(&mut out);
    write_str(&mut out, delimiter);
    write_str(&mut out, buffer);
    if opts.strict {
        out.push(state.is_empty() as u8);
    }
    out
}

/// Reads a state frame. Without the strict flag, emptiness is inferred from
/// the buffer length, so a group holding only `""` comes back empty.
pub fn decode_state(data: &[u8], opts: &CodecOptions) -> Result<ConcatAggregator, FormatError> {
    let header = FrameKind::ConcatState.read_and_validate_header(data)?;
    let mut reader = FrameReader::new(data, opts.max_field_len);
    reader.skip(BinaryHeader::TOTAL_LEN)?;

    let delimiter = reader.read_string()?;
    let buffer = reader.read_string()?;
    let is_empty = if header.is_strict() {
        match reader.read_u8()? {
            0 => false,
            1 => true,
            other => return Err(FormatError::BadEmptyFlag(other)),
        }
    } else {
        buffer.is_empty()
    };
    reader.finish()?;

    if is_empty && !buffer.is_empty() {
        error!(target: "group_concat::codec", buffer_len = buffer.len(), "Empty flag set on non-empty buffer");
        return Err(FormatError::EmptyFlagWithContent {
            buffer_len: buffer.len(),
        });
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(
            target: "group_concat::codec",
            strict = header.is_strict(),
            delimiter_len = delimiter.len(),
            buffer_len = buffer.len(),
            is_empty,
            "Decoded concat state"
        );
    }
    Ok(ConcatAggregator::from_parts(delimiter, buffer, is_empty))
}

impl ConcatAggregator {
    pub fn serialize(&self, opts: &CodecOptions) -> Vec<u8> {
        encode_state(self, opts)
    }

    pub fn deserialize(data: &[u8], opts: &CodecOptions) -> Result<Self, FormatError> {
        decode_state(data, opts)
    }
}
