//! Length-prefixed buffer fields
//!
//! Every payload field travels as a little-endian `u32` length followed by
//! exactly that many raw bytes.

use crate::buffer::SizedBuffer;
use crate::error::MessageError;

/// Size of the length prefix in front of every field
pub const FIELD_PREFIX_LEN: usize = 4;

/// Read position over an untrusted byte slice
///
/// All reads are bounds-checked against the slice. Nothing here can index past
/// the end, whatever lengths the input declares.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Start reading at the beginning of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left between the position and the end
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], MessageError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(MessageError::Truncated {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read a little-endian `u32`
    pub fn read_u32(&mut self) -> Result<u32, MessageError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Serialized size of `buffer` as a field
pub fn field_size(buffer: &SizedBuffer) -> usize {
    FIELD_PREFIX_LEN + buffer.len()
}

/// Append `buffer` as a length-prefixed field
///
/// Fails only when the buffer is too long for a `u32` prefix.
pub fn write_field(out: &mut Vec<u8>, buffer: &SizedBuffer) -> Result<(), MessageError> {
    let len =
        u32::try_from(buffer.len()).map_err(|_| MessageError::FieldTooLarge(buffer.len()))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(buffer.as_slice());
    Ok(())
}

/// Read one length-prefixed field into a fresh buffer
///
/// The prefix check is strict: with `FIELD_PREFIX_LEN` bytes or fewer left the
/// field is rejected, so a zero-length field cannot be the last bytes of a
/// message. A declared length larger than what follows the prefix is rejected
/// before anything is allocated.
pub fn read_field(cursor: &mut Cursor<'_>) -> Result<SizedBuffer, MessageError> {
    let remaining = cursor.remaining();
    if remaining <= FIELD_PREFIX_LEN {
        return Err(MessageError::Truncated {
            needed: FIELD_PREFIX_LEN + 1,
            remaining,
        });
    }

    let declared = cursor.read_u32()?;
    let remaining = cursor.remaining();
    let len = usize::try_from(declared).map_err(|_| MessageError::FieldOverrun {
        declared,
        remaining,
    })?;
    if len > remaining {
        return Err(MessageError::FieldOverrun {
            declared,
            remaining,
        });
    }

    Ok(SizedBuffer::from_slice(cursor.take(len)?))
}
