//! Message envelope shared by every request and response

use crate::codec::Cursor;
use crate::error::MessageError;

/// Size of the status word
const STATUS_LEN: usize = 4;

/// Size of the status and user id words of a successful message
const ENVELOPE_LEN: usize = 8;

/// Result code carried in the first word of every message
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Success; user id and payload follow
    #[default]
    Ok = 0,
    /// Failure; nothing follows
    Invalid = 1,
}

impl Status {
    /// Map a wire value to a status
    ///
    /// Only zero means success. Any other value is treated as `Invalid`.
    pub fn from_wire(value: u32) -> Self {
        match value {
            0 => Self::Ok,
            _ => Self::Invalid,
        }
    }

    /// Wire value of this status
    pub fn to_wire(self) -> u32 {
        self as u32
    }

    /// True for `Status::Ok`
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// Status and user id common to every message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Result code
    pub status: Status,

    /// User the message is about; meaningless unless `status` is `Ok`
    pub user_id: u32,
}

impl Envelope {
    /// Successful envelope for `user_id`
    pub fn new(user_id: u32) -> Self {
        Self {
            status: Status::Ok,
            user_id,
        }
    }

    /// Error-only envelope
    pub fn error(status: Status) -> Self {
        Self { status, user_id: 0 }
    }
}

/// A message that can be written to and rebuilt from the wire
///
/// Implementors own an [`Envelope`] and supply the three payload hooks. The
/// provided methods handle the envelope itself: a non-OK message is just its
/// status word, an OK message is status, user id, then the payload.
pub trait KeyguardMessage {
    /// Borrow the envelope
    fn envelope(&self) -> &Envelope;

    /// Mutably borrow the envelope
    fn envelope_mut(&mut self) -> &mut Envelope;

    /// Serialized size of the payload alone
    fn payload_size(&self) -> usize {
        0
    }

    /// Append the payload; `out` has room reserved for `payload_size()` bytes
    fn write_payload(&self, _out: &mut Vec<u8>) -> Result<(), MessageError> {
        Ok(())
    }

    /// Rebuild the payload from the bytes after the envelope
    ///
    /// Implementations release and wipe the fields they already hold before
    /// reading new ones.
    fn read_payload(&mut self, _cursor: &mut Cursor<'_>) -> Result<(), MessageError> {
        Ok(())
    }

    /// Result code
    fn status(&self) -> Status {
        self.envelope().status
    }

    /// Replace the result code
    fn set_status(&mut self, status: Status) {
        self.envelope_mut().status = status;
    }

    /// User the message is about
    fn user_id(&self) -> u32 {
        self.envelope().user_id
    }

    /// Serialized size of the current state
    fn serialized_size(&self) -> usize {
        if self.status().is_ok() {
            ENVELOPE_LEN + self.payload_size()
        } else {
            STATUS_LEN
        }
    }

    /// Encode the message
    ///
    /// A non-OK message encodes to its status word only; user id and payload
    /// are not sent.
    fn serialize(&self) -> Result<Vec<u8>, MessageError> {
        let envelope = self.envelope();
        let mut out = Vec::with_capacity(self.serialized_size());
        out.extend_from_slice(&envelope.status.to_wire().to_le_bytes());
        if envelope.status.is_ok() {
            out.extend_from_slice(&envelope.user_id.to_le_bytes());
            self.write_payload(&mut out)?;
        }
        Ok(out)
    }

    /// Rebuild the message from `bytes`
    ///
    /// Returns `Ok(())` only when the status is OK and every payload field was
    /// read. A message carrying an error status yields
    /// `MessageError::ErrorStatus` and leaves the payload untouched. On any
    /// failure the envelope status is `Invalid`.
    ///
    /// Bytes after the last payload field are ignored.
    fn deserialize(&mut self, bytes: &[u8]) -> Result<(), MessageError> {
        let result = decode_envelope(self, bytes);
        if result.is_err() {
            self.set_status(Status::Invalid);
        }
        result
    }
}

fn decode_envelope<M: KeyguardMessage + ?Sized>(
    message: &mut M,
    bytes: &[u8],
) -> Result<(), MessageError> {
    let mut cursor = Cursor::new(bytes);
    let raw_status = cursor.read_u32()?;
    let status = Status::from_wire(raw_status);
    message.set_status(status);
    if !status.is_ok() {
        return Err(MessageError::ErrorStatus(raw_status));
    }

    if cursor.remaining() == 0 {
        return Err(MessageError::Truncated {
            needed: STATUS_LEN,
            remaining: 0,
        });
    }
    message.envelope_mut().user_id = cursor.read_u32()?;
    message.read_payload(&mut cursor)
}
