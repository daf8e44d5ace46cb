//! Password enrollment messages

use zeroize::Zeroize;

use crate::buffer::SizedBuffer;
use crate::codec::{field_size, read_field, write_field, Cursor};
use crate::error::MessageError;
use crate::message::{Envelope, KeyguardMessage, Status};

/// Request to enroll a new password for a user
#[derive(Debug, Default)]
pub struct EnrollRequest {
    envelope: Envelope,
    provided_password: SizedBuffer,
}

impl EnrollRequest {
    /// Create a request, taking ownership of the password
    pub fn new(user_id: u32, provided_password: SizedBuffer) -> Self {
        Self {
            envelope: Envelope::new(user_id),
            provided_password,
        }
    }

    /// The password to enroll
    pub fn provided_password(&self) -> &SizedBuffer {
        &self.provided_password
    }
}

impl KeyguardMessage for EnrollRequest {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn payload_size(&self) -> usize {
        field_size(&self.provided_password)
    }

    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), MessageError> {
        write_field(out, &self.provided_password)
    }

    fn read_payload(&mut self, cursor: &mut Cursor<'_>) -> Result<(), MessageError> {
        self.provided_password.zeroize();

        self.provided_password = read_field(cursor)?;
        Ok(())
    }
}

/// Authenticator's answer to an [`EnrollRequest`]
#[derive(Debug, Default)]
pub struct EnrollResponse {
    envelope: Envelope,
    enrolled_password_handle: SizedBuffer,
}

impl EnrollResponse {
    /// Create a successful response, taking ownership of the handle
    pub fn new(user_id: u32, enrolled_password_handle: SizedBuffer) -> Self {
        Self {
            envelope: Envelope::new(user_id),
            enrolled_password_handle,
        }
    }

    /// Create an error-only response
    pub fn error(status: Status) -> Self {
        Self {
            envelope: Envelope::error(status),
            enrolled_password_handle: SizedBuffer::new(),
        }
    }

    /// Replace the handle, wiping the previous one
    pub fn set_enrolled_password_handle(&mut self, handle: SizedBuffer) {
        self.enrolled_password_handle = handle;
    }

    /// The handle produced by the authenticator
    pub fn enrolled_password_handle(&self) -> &SizedBuffer {
        &self.enrolled_password_handle
    }

    /// Move the handle out, leaving this response without one
    pub fn take_enrolled_password_handle(&mut self) -> SizedBuffer {
        self.enrolled_password_handle.take()
    }
}

impl KeyguardMessage for EnrollResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn payload_size(&self) -> usize {
        field_size(&self.enrolled_password_handle)
    }

    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), MessageError> {
        write_field(out, &self.enrolled_password_handle)
    }

    fn read_payload(&mut self, cursor: &mut Cursor<'_>) -> Result<(), MessageError> {
        self.enrolled_password_handle.zeroize();

        self.enrolled_password_handle = read_field(cursor)?;
        Ok(())
    }
}
