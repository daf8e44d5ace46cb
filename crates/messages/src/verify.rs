//! Password verification messages

use zeroize::Zeroize;

use crate::buffer::SizedBuffer;
use crate::codec::{field_size, read_field, write_field, Cursor};
use crate::error::MessageError;
use crate::message::{Envelope, KeyguardMessage, Status};

/// Request to check a password against an enrolled handle
#[derive(Debug, Default)]
pub struct VerifyRequest {
    envelope: Envelope,
    password_handle: SizedBuffer,
    provided_password: SizedBuffer,
}

impl VerifyRequest {
    /// Create a request, taking ownership of both buffers
    pub fn new(
        user_id: u32,
        enrolled_password_handle: SizedBuffer,
        provided_password: SizedBuffer,
    ) -> Self {
        Self {
            envelope: Envelope::new(user_id),
            password_handle: enrolled_password_handle,
            provided_password,
        }
    }

    /// The handle returned by a previous enrollment
    pub fn password_handle(&self) -> &SizedBuffer {
        &self.password_handle
    }

    /// The password to check against the handle
    pub fn provided_password(&self) -> &SizedBuffer {
        &self.provided_password
    }
}

impl KeyguardMessage for VerifyRequest {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn payload_size(&self) -> usize {
        field_size(&self.password_handle) + field_size(&self.provided_password)
    }

    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), MessageError> {
        write_field(out, &self.password_handle)?;
        write_field(out, &self.provided_password)
    }

    fn read_payload(&mut self, cursor: &mut Cursor<'_>) -> Result<(), MessageError> {
        self.password_handle.zeroize();
        self.provided_password.zeroize();

        self.password_handle = read_field(cursor)?;
        self.provided_password = read_field(cursor)?;
        Ok(())
    }
}

/// Authenticator's answer to a [`VerifyRequest`]
#[derive(Debug, Default)]
pub struct VerifyResponse {
    envelope: Envelope,
    verification_token: SizedBuffer,
}

impl VerifyResponse {
    /// Create a successful response, taking ownership of the token
    pub fn new(user_id: u32, verification_token: SizedBuffer) -> Self {
        Self {
            envelope: Envelope::new(user_id),
            verification_token,
        }
    }

    /// Create an error-only response
    pub fn error(status: Status) -> Self {
        Self {
            envelope: Envelope::error(status),
            verification_token: SizedBuffer::new(),
        }
    }

    /// Replace the token, wiping the previous one
    pub fn set_verification_token(&mut self, token: SizedBuffer) {
        self.verification_token = token;
    }

    /// Proof of a successful verification
    pub fn verification_token(&self) -> &SizedBuffer {
        &self.verification_token
    }

    /// Move the token out, leaving this response without one
    pub fn take_verification_token(&mut self) -> SizedBuffer {
        self.verification_token.take()
    }
}

impl KeyguardMessage for VerifyResponse {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    fn payload_size(&self) -> usize {
        field_size(&self.verification_token)
    }

    fn write_payload(&self, out: &mut Vec<u8>) -> Result<(), MessageError> {
        write_field(out, &self.verification_token)
    }

    fn read_payload(&mut self, cursor: &mut Cursor<'_>) -> Result<(), MessageError> {
        self.verification_token.zeroize();

        self.verification_token = read_field(cursor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, RngCore, SeedableRng};

    const USER_ID: u32 = 3857;

    fn make_buffer(size: usize) -> SizedBuffer {
        let mut bytes = vec![0u8; size];
        StdRng::seed_from_u64(size as u64).fill_bytes(&mut bytes);
        SizedBuffer::from(bytes)
    }

    #[test]
    fn test_verify_request_roundtrip() {
        let request = VerifyRequest::new(USER_ID, make_buffer(512), make_buffer(256));
        let bytes = request.serialize().unwrap();
        assert_eq!(bytes.len(), 8 + 4 + 512 + 4 + 256);

        let mut decoded = VerifyRequest::default();
        decoded.deserialize(&bytes).unwrap();

        assert_eq!(decoded.user_id(), USER_ID);
        assert_eq!(
            decoded.password_handle().as_slice(),
            request.password_handle().as_slice()
        );
        assert_eq!(
            decoded.provided_password().as_slice(),
            request.provided_password().as_slice()
        );
    }

    #[test]
    fn test_verify_request_empty_handle() {
        // A zero-length field is fine as long as another field follows
        let request = VerifyRequest::new(USER_ID, SizedBuffer::new(), make_buffer(12));
        let bytes = request.serialize().unwrap();

        let mut decoded = VerifyRequest::default();
        decoded.deserialize(&bytes).unwrap();

        assert!(decoded.password_handle().is_empty());
        assert!(!decoded.password_handle().is_allocated());
        assert_eq!(decoded.provided_password().len(), 12);
    }

    #[test]
    fn test_verify_request_random_lengths() {
        let mut rng = StdRng::seed_from_u64(0x6B67);

        for _ in 0..64 {
            let handle_len = rng.gen_range(0..128);
            let password_len = rng.gen_range(1..128);
            let request = VerifyRequest::new(
                rng.next_u32(),
                make_buffer(handle_len),
                make_buffer(password_len),
            );

            let bytes = request.serialize().unwrap();
            assert_eq!(bytes.len(), request.serialized_size());

            let mut decoded = VerifyRequest::default();
            decoded.deserialize(&bytes).unwrap();
            assert_eq!(decoded.user_id(), request.user_id());
            assert_eq!(decoded.password_handle().len(), handle_len);
            assert_eq!(decoded.provided_password().len(), password_len);
        }
    }

    #[test]
    fn test_verify_request_second_field_truncated() {
        let request = VerifyRequest::new(USER_ID, make_buffer(16), make_buffer(16));
        let mut bytes = request.serialize().unwrap();
        bytes.truncate(bytes.len() - 1);

        let mut decoded = VerifyRequest::default();
        assert!(matches!(
            decoded.deserialize(&bytes),
            Err(MessageError::FieldOverrun {
                declared: 16,
                remaining: 15
            })
        ));
        assert_eq!(decoded.status(), Status::Invalid);
        assert!(decoded.provided_password().is_empty());
    }

    #[test]
    fn test_verify_response_roundtrip() {
        let response = VerifyResponse::new(USER_ID, make_buffer(512));
        let bytes = response.serialize().unwrap();

        let mut decoded = VerifyResponse::default();
        decoded.deserialize(&bytes).unwrap();

        assert_eq!(decoded.user_id(), USER_ID);
        assert_eq!(
            decoded.verification_token().as_slice(),
            response.verification_token().as_slice()
        );
    }

    #[test]
    fn test_verify_response_error_only() {
        let response = VerifyResponse::error(Status::Invalid);
        assert_eq!(response.serialized_size(), 4);

        let mut decoded = VerifyResponse::default();
        let result = decoded.deserialize(&response.serialize().unwrap());
        assert_eq!(result, Err(MessageError::ErrorStatus(1)));
        assert_eq!(decoded.status(), Status::Invalid);
    }

    #[test]
    fn test_serialize_is_repeatable() {
        let response = VerifyResponse::new(USER_ID, make_buffer(40));
        assert_eq!(response.serialize().unwrap(), response.serialize().unwrap());
    }

    #[test]
    fn test_set_token() {
        let mut response = VerifyResponse::default();
        response.set_verification_token(SizedBuffer::from_slice(b"token"));
        assert_eq!(response.take_verification_token().as_slice(), b"token");
        assert!(response.verification_token().is_empty());
    }
}
