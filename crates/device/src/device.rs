//! Device entry points

use keyguard_messages::{
    EnrollRequest, EnrollResponse, KeyguardMessage, SizedBuffer, Status,
    VerifyRequest, VerifyResponse,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::keyguard::Keyguard;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Authenticator rejected request for user {user_id}")]
    Rejected { user_id: u32 },
}

/// Keyguard device wrapping an authenticator
pub struct KeyguardDevice<K> {
    keyguard: K,
}

impl<K: Keyguard> KeyguardDevice<K> {
    /// Create a device backed by `keyguard`
    pub fn new(keyguard: K) -> Self {
        Self { keyguard }
    }

    /// Borrow the authenticator
    pub fn keyguard(&self) -> &K {
        &self.keyguard
    }

    /// Enroll `desired_password` for `uid`
    ///
    /// Returns the password handle the caller stores and later passes to
    /// [`KeyguardDevice::verify`].
    pub fn enroll(&self, uid: u32, desired_password: &[u8]) -> Result<SizedBuffer, DeviceError> {
        if desired_password.is_empty() {
            return Err(DeviceError::InvalidArgument("desired password is empty"));
        }

        let request = EnrollRequest::new(uid, SizedBuffer::from_slice(desired_password));
        let mut response = EnrollResponse::default();

        debug!("Enrolling password for user {}", uid);
        self.keyguard.enroll(&request, &mut response);

        if !response.status().is_ok() {
            warn!("Enrollment rejected for user {}", uid);
            return Err(DeviceError::Rejected { user_id: uid });
        }

        Ok(response.take_enrolled_password_handle())
    }

    /// Verify `provided_password` against `enrolled_password_handle`
    ///
    /// Returns the verification token on success.
    pub fn verify(
        &self,
        uid: u32,
        enrolled_password_handle: &[u8],
        provided_password: &[u8],
    ) -> Result<SizedBuffer, DeviceError> {
        let request = VerifyRequest::new(
            uid,
            SizedBuffer::from_slice(enrolled_password_handle),
            SizedBuffer::from_slice(provided_password),
        );
        let mut response = VerifyResponse::default();

        debug!("Verifying password for user {}", uid);
        self.keyguard.verify(&request, &mut response);

        if !response.status().is_ok() {
            warn!("Verification rejected for user {}", uid);
            return Err(DeviceError::Rejected { user_id: uid });
        }

        Ok(response.take_verification_token())
    }

    /// Run a serialized [`EnrollRequest`] and return the serialized response
    ///
    /// Malformed input yields an error-only response.
    pub fn handle_enroll(&self, bytes: &[u8]) -> Vec<u8> {
        let mut request = EnrollRequest::default();
        if let Err(e) = request.deserialize(bytes) {
            warn!("Malformed enroll request ({} bytes): {}", bytes.len(), e);
            return error_reply(e.status());
        }

        let mut response = EnrollResponse::default();
        self.keyguard.enroll(&request, &mut response);
        debug!(
            "Enroll for user {} finished with {:?}",
            request.user_id(),
            response.status()
        );
        encode_reply(&response)
    }

    /// Run a serialized [`VerifyRequest`] and return the serialized response
    ///
    /// Malformed input yields an error-only response.
    pub fn handle_verify(&self, bytes: &[u8]) -> Vec<u8> {
        let mut request = VerifyRequest::default();
        if let Err(e) = request.deserialize(bytes) {
            warn!("Malformed verify request ({} bytes): {}", bytes.len(), e);
            return error_reply(e.status());
        }

        let mut response = VerifyResponse::default();
        self.keyguard.verify(&request, &mut response);
        debug!(
            "Verify for user {} finished with {:?}",
            request.user_id(),
            response.status()
        );
        encode_reply(&response)
    }
}

fn encode_reply<M: KeyguardMessage>(response: &M) -> Vec<u8> {
    match response.serialize() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to encode response: {}", e);
            error_reply(e.status())
        }
    }
}

fn error_reply(status: Status) -> Vec<u8> {
    status.to_wire().to_le_bytes().to_vec()
}
