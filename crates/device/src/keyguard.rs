//! Authenticator interface

use keyguard_messages::{EnrollRequest, EnrollResponse, VerifyRequest, VerifyResponse};

/// Password authenticator reached through the device
///
/// Implementations turn a password into an opaque handle and later check a
/// password against that handle. They report failure by setting a non-OK
/// status on the response.
pub trait Keyguard {
    /// Enroll `request`'s password and fill in the new handle
    fn enroll(&self, request: &EnrollRequest, response: &mut EnrollResponse);

    /// Check `request`'s password against its handle and fill in a token
    fn verify(&self, request: &VerifyRequest, response: &mut VerifyResponse);
}

impl<K: Keyguard + ?Sized> Keyguard for Box<K> {
    fn enroll(&self, request: &EnrollRequest, response: &mut EnrollResponse) {
        (**self).enroll(request, response)
    }

    fn verify(&self, request: &VerifyRequest, response: &mut VerifyResponse) {
        (**self).verify(request, response)
    }
}

impl<K: Keyguard + ?Sized> Keyguard for &K {
    fn enroll(&self, request: &EnrollRequest, response: &mut EnrollResponse) {
        (**self).enroll(request, response)
    }

    fn verify(&self, request: &VerifyRequest, response: &mut VerifyResponse) {
        (**self).verify(request, response)
    }
}
