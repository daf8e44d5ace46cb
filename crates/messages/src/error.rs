//! Decode and encode errors

use thiserror::Error;

use crate::message::Status;

/// Message codec errors
///
/// The wire protocol only distinguishes OK from INVALID. The variants here
/// carry extra detail for the caller's diagnostics, and every one of them
/// reports [`Status::Invalid`] through [`MessageError::status`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    #[error("Truncated message: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Field length {declared} overruns message: {remaining} bytes remaining")]
    FieldOverrun { declared: u32, remaining: usize },

    #[error("Field too large for the wire: {0} bytes")]
    FieldTooLarge(usize),

    #[error("Message carries error status {0}")]
    ErrorStatus(u32),
}

impl MessageError {
    /// Wire status equivalent of this error
    pub fn status(&self) -> Status {
        Status::Invalid
    }
}
