//! Keyguard Messages - wire format for password enrollment and verification
//!
//! This crate defines the messages exchanged between a caller and a
//! device-resident authenticator:
//! - `SizedBuffer`: owned byte buffer that is zeroed before it is freed
//! - `KeyguardMessage`: common envelope (status + user id) and the codec
//! - `EnrollRequest`/`EnrollResponse`: password enrollment
//! - `VerifyRequest`/`VerifyResponse`: password verification
//!
//! Wire layout (all integers little-endian u32):
//!
//! ```text
//! error-only:  [status]
//! success:     [status = 0][user_id][payload]
//! field:       [length][length bytes]
//! ```
//!
//! Decoding treats its input as hostile. It never reads outside the supplied
//! slice and never panics, whatever the bytes.

mod buffer;
mod codec;
mod enroll;
mod error;
mod message;
mod verify;

pub use buffer::SizedBuffer;
pub use codec::{field_size, read_field, write_field, Cursor, FIELD_PREFIX_LEN};
pub use enroll::{EnrollRequest, EnrollResponse};
pub use error::MessageError;
pub use message::{Envelope, KeyguardMessage, Status};
pub use verify::{VerifyRequest, VerifyResponse};
