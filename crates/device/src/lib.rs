//! Keyguard Device - the authenticator boundary
//!
//! This crate provides:
//! - `Keyguard`: the two operations an authenticator implements
//! - `KeyguardDevice`: raw-bytes entry points that build requests, call the
//!   authenticator and hand back the resulting handle or token
//! - Wire dispatch: decode a serialized request, run it, encode the response

mod device;
mod keyguard;

pub use device::*;
pub use keyguard::*;
