//! Owned byte buffer for secret material

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Exclusively owned, heap-allocated byte sequence
///
/// Carries passwords, password handles and verification tokens. The storage is
/// overwritten with zeros before it is released, on every path: drop, explicit
/// [`Zeroize::zeroize`], or replacement during deserialization.
///
/// There is no `Clone`. Duplicating secret material has to be spelled out with
/// [`SizedBuffer::from_slice`].
#[derive(Default)]
pub struct SizedBuffer {
    data: Option<Box<[u8]>>,
}

impl SizedBuffer {
    /// Create an empty buffer with no storage
    pub fn new() -> Self {
        Self { data: None }
    }

    /// Reserve exactly `len` zeroed bytes
    ///
    /// A zero length yields an empty buffer with no storage.
    pub fn allocate(len: usize) -> Self {
        if len == 0 {
            return Self::new();
        }
        Self {
            data: Some(vec![0u8; len].into_boxed_slice()),
        }
    }

    /// Allocate and copy `bytes`
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::new();
        }
        Self {
            data: Some(Box::from(bytes)),
        }
    }

    /// Number of bytes held
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.len())
    }

    /// True when the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when storage is allocated
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Borrow the contents
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Mutably borrow the contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// Move the contents out, leaving this buffer empty
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Overwrite the contents with zeros, keeping the allocation
    fn scrub(&mut self) {
        if let Some(data) = self.data.as_deref_mut() {
            data.zeroize();
        }
    }
}

impl Zeroize for SizedBuffer {
    fn zeroize(&mut self) {
        self.scrub();
        self.data = None;
    }
}

impl Drop for SizedBuffer {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SizedBuffer {}

impl From<Vec<u8>> for SizedBuffer {
    /// Take ownership of `bytes`
    ///
    /// A vector with spare capacity is copied into an exact allocation and then
    /// wiped, so no copy of its contents is left behind in the old allocation.
    fn from(mut bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            bytes.zeroize();
            return Self::new();
        }
        if bytes.len() == bytes.capacity() {
            return Self {
                data: Some(bytes.into_boxed_slice()),
            };
        }
        let buffer = Self::from_slice(&bytes);
        bytes.zeroize();
        buffer
    }
}

impl fmt::Debug for SizedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedBuffer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
