//! Captured encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::{BufMut, Bytes};


//------------ Captured ------------------------------------------------------

/// A bytes value containing the complete encoding of one or more values.
///
/// Captured data is kept whenever the exact octets of a value are needed
/// later, most notably for the signed part of a certificate. Since it is
/// a slice of the input, capturing does not copy.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Captured(Bytes);

impl Captured {
    /// Creates a captured value from encoded data.
    pub fn new(bytes: Bytes) -> Self {
        Captured(bytes)
    }

    /// Returns a bytes slice with the raw data of the captured value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the captured data as a bytes value.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Converts the captured value into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the number of captured octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes the captured data to a target.
    pub fn write_encoded(&self, target: &mut impl BufMut) {
        target.put_slice(self.0.as_ref())
    }
}


//--- AsRef

impl AsRef<[u8]> for Captured {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Debug

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Captured({})", hex::encode(&self.0))
    }
}
