//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{cmp, fmt};
use bytes::{BufMut, Bytes};
use crate::decode::ContentError;
use crate::mode::Mode;


//------------ Integer -------------------------------------------------------

/// A signed integer of arbitrary size.
///
/// Values of this type keep the sign separately from the magnitude. The
/// magnitude is kept as a big-endian sequence of octets without any leading
/// zero octets. Consequently, zero has an empty magnitude.
///
/// Because of this representation, the type can only move integers in and
/// out of their encoded form and compare them. There is no arithmetic.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content
/// octets providing a variable-length, big-endian, two‘s complement byte
/// sequence of that integer. Thus, the most-significant bit of the first
/// octet serves as the sign bit. A non-negative value whose most
/// significant octet would have that bit set therefore needs an extra
/// leading zero octet.
///
/// In DER, the first nine bits of a multi-octet integer must not all be the
/// same, i.e., the integer must be encoded in the smallest possible number
/// of octets. BER allows longer encodings.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer {
    /// Is the value negative?
    negative: bool,

    /// The magnitude of the value.
    magnitude: Bytes,
}

/// # Creation and Conversion
///
impl Integer {
    /// Returns an integer with the value zero.
    pub fn zero() -> Self {
        Integer { negative: false, magnitude: Bytes::new() }
    }

    /// Creates a non-negative integer from its big-endian octets.
    ///
    /// Leading zero octets are ignored.
    pub fn from_unsigned_be(octets: impl Into<Bytes>) -> Self {
        Integer { negative: false, magnitude: strip_zeros(octets.into()) }
    }

    /// Creates an integer from a native signed integer.
    pub fn from_i64(value: i64) -> Self {
        let magnitude = Bytes::copy_from_slice(
            &value.unsigned_abs().to_be_bytes()
        );
        Integer { negative: value < 0, magnitude: strip_zeros(magnitude) }
    }

    /// Creates an integer from a native unsigned integer.
    pub fn from_u64(value: u64) -> Self {
        Self::from_unsigned_be(Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    /// Returns whether the value is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Returns the big-endian magnitude without leading zeros.
    pub fn magnitude(&self) -> &Bytes {
        &self.magnitude
    }

    /// Converts the value into a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.negative || self.magnitude.len() > 8 {
            return None
        }
        Some(self.magnitude.iter().fold(0u64, |res, &octet| {
            (res << 8) | u64::from(octet)
        }))
    }

    /// Converts the value into an `i64` if it fits.
    ///
    /// Values that need more than 64 bits return `None` rather than being
    /// truncated.
    pub fn to_i64(&self) -> Option<i64> {
        if self.magnitude.len() > 8 {
            return None
        }
        let abs = self.magnitude.iter().fold(0u64, |res, &octet| {
            (res << 8) | u64::from(octet)
        });
        if self.negative {
            if abs > 1u64 << 63 {
                None
            }
            else {
                // abs is at most 2^63, so this can’t overflow in i128.
                Some((-i128::from(abs)) as i64)
            }
        }
        else {
            i64::try_from(abs).ok()
        }
    }
}

/// # Decoding and Encoding
///
impl Integer {
    /// Decodes the content octets of an INTEGER value.
    ///
    /// The content is a two’s complement big-endian integer. Under BER,
    /// superfluous leading `0x00` and `0xFF` octets are accepted and
    /// dropped. Under DER, they are an error.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, ContentError> {
        Self::check_head(&content, mode)?;
        if content[0] & 0x80 == 0 {
            return Ok(Integer {
                negative: false, magnitude: strip_zeros(content)
            })
        }

        // Negative. The magnitude is the two’s complement of the content:
        // invert all octets and add one.
        let mut magnitude: Vec<u8> = content.iter().map(|x| !x).collect();
        for octet in magnitude.iter_mut().rev() {
            let (res, carry) = octet.overflowing_add(1);
            *octet = res;
            if !carry {
                break
            }
        }
        Ok(Integer {
            negative: true,
            magnitude: strip_zeros(magnitude.into())
        })
    }

    /// Checks that an integer is started correctly.
    ///
    /// Specifically, checks that there is at least one octet and, for DER,
    /// that the first nine bits of a multi-octet integer are not all the
    /// same.
    fn check_head(content: &[u8], mode: Mode) -> Result<(), ContentError> {
        match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
            (None, _) => Err(ContentError::from_static("empty INTEGER")),
            (Some(0), Some(false)) | (Some(0xFF), Some(true))
                if mode.is_der() =>
            {
                Err(ContentError::from_static("non-minimal INTEGER"))
            }
            _ => Ok(())
        }
    }

    /// Returns the length of the two’s complement content octets.
    pub fn content_len(&self) -> usize {
        let first = match self.magnitude.first() {
            Some(first) => *first,
            None => return 1,
        };
        let len = self.magnitude.len();
        if self.negative {
            // The complement keeps the sign bit set unless the magnitude
            // exceeds 0x80 followed by zeros.
            if first > 0x80
                || (first == 0x80 && self.magnitude[1..].iter().any(|&x| x != 0))
            {
                len + 1
            }
            else {
                len
            }
        }
        else if first & 0x80 != 0 {
            len + 1
        }
        else {
            len
        }
    }

    /// Writes the two’s complement content octets to the target.
    pub fn write_content(&self, target: &mut impl BufMut) {
        if self.magnitude.is_empty() {
            target.put_u8(0);
            return
        }
        let extra = self.content_len() > self.magnitude.len();
        if !self.negative {
            if extra {
                target.put_u8(0);
            }
            target.put_slice(&self.magnitude);
            return
        }
        if extra {
            target.put_u8(0xFF);
        }
        let mut complement: Vec<u8> = self.magnitude.iter().map(|x| !x).collect();
        for octet in complement.iter_mut().rev() {
            let (res, carry) = octet.overflowing_add(1);
            *octet = res;
            if !carry {
                break
            }
        }
        target.put_slice(&complement);
    }

    /// Returns the content octets as a new bytes value.
    pub fn to_content(&self) -> Bytes {
        let mut res = Vec::with_capacity(self.content_len());
        self.write_content(&mut res);
        res.into()
    }
}


//--- Default

impl Default for Integer {
    fn default() -> Self {
        Self::zero()
    }
}


//--- From

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}


//--- PartialOrd and Ord

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let abs = self.magnitude.len().cmp(&other.magnitude.len()).then_with(
            || self.magnitude.cmp(&other.magnitude)
        );
        match (self.negative, other.negative) {
            (false, false) => abs,
            (true, true) => abs.reverse(),
            (false, true) => cmp::Ordering::Greater,
            (true, false) => cmp::Ordering::Less,
        }
    }
}


//--- Display and Debug

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.to_i64() {
            return write!(f, "{}", value)
        }
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "0x{}", hex::encode(&self.magnitude))
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Drops all leading zero octets.
fn strip_zeros(octets: Bytes) -> Bytes {
    let start = octets.iter().position(|&x| x != 0).unwrap_or(octets.len());
    octets.slice(start..)
}


//============ Tests =========================================================
