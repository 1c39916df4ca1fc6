//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{BufMut, Bytes};
use crate::decode::ContentError;
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value. Only the primitive form is supported here. The first
/// octet of the content contains the number of unused bits in the last
/// octet and the following octets contain the bits with the first bit in
/// the most significant bit of the octet.
///
/// A content of only the initial octet describes an empty bit string. BER
/// tolerates a non-zero unused count in this case and the count is kept.
/// DER does not allow it. DER also requires the unused bits to be zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Returns an error if `unused` is larger than seven or if there are
    /// unused bits but no octets to keep them in.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, ContentError> {
        if unused > 7 {
            return Err(ContentError::from_static(
                "invalid unused bits count in BIT STRING"
            ))
        }
        if unused > 0 && bits.is_empty() {
            return Err(ContentError::from_static(
                "unused bits in empty BIT STRING"
            ))
        }
        Ok(BitString { unused, bits })
    }

    /// Creates a bit string that uses all bits of the given octets.
    pub fn from_octets(bits: impl Into<Bytes>) -> Self {
        BitString { unused: 0, bits: bits.into() }
    }

    /// Returns the value of the given bit.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        self.bits[bit >> 3] & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3).saturating_sub(usize::from(self.unused))
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

/// # Decoding and Encoding
///
impl BitString {
    /// Parses the content octets of a primitive bit string value.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, ContentError> {
        let unused = match content.first() {
            Some(unused) => *unused,
            None => {
                return Err(ContentError::from_static("empty BIT STRING"))
            }
        };
        if unused > 7 {
            return Err(ContentError::from_static(
                "invalid unused bits count in BIT STRING"
            ))
        }
        let bits = content.slice(1..);
        if bits.is_empty() {
            if unused != 0 && mode.is_der() {
                return Err(ContentError::from_static(
                    "unused bits in empty BIT STRING"
                ))
            }
            // BER lets this one slide. The count is kept so the value
            // encodes the same way again.
            return Ok(BitString { unused, bits })
        }
        if mode.is_der() {
            let mask = (1u8 << unused) - 1;
            if bits[bits.len() - 1] & mask != 0 {
                return Err(ContentError::from_static(
                    "non-zero unused bits in DER BIT STRING"
                ))
            }
        }
        Ok(BitString { unused, bits })
    }

    /// Returns the length of the content octets.
    pub fn content_len(&self) -> usize {
        self.bits.len() + 1
    }

    /// Writes the content octets to the target.
    pub fn write_content(&self, target: &mut impl BufMut) {
        target.put_u8(self.unused);
        target.put_slice(self.bits.as_ref());
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn decode(content: &'static [u8], mode: Mode) -> Result<BitString, ContentError> {
        BitString::from_content(Bytes::from_static(content), mode)
    }

    #[test]
    fn decode_content() {
        let bits = decode(b"\x00\xa0\x01", Mode::Der).unwrap();
        assert_eq!(bits.unused(), 0);
        assert_eq!(bits.octet_slice(), b"\xa0\x01");
        assert_eq!(bits.bit_len(), 16);
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        assert!(bits.bit(2));
        assert!(bits.bit(15));
        assert!(!bits.bit(16));

        let bits = decode(b"\x04\xf0", Mode::Der).unwrap();
        assert_eq!(bits.bit_len(), 4);
        assert!(bits.bit(3));
        assert!(!bits.bit(4));

        assert!(decode(b"", Mode::Ber).is_err());
        assert!(decode(b"\x08\x00", Mode::Ber).is_err());
        assert!(decode(b"\x04\xf1", Mode::Der).is_err());
        assert!(decode(b"\x04\xf1", Mode::Ber).is_ok());
    }

    #[test]
    fn empty_payload() {
        let bits = decode(b"\x00", Mode::Der).unwrap();
        assert_eq!(bits.octet_len(), 0);
        assert_eq!(bits.bit_len(), 0);

        let bits = decode(b"\x03", Mode::Ber).unwrap();
        assert_eq!(bits.octet_len(), 0);
        assert_eq!(bits.bit_len(), 0);
        assert_eq!(bits.unused(), 3);
        assert!(!bits.bit(0));
        let mut target = Vec::new();
        bits.write_content(&mut target);
        assert_eq!(target, b"\x03");
        assert!(decode(b"\x03", Mode::Der).is_err());
    }

    #[test]
    fn encode_content() {
        let bits = BitString::new(4, Bytes::from_static(b"\xf0")).unwrap();
        let mut target = Vec::new();
        bits.write_content(&mut target);
        assert_eq!(target, b"\x04\xf0");
        assert_eq!(bits.content_len(), 2);
        assert!(BitString::new(8, Bytes::new()).is_err());
        assert!(BitString::new(1, Bytes::new()).is_err());
    }
}
