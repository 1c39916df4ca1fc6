//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::BufMut;
use crate::decode::{ContentError, ErrorKind};
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Under DER rules, a definite length must be encoded in the minimum
/// number of octets and indefinite lengths are not allowed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Length(Option<usize>);

impl Length {
    /// The size of the native length type in octets.
    const LEN: usize = std::mem::size_of::<usize>();

    /// Creates a definite length.
    pub const fn definite(len: usize) -> Self {
        Length(Some(len))
    }

    /// Creates an indefinite length.
    pub const fn indefinite() -> Self {
        Length(None)
    }

    /// Returns the length if it is definite.
    pub fn value(self) -> Option<usize> {
        self.0
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        self.0.is_none()
    }

    /// Takes the length octets from the beginning of `data`.
    ///
    /// Returns the length and the number of octets it occupied.
    pub fn take_from(
        data: &[u8], mode: Mode
    ) -> Result<(Self, usize), ErrorKind> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err(ErrorKind::HeaderTruncated)
        };
        let count = match first {
            // Bit 7 clear: single.
            n if n & 0x80 == 0 => {
                return Ok((Length::definite(usize::from(n)), 1))
            }

            // 0x80: indefinite.
            0x80 => {
                if !mode.allow_indefinite() {
                    return Err(ErrorKind::Content(ContentError::from_static(
                        "indefinite length in DER"
                    )))
                }
                return Ok((Length::indefinite(), 1))
            }

            // 0xFF: reserved.
            0xFF => {
                return Err(ErrorKind::Content(ContentError::from_static(
                    "illegal length octets"
                )))
            }

            // anything else: clear left bit, number of octets.
            n => usize::from(n & 0x7F)
        };

        if count > Self::LEN {
            return Err(ErrorKind::LengthTooLarge)
        }
        let octets = match data.get(1..count + 1) {
            Some(octets) => octets,
            None => return Err(ErrorKind::HeaderTruncated)
        };

        // The difference to the BER case is the second octet can’t be zero
        // and it can’t be less that 0x80 if it is the last octet as well.
        // In both cases, there is a shorter encoding.
        if mode.is_der() && (octets[0] == 0 || (octets[0] < 0x80 && count == 1))
        {
            return Err(ErrorKind::Content(ContentError::from_static(
                "illegal length in DER"
            )))
        }

        let len = octets.iter().fold(0usize, |len, &octet| {
            (len << 8) | usize::from(octet)
        });
        Ok((Length::definite(len), count + 1))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self.0 {
            Some(len) if len > 0x7F => {
                Self::LEN - Self::start_idx(len) + 1
            }
            _ => 1,
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn write_encoded(self, target: &mut impl BufMut) {
        match self.0 {
            Some(len) if len > 0x7F => {
                let idx = Self::start_idx(len);
                debug_assert!(idx < Self::LEN);

                // LEN will never be greater than 126 bytes. Also, `idx`
                // won’t be greater than LEN, so the subtraction here is fine.
                target.put_u8(((Self::LEN - idx) | 0x80) as u8);
                target.put_slice(&len.to_be_bytes()[idx..])
            }
            Some(len) => target.put_u8(len as u8),
            None => target.put_u8(0x80),
        }
    }

    /// Returns the index of the first non-zero octet of `len`.
    fn start_idx(len: usize) -> usize {
        (len.leading_zeros() / 8) as usize
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length::definite(len)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take_from(data: &[u8], mode: Mode) -> Result<Option<usize>, ErrorKind> {
        let (res, len) = Length::take_from(data, mode)?;
        assert_eq!(len, data.len(), "not all octets consumed");
        Ok(res.value())
    }

    #[test]
    fn ber_take_from() {
        assert_eq!(take_from(b"\x00", Mode::Ber), Ok(Some(0x00)));
        assert_eq!(take_from(b"\x12", Mode::Ber), Ok(Some(0x12)));
        assert_eq!(take_from(b"\x7f", Mode::Ber), Ok(Some(0x7f)));
        assert_eq!(take_from(b"\x80", Mode::Ber), Ok(None));
        assert_eq!(take_from(b"\x81\x00", Mode::Ber), Ok(Some(0)));
        assert_eq!(take_from(b"\x81\xF0", Mode::Ber), Ok(Some(0xF0)));
        assert_eq!(take_from(b"\x82\x00\x00", Mode::Ber), Ok(Some(0)));
        assert_eq!(take_from(b"\x82\xF0\x0E", Mode::Ber), Ok(Some(0xF00E)));
        assert_eq!(take_from(b"\x82\x00\x0E", Mode::Ber), Ok(Some(0x0E)));
        assert!(Length::take_from(b"\xFF", Mode::Ber).is_err());
    }

    #[test]
    fn der_take_from() {
        assert_eq!(take_from(b"\x00", Mode::Der), Ok(Some(0x00)));
        assert_eq!(take_from(b"\x7f", Mode::Der), Ok(Some(0x7f)));
        assert!(Length::take_from(b"\x80", Mode::Der).is_err());
        assert!(Length::take_from(b"\x81\x00", Mode::Der).is_err());
        assert!(Length::take_from(b"\x81\x7f", Mode::Der).is_err());
        assert_eq!(take_from(b"\x81\x80", Mode::Der), Ok(Some(0x80)));
        assert_eq!(take_from(b"\x82\xF0\x0E", Mode::Der), Ok(Some(0xF00E)));
        assert!(Length::take_from(b"\x82\x00\x0E", Mode::Der).is_err());
    }

    #[test]
    fn take_from_failures() {
        assert_eq!(
            Length::take_from(b"", Mode::Ber),
            Err(ErrorKind::HeaderTruncated)
        );
        assert_eq!(
            Length::take_from(b"\x82\x01", Mode::Ber),
            Err(ErrorKind::HeaderTruncated)
        );
        assert_eq!(
            Length::take_from(b"\x89\x00\x00\x00\x00\x00\x00\x00\x00\x01",
                Mode::Ber
            ),
            Err(ErrorKind::LengthTooLarge)
        );
    }

    #[test]
    fn encode() {
        fn step(l: Length, res: &[u8]) {
            let mut vec = Vec::new();
            l.write_encoded(&mut vec);
            assert_eq!(vec.as_slice(), res, "encoding failed for {:?}", l);
            assert_eq!(l.encoded_len(), res.len());
        }

        step(Length::indefinite(), b"\x80");
        step(Length::definite(0), b"\x00");
        step(Length::definite(0x12), b"\x12");
        step(Length::definite(0x7f), b"\x7f");
        step(Length::definite(0x80), b"\x81\x80");
        step(Length::definite(0xdead), b"\x82\xde\xad");
        step(Length::definite(0x01_0000), b"\x83\x01\x00\x00");
    }
}
