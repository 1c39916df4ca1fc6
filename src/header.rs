//! The tag and length header of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::BufMut;
use crate::decode::{ContentError, DecodeError, ErrorKind};
use crate::ident::Tag;
use crate::length::Length;
use crate::mode::Mode;


//------------ Header --------------------------------------------------------

/// The identifier and length octets of an encoded value.
///
/// Every BER encoded value starts with a header that provides its tag,
/// whether the content is primitive or constructed, and the length of the
/// content octets that follow.
///
/// A decoded header always has either a definite length or is indefinite.
/// The latter is only possible for constructed values under BER.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    /// The tag of the value.
    tag: Tag,

    /// Whether the value is constructed.
    constructed: bool,

    /// The length of the content octets.
    length: Length,
}

impl Header {
    /// Creates a new header.
    pub fn new(tag: Tag, constructed: bool, length: Length) -> Self {
        Header { tag, constructed, length }
    }

    /// Creates a new header for a primitive value of the given length.
    pub fn primitive(tag: Tag, len: usize) -> Self {
        Self::new(tag, false, Length::definite(len))
    }

    /// Creates a new header for a constructed value of the given length.
    pub fn constructed(tag: Tag, len: usize) -> Self {
        Self::new(tag, true, Length::definite(len))
    }

    /// Returns the tag.
    pub fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the content length.
    pub fn length(self) -> Length {
        self.length
    }

    /// Returns whether the value uses the indefinite length form.
    pub fn is_indefinite(self) -> bool {
        self.length.is_indefinite()
    }

    /// Reads a header from the data starting at `offset`.
    ///
    /// At most `max_len` octets starting at `offset` are considered part
    /// of the value. A definite length that exceeds what is left of these
    /// octets after the header results in an error.
    ///
    /// Returns the header and the number of octets it occupied.
    pub fn read(
        buf: &[u8], offset: usize, max_len: usize, mode: Mode
    ) -> Result<(Self, usize), DecodeError> {
        let end = offset.saturating_add(max_len).min(buf.len());
        let data = match buf.get(offset..end) {
            Some(data) => data,
            None => {
                return Err(DecodeError::new(
                    ErrorKind::HeaderTruncated, offset
                ))
            }
        };

        let (tag, constructed, tag_len) = Tag::take_from(data, mode).map_err(
            |kind| DecodeError::new(kind, offset)
        )?;
        let (length, len_len) = Length::take_from(
            &data[tag_len..], mode
        ).map_err(|kind| DecodeError::new(kind, offset))?;
        let header_len = tag_len + len_len;

        match length.value() {
            Some(len) => {
                if len > data.len() - header_len {
                    return Err(DecodeError::new(
                        ErrorKind::LengthOverflow, offset
                    ))
                }
            }
            None => {
                if !constructed {
                    return Err(DecodeError::content(
                        ContentError::from_static(
                            "indefinite length for primitive value"
                        ),
                        offset
                    ))
                }
            }
        }
        Ok((Header { tag, constructed, length }, header_len))
    }

    /// Returns the number of octets of the encoded header.
    pub fn encoded_len(self) -> usize {
        self.tag.encoded_len() + self.length.encoded_len()
    }

    /// Writes the encoded header to a target.
    pub fn write_encoded(self, target: &mut impl BufMut) {
        self.tag.write_encoded(self.constructed, target);
        self.length.write_encoded(target);
    }
}


//------------ Functions -----------------------------------------------------

/// Reads a header from `buf` at `offset` using BER rules.
///
/// This is the same as [`Header::read`] with [`Mode::Ber`].
pub fn read_header(
    buf: &[u8], offset: usize, max_len: usize
) -> Result<(Header, usize), DecodeError> {
    Header::read(buf, offset, max_len, Mode::Ber)
}

/// Writes the encoded header to the target.
///
/// The short length form is used for lengths up to 127, the long form for
/// everything else.
pub fn write_header(header: &Header, target: &mut impl BufMut) {
    header.write_encoded(target)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::Pos;
    use super::*;

    #[test]
    fn length_symmetry() {
        for &len in &[0, 1, 127, 128, 255, 65535, 16_777_215] {
            let header = Header::primitive(Tag::OCTET_STRING, len);
            let mut buf = Vec::new();
            write_header(&header, &mut buf);
            let header_len = buf.len();
            assert_eq!(header_len, header.encoded_len());
            assert_eq!(buf[1] & 0x80 != 0, len > 127, "length form for {}", len);

            buf.resize(header_len + len, 0);
            let (decoded, consumed) = read_header(&buf, 0, buf.len()).unwrap();
            assert_eq!(decoded, header);
            assert_eq!(decoded.length().value(), Some(len));
            assert_eq!(consumed, header_len);
        }
    }

    #[test]
    fn read_with_offset() {
        let data = b"\xff\xff\x30\x03\x02\x01\x2a";
        let (header, len) = read_header(data, 2, 5).unwrap();
        assert_eq!(header, Header::constructed(Tag::SEQUENCE, 3));
        assert_eq!(len, 2);
        let (header, len) = read_header(data, 4, 3).unwrap();
        assert_eq!(header, Header::primitive(Tag::INTEGER, 1));
        assert_eq!(len, 2);
    }

    #[test]
    fn read_failures() {
        assert_eq!(
            read_header(b"", 0, 0).unwrap_err().kind(),
            &ErrorKind::HeaderTruncated
        );
        assert_eq!(
            read_header(b"\x30", 0, 1).unwrap_err().kind(),
            &ErrorKind::HeaderTruncated
        );
        assert_eq!(
            read_header(b"\x30\x82\x01", 0, 3).unwrap_err().kind(),
            &ErrorKind::HeaderTruncated
        );
        assert_eq!(
            read_header(b"\x04\x05abc", 0, 5).unwrap_err().kind(),
            &ErrorKind::LengthOverflow
        );

        // The window limits the value, not the buffer.
        assert_eq!(
            read_header(b"\x04\x03abc", 0, 4).unwrap_err().kind(),
            &ErrorKind::LengthOverflow
        );
        let err = read_header(b"\x00\x04\x03abc", 1, 4).unwrap_err();
        assert_eq!(err.pos(), Pos::from(1));

        // Indefinite length only for constructed values.
        let (header, _) = read_header(b"\x30\x80\x00\x00", 0, 4).unwrap();
        assert!(header.is_indefinite());
        assert!(read_header(b"\x04\x80\x00\x00", 0, 4).is_err());
        assert!(Header::read(b"\x30\x80\x00\x00", 0, 4, Mode::Der).is_err());
    }
}
