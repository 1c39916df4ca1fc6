//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use bytes::BufMut;
use smallvec::SmallVec;
use crate::decode::{ContentError, ErrorKind};
use crate::mode::Mode;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. Tag numbers up to 30 are encoded in the low five bits of
/// the first octet. Larger numbers set those five bits and follow with the
/// number in base 128, most significant digit first, with bit 8 set on all
/// but the last octet.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

impl Tag {
    /// The mask for the constructed bit in the first identifier octet.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The value of the number bits signalling high tag number form.
    const HIGH_FORM: u8 = 0x1f;

    /// The largest tag number that fits into the first octet.
    const MAX_LOW_FORM: u32 = 0x1e;

    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        matches!(self.class, Class::Universal)
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        matches!(self.class, Class::Context)
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::universal(20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::universal(21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::universal(25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::universal(28);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::universal(30);
}

/// # Encoding and Decoding
///
impl Tag {
    /// Takes the identifier octets from the beginning of `data`.
    ///
    /// Returns the tag, whether the value is constructed, and the number of
    /// octets the identifier occupied.
    pub fn take_from(
        data: &[u8], mode: Mode
    ) -> Result<(Self, bool, usize), ErrorKind> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err(ErrorKind::HeaderTruncated)
        };
        let class = Class::from_u8(first);
        let constructed = first & Self::CONSTRUCTED_MASK != 0;

        // If we have a single octet tag, we can already return.
        if first & Self::HIGH_FORM != Self::HIGH_FORM {
            return Ok((
                Self::new(class, u32::from(first & Self::HIGH_FORM)),
                constructed, 1
            ))
        }

        // Work your way through the subsequent octets.
        let mut number = 0u32;
        for (idx, &octet) in data.iter().enumerate().skip(1) {
            if idx == 1 && octet == 0x80 {
                return Err(ErrorKind::Content(ContentError::from_static(
                    "tag number with leading zero"
                )))
            }
            if number > (u32::MAX >> 7) {
                return Err(ErrorKind::Content(ContentError::from_static(
                    "tag number too large"
                )))
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                if mode.is_der() && number <= Self::MAX_LOW_FORM {
                    return Err(ErrorKind::Content(ContentError::from_static(
                        "high tag number form for low tag number in DER"
                    )))
                }
                return Ok((Self::new(class, number), constructed, idx + 1))
            }
        }
        Err(ErrorKind::HeaderTruncated)
    }

    /// Returns the identifier octets for this tag.
    ///
    /// If `constructed` is `true`, the octets will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn identifier_octets(self, constructed: bool) -> SmallVec<[u8; 6]> {
        let mut first = self.class.into_u8();
        if constructed {
            first |= Self::CONSTRUCTED_MASK
        }
        let mut res = SmallVec::new();
        if self.number <= Self::MAX_LOW_FORM {
            res.push(first | self.number as u8);
            return res
        }
        res.push(first | Self::HIGH_FORM);

        // Collect the base-128 digits least significant first, then reverse.
        let start = res.len();
        let mut number = self.number;
        res.push((number & 0x7f) as u8);
        number >>= 7;
        while number != 0 {
            res.push((number & 0x7f) as u8 | 0x80);
            number >>= 7;
        }
        res[start..].reverse();
        res
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.number <= Self::MAX_LOW_FORM {
            return 1
        }
        let mut res = 2;
        let mut number = self.number >> 7;
        while number != 0 {
            res += 1;
            number >>= 7;
        }
        res
    }

    /// Writes the identifier octets to a target.
    pub fn write_encoded(self, constructed: bool, target: &mut impl BufMut) {
        target.put_slice(&self.identifier_octets(constructed))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::VIDEOTEX_STRING => write!(f, "VideotexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GRAPHIC_STRING => write!(f, "GraphicString"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::UNIVERSAL_STRING => write!(f, "UniversalString"),
            Tag::BMP_STRING => write!(f, "BMPString"),
            tag => {
                match tag.class {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number)
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================
