//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.
//!
//! The module also provides constants for the object identifiers used by
//! the certificate schema and a static table mapping them to their names.

use std::{fmt, hash, str};
use bytes::Bytes;
use smallvec::SmallVec;
use crate::decode::ContentError;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep a single object identifer in its BER encoding,
/// i.e., in some form of byte sequence. The components are only decoded
/// when iterating over them or displaying the identifier. Because different
/// representations may be useful, the type is generic over something that
/// can become a reference to a bytes slice.
///
/// Known object identifiers are defined as constants of
/// `Oid<&'static [u8]>`, available via the type alias [`ConstOid`]. The
/// `mkoid` binary shipped with the crate produces the octets for such
/// constants from the dotted notation.
#[derive(Clone)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;

impl Oid<Bytes> {
    /// Creates an object identifier from the content octets of a value.
    ///
    /// Checks that the octets form a sequence of correctly encoded
    /// sub-identifiers.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        if content.is_empty() {
            return Err(ContentError::from_static("empty OBJECT IDENTIFIER"))
        }
        if content[content.len() - 1] & 0x80 != 0 {
            return Err(ContentError::from_static(
                "truncated OBJECT IDENTIFIER"
            ))
        }
        let mut start = true;
        for &octet in content.iter() {
            if start && octet == 0x80 {
                return Err(ContentError::from_static(
                    "sub-identifier with leading zero"
                ))
            }
            start = octet & 0x80 == 0;
        }
        Ok(Oid(content))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns the encoded octets of the object identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns an iterator to the components of this object identifiers.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.0.as_ref())
    }

    /// Returns the name of the object identifier if it is known.
    pub fn name(&self) -> Option<&'static str> {
        name(self.as_slice())
    }
}

impl From<ConstOid> for Oid<Bytes> {
    fn from(oid: ConstOid) -> Self {
        Oid(Bytes::from_static(oid.0))
    }
}


//--- FromStr

impl str::FromStr for Oid<Bytes> {
    type Err = &'static str;

    /// Parses an object identifier from its ‘dot integer’ notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn component(s: &str) -> Result<u32, &'static str> {
            u32::from_str(s).map_err(|_| "only integer components allowed")
        }

        let mut components = s.split('.');
        let (first, second) = match (components.next(), components.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err("at least two components required")
        };
        let first = component(first)?;
        if first > 2 {
            return Err("first component can only be 0, 1, or 2.")
        }
        let second = component(second)?;
        if first < 2 && second >= 40 {
            return Err("second component for 0. and 1. must be less than 40")
        }

        let mut res = SmallVec::<[u8; 16]>::new();
        push_subidentifier(&mut res, u64::from(first) * 40 + u64::from(second));
        for item in components {
            push_subidentifier(&mut res, u64::from(component(item)?));
        }
        Ok(Oid(Bytes::copy_from_slice(&res)))
    }
}

/// Appends the base 128 encoding of a sub-identifier.
fn push_subidentifier(target: &mut SmallVec<[u8; 16]>, mut value: u64) {
    let start = target.len();
    target.push((value & 0x7f) as u8);
    value >>= 7;
    while value != 0 {
        target.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    target[start..].reverse();
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display and Debug

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for component in self.iter() {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            match component.to_u64() {
                Some(value) => write!(f, "{}", value)?,
                None => f.write_str("(overflow)")?,
            }
        }
        Ok(())
    }
}

impl<T: AsRef<[u8]>> fmt::Debug for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Oid({} {})", self, name),
            None => write!(f, "Oid({})", self),
        }
    }
}


//------------ Component -----------------------------------------------------

/// A component of an object identifier.
///
/// Although these components are integers, they are encoded in a slightly
/// inconvenient way. Because of this we don’t convert them to native integers
/// but rather keep them as references to the underlying octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Component<'a> {
    /// The position of the component in the object identifer.
    position: Position,

    /// The octets of the subidentifer.
    ///
    /// The most significant bit of each octet indicates whether there are
    /// more octets to follow, the lower seven bits are then shifted
    /// accordingly to make up an unsigned integer in big endian notation.
    slice: &'a [u8],
}

/// The position of the component in the object identifier.
///
/// As the first two components of the object identifer are encoded in the
/// first subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// This is the first component of the identifier.
    First,

    /// This is the second component of the identifier.
    Second,

    /// This is any later component of the identifier.
    Other,
}

impl<'a> Component<'a> {
    /// Attempts to convert the component to `u64`.
    ///
    /// Returns `None` if the component doesn’t fit.
    pub fn to_u64(self) -> Option<u64> {
        if self.slice.len() > 9 {
            return None
        }
        let res = self.slice.iter().fold(0u64, |res, &ch| {
            res << 7 | u64::from(ch & 0x7F)
        });
        match self.position {
            Position::First => Some(cmp_first(res)),
            Position::Second => Some(res - cmp_first(res) * 40),
            Position::Other => Some(res)
        }
    }
}

/// Returns the first component encoded in the first sub-identifier.
fn cmp_first(subid: u64) -> u64 {
    if subid < 40 { 0 }
    else if subid < 80 { 1 }
    else { 2 }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the components of an object identifier.
///
/// The first sub-identifier yields two components.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next component.
    position: Position,
}

impl<'a> Iter<'a> {
    fn new(slice: &'a [u8]) -> Self {
        Iter { slice, position: Position::First }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.slice.iter().position(|&x| x & 0x80 == 0)?;
        let head = &self.slice[..end + 1];
        let res = Component { slice: head, position: self.position };
        if self.position == Position::First {
            // The first sub-identifier is visited twice.
            self.position = Position::Second;
        }
        else {
            self.position = Position::Other;
            self.slice = &self.slice[end + 1..];
        }
        Some(res)
    }
}


//------------ Well-known Object Identifiers ---------------------------------

/// rsaEncryption, 1.2.840.113549.1.1.1.
pub const RSA_ENCRYPTION: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// sha1WithRSAEncryption, 1.2.840.113549.1.1.5.
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);

/// sha256WithRSAEncryption, 1.2.840.113549.1.1.11.
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// sha384WithRSAEncryption, 1.2.840.113549.1.1.12.
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);

/// sha512WithRSAEncryption, 1.2.840.113549.1.1.13.
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// id-sha256, 2.16.840.1.101.3.4.2.1.
pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

/// id-ce-subjectKeyIdentifier, 2.5.29.14.
pub const CE_SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);

/// id-ce-keyUsage, 2.5.29.15.
pub const CE_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// id-ce-subjectAltName, 2.5.29.17.
pub const CE_SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// id-ce-basicConstraints, 2.5.29.19.
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// id-ce-authorityKeyIdentifier, 2.5.29.35.
pub const CE_AUTHORITY_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 35]);

/// id-ce-extKeyUsage, 2.5.29.37.
pub const CE_EXT_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);

/// The names of the well-known object identifiers.
static NAMES: &[(ConstOid, &str)] = &[
    (RSA_ENCRYPTION, "rsaEncryption"),
    (SHA1_WITH_RSA_ENCRYPTION, "sha1WithRSAEncryption"),
    (SHA256_WITH_RSA_ENCRYPTION, "sha256WithRSAEncryption"),
    (SHA384_WITH_RSA_ENCRYPTION, "sha384WithRSAEncryption"),
    (SHA512_WITH_RSA_ENCRYPTION, "sha512WithRSAEncryption"),
    (SHA256, "sha256"),
    (CE_SUBJECT_KEY_IDENTIFIER, "subjectKeyIdentifier"),
    (CE_KEY_USAGE, "keyUsage"),
    (CE_SUBJECT_ALT_NAME, "subjectAltName"),
    (CE_BASIC_CONSTRAINTS, "basicConstraints"),
    (CE_AUTHORITY_KEY_IDENTIFIER, "authorityKeyIdentifier"),
    (CE_EXT_KEY_USAGE, "extendedKeyUsage"),
];

/// Returns the name for the encoded object identifier if it is known.
pub fn name(oid: &[u8]) -> Option<&'static str> {
    NAMES.iter().find(|(known, _)| known.0 == oid).map(|(_, name)| *name)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!(
            Oid::from_str("1.2.840.113549.1.1.11").unwrap(),
            SHA256_WITH_RSA_ENCRYPTION
        );
        assert_eq!(Oid::from_str("2.5.29.19").unwrap(), CE_BASIC_CONSTRAINTS);
        assert_eq!(
            Oid::from_str("1.3.6.1.4.1.55555.1.1").unwrap().as_slice(),
            b"\x2b\x06\x01\x04\x01\x83\xb2\x03\x01\x01"
        );
        assert!(Oid::from_str("3.1").is_err());
        assert!(Oid::from_str("1.40").is_err());
        assert!(Oid::from_str("1").is_err());
        assert!(Oid::from_str("1.2.x").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(RSA_ENCRYPTION.to_string(), "1.2.840.113549.1.1.1");
        assert_eq!(SHA256.to_string(), "2.16.840.1.101.3.4.2.1");
        assert_eq!(Oid(&b"\x2b\x06\x01"[..]).to_string(), "1.3.6.1");
        assert_eq!(Oid(&b"\x88\x37\x03"[..]).to_string(), "2.999.3");
    }

    #[test]
    fn components() {
        let oid = Oid(Bytes::from_static(b"\x2b\x06\x01\x83\xb2\x03"));
        assert_eq!(
            oid.iter().map(|c| c.to_u64()).collect::<Vec<_>>(),
            [Some(1), Some(3), Some(6), Some(1), Some(55555)]
        );
    }

    #[test]
    fn names() {
        assert_eq!(RSA_ENCRYPTION.name(), Some("rsaEncryption"));
        assert_eq!(
            Oid::from_str("2.5.29.37").unwrap().name(),
            Some("extendedKeyUsage")
        );
        assert_eq!(Oid::from_str("1.3.6.1").unwrap().name(), None);
    }

    #[test]
    fn from_content() {
        assert!(Oid::from_content(Bytes::from_static(b"\x2b\x06\x01")).is_ok());
        assert!(Oid::from_content(Bytes::new()).is_err());
        assert!(Oid::from_content(Bytes::from_static(b"\x2b\x86")).is_err());
        assert!(Oid::from_content(Bytes::from_static(b"\x2b\x80\x01")).is_err());
    }
}
