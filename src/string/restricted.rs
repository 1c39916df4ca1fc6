//! Character string and time types.
//!
//! This is an internal module. It’s public items are re-exported by the
//! parent.

use std::{fmt, str};
use bytes::Bytes;
use crate::ident::Tag;


//------------ CharString ----------------------------------------------------

/// A value of one of the character string or time types.
///
/// The value keeps the tag it was encoded with and its raw content octets.
/// The character set of the tag is not checked, so a string can always be
/// re-encoded exactly as it was received.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CharString {
    /// The universal tag of the string type.
    tag: Tag,

    /// The content octets.
    content: Bytes,
}

impl CharString {
    /// The tags of all types represented by this type.
    pub const TAGS: &'static [Tag] = &[
        Tag::UTF8_STRING, Tag::NUMERIC_STRING, Tag::PRINTABLE_STRING,
        Tag::TELETEX_STRING, Tag::VIDEOTEX_STRING, Tag::IA5_STRING,
        Tag::UTC_TIME, Tag::GENERALIZED_TIME, Tag::GRAPHIC_STRING,
        Tag::VISIBLE_STRING, Tag::GENERAL_STRING, Tag::UNIVERSAL_STRING,
        Tag::BMP_STRING,
    ];

    /// Creates a new character string.
    ///
    /// Returns `None` if `tag` is not one of the character string or time
    /// types.
    pub fn new(tag: Tag, content: impl Into<Bytes>) -> Option<Self> {
        if Self::is_string_tag(tag) {
            Some(CharString { tag, content: content.into() })
        }
        else {
            None
        }
    }

    /// Returns whether the tag is that of a character string or time type.
    pub fn is_string_tag(tag: Tag) -> bool {
        Self::TAGS.contains(&tag)
    }

    /// Returns the tag of the string.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the content octets of the string.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Returns the content as a `str` if it is valid UTF-8.
    ///
    /// This is correct for the ASCII based types and UTF8String only.
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(self.content.as_ref()).ok()
    }
}

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.write_str(s),
            None => {
                for ch in self.content.iter() {
                    write!(f, "\\x{:02x}", ch)?;
                }
                Ok(())
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn string_tags() {
        let s = CharString::new(Tag::PRINTABLE_STRING, "hello").unwrap();
        assert_eq!(s.tag(), Tag::PRINTABLE_STRING);
        assert_eq!(s.as_str(), Some("hello"));
        assert_eq!(s.to_string(), "hello");
        assert!(CharString::new(Tag::UTC_TIME, "200101000000Z").is_some());
        assert!(CharString::new(Tag::OCTET_STRING, "hello").is_none());
        assert!(CharString::new(Tag::ctx(12), "hello").is_none());
    }
}
