//! The codecs for primitive types.
//!
//! The codecs live in a table indexed by the number of their universal tag.

use bytes::{BufMut, Bytes};
use crate::decode::ContentError;
use crate::ident::{Class, Tag};
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::string::{BitString, CharString};
use crate::value::Value;


//------------ Codec ---------------------------------------------------------

/// The decoder and encoder for the content of one primitive type.
#[derive(Clone, Copy)]
pub struct Codec {
    /// The name of the type.
    pub name: &'static str,

    /// Decodes the content octets into a value.
    ///
    /// The tag is the universal tag of the type.
    pub decode: fn(Tag, Bytes, Mode) -> Result<Value, ContentError>,

    /// Returns the length of the content octets of a value.
    ///
    /// Returns `None` if the value is of the wrong kind for the type.
    pub content_len: fn(Tag, &Value) -> Option<usize>,

    /// Writes the content octets of a value.
    ///
    /// Must only be called if `content_len` returned `Some(_)`.
    pub write_content: fn(&Value, &mut Vec<u8>),
}

impl Codec {
    /// Returns the codec for a universal tag.
    pub fn get(tag: Tag) -> Option<&'static Codec> {
        if tag.class() != Class::Universal {
            return None
        }
        CODECS.get(tag.number() as usize).and_then(Option::as_ref)
    }
}

/// Returns the name of the primitive type with the given tag.
pub fn name(tag: Tag) -> &'static str {
    Codec::get(tag).map(|codec| codec.name).unwrap_or("unknown primitive")
}


//------------ The Table -----------------------------------------------------

static CODECS: [Option<Codec>; 31] = codecs();

const fn codecs() -> [Option<Codec>; 31] {
    let mut res = [None; 31];
    res[1] = Some(BOOLEAN);
    res[2] = Some(INTEGER);
    res[3] = Some(BIT_STRING);
    res[4] = Some(OCTET_STRING);
    res[5] = Some(NULL);
    res[6] = Some(OID);
    res[10] = Some(ENUMERATED);
    let mut i = 0;
    while i < CharString::TAGS.len() {
        res[CharString::TAGS[i].number() as usize] = Some(CHAR_STRING);
        i += 1;
    }
    res
}

const BOOLEAN: Codec = Codec {
    name: "BOOLEAN",
    decode: |_, content, mode| {
        match (&content[..], mode) {
            ([0], _) => Ok(Value::Boolean(false)),
            ([0xFF], _) | ([_], Mode::Ber) => Ok(Value::Boolean(true)),
            ([_], Mode::Der) => {
                Err(ContentError::from_static("invalid DER BOOLEAN"))
            }
            _ => Err(ContentError::from_static("invalid BOOLEAN length")),
        }
    },
    content_len: |_, value| value.as_bool().map(|_| 1),
    write_content: |value, target| {
        target.put_u8(if value.as_bool() == Some(true) { 0xFF } else { 0 })
    },
};

const INTEGER: Codec = Codec {
    name: "INTEGER",
    decode: |_, content, mode| {
        Integer::from_content(content, mode).map(Value::Integer)
    },
    content_len: |_, value| value.as_integer().map(Integer::content_len),
    write_content: |value, target| {
        if let Some(value) = value.as_integer() {
            value.write_content(target)
        }
    },
};

const ENUMERATED: Codec = Codec { name: "ENUMERATED", ..INTEGER };

const BIT_STRING: Codec = Codec {
    name: "BIT STRING",
    decode: |_, content, mode| {
        BitString::from_content(content, mode).map(Value::BitString)
    },
    content_len: |_, value| {
        value.as_bit_string().map(BitString::content_len)
    },
    write_content: |value, target| {
        if let Some(value) = value.as_bit_string() {
            value.write_content(target)
        }
    },
};

const OCTET_STRING: Codec = Codec {
    name: "OCTET STRING",
    decode: |_, content, _| Ok(Value::OctetString(content)),
    content_len: |_, value| value.as_octet_string().map(Bytes::len),
    write_content: |value, target| {
        if let Some(value) = value.as_octet_string() {
            target.put_slice(value.as_ref())
        }
    },
};

const NULL: Codec = Codec {
    name: "NULL",
    decode: |_, content, _| {
        if content.is_empty() {
            Ok(Value::Null)
        }
        else {
            Err(ContentError::from_static("invalid NULL value"))
        }
    },
    content_len: |_, value| match *value {
        Value::Null => Some(0),
        _ => None
    },
    write_content: |_, _| { },
};

const OID: Codec = Codec {
    name: "OBJECT IDENTIFIER",
    decode: |_, content, _| Oid::from_content(content).map(Value::Oid),
    content_len: |_, value| value.as_oid().map(|oid| oid.as_slice().len()),
    write_content: |value, target| {
        if let Some(value) = value.as_oid() {
            target.put_slice(value.as_slice())
        }
    },
};

const CHAR_STRING: Codec = Codec {
    name: "character string",
    decode: |tag, content, _| {
        CharString::new(tag, content).map(Value::CharString).ok_or(
            ContentError::from_static("not a character string type")
        )
    },
    content_len: |tag, value| match *value {
        Value::CharString(ref value) if value.tag() == tag => {
            Some(value.content().len())
        }
        _ => None
    },
    write_content: |value, target| {
        if let Value::CharString(ref value) = *value {
            target.put_slice(value.content().as_ref())
        }
    },
};


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn decode(tag: Tag, content: &'static [u8], mode: Mode) -> Result<Value, ContentError> {
        let codec = Codec::get(tag).unwrap();
        (codec.decode)(tag, Bytes::from_static(content), mode)
    }

    fn encode(tag: Tag, value: &Value) -> Option<Vec<u8>> {
        let codec = Codec::get(tag).unwrap();
        let len = (codec.content_len)(tag, value)?;
        let mut res = Vec::new();
        (codec.write_content)(value, &mut res);
        assert_eq!(res.len(), len);
        Some(res)
    }

    #[test]
    fn table() {
        assert!(Codec::get(Tag::SEQUENCE).is_none());
        assert!(Codec::get(Tag::SET).is_none());
        assert!(Codec::get(Tag::ctx(2)).is_none());
        assert!(Codec::get(Tag::universal(31)).is_none());
        assert_eq!(name(Tag::UTC_TIME), "character string");
        assert_eq!(name(Tag::ENUMERATED), "ENUMERATED");
    }

    #[test]
    fn boolean() {
        assert_eq!(decode(Tag::BOOLEAN, b"\x00", Mode::Der), Ok(Value::Boolean(false)));
        assert_eq!(decode(Tag::BOOLEAN, b"\xff", Mode::Der), Ok(Value::Boolean(true)));
        assert_eq!(decode(Tag::BOOLEAN, b"\x01", Mode::Ber), Ok(Value::Boolean(true)));
        assert!(decode(Tag::BOOLEAN, b"\x01", Mode::Der).is_err());
        assert!(decode(Tag::BOOLEAN, b"", Mode::Ber).is_err());
        assert!(decode(Tag::BOOLEAN, b"\x00\x00", Mode::Ber).is_err());
        assert_eq!(encode(Tag::BOOLEAN, &Value::Boolean(true)), Some(vec![0xff]));
        assert_eq!(encode(Tag::BOOLEAN, &Value::Null), None);
    }

    #[test]
    fn null_and_strings() {
        assert_eq!(decode(Tag::NULL, b"", Mode::Der), Ok(Value::Null));
        assert!(decode(Tag::NULL, b"\x00", Mode::Ber).is_err());
        assert_eq!(encode(Tag::NULL, &Value::Null), Some(vec![]));

        let value = decode(Tag::IA5_STRING, b"a@b", Mode::Der).unwrap();
        assert_eq!(encode(Tag::IA5_STRING, &value), Some(b"a@b".to_vec()));
        assert_eq!(encode(Tag::UTF8_STRING, &value), None);
    }
}
