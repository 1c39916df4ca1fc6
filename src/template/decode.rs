//! Decoding data according to a type descriptor.
//!
//! All functions here operate on the complete input and an explicit cursor.
//! They take the offset of the value to decode and the end of the enclosing
//! content and return the decoded value together with the offset right
//! after it.

use bytes::Bytes;
use crate::captured::Captured;
use crate::decode::{ContentError, DecodeError, ErrorKind};
use crate::header::Header;
use crate::ident::Tag;
use crate::mode::Mode;
use crate::value::{Any, Sequence, Value};
use super::primitive::Codec;
use super::{FieldDesc, Repeat, SequenceDesc, TagMode, TypeDesc};


//------------ decode --------------------------------------------------------

/// Decodes a complete value of the given type.
///
/// The data must contain exactly one value. Any octets left over after it
/// result in a [`ErrorKind::TrailingData`] error.
///
/// Octet payloads of the returned value are slices of `data`.
///
/// The value itself must use the natural tag of `desc`. Tagging can only be
/// given to fields, so a type that is IMPLICIT tagged as a whole has to be
/// described as a field of an enclosing sequence.
pub fn decode(
    data: Bytes, desc: &TypeDesc, mode: Mode
) -> Result<Value, DecodeError> {
    let end = data.len();
    let (value, next) = decode_type(
        &data, 0, end, desc, None, desc.name(), mode
    )?;
    if next != end {
        return Err(DecodeError::new(ErrorKind::TrailingData, next))
    }
    Ok(value)
}


//------------ Values --------------------------------------------------------

/// Reads the header of a value and checks it.
///
/// Indefinite length values are recognized but not supported. Returns the
/// header, the start and the end of the content.
fn read_header(
    data: &Bytes, pos: usize, end: usize, mode: Mode
) -> Result<(Header, usize, usize), DecodeError> {
    let (header, header_len) = Header::read(data, pos, end - pos, mode)?;
    let start = pos + header_len;
    match header.length().value() {
        Some(len) => Ok((header, start, start + len)),
        None => Err(DecodeError::content(
            "indefinite length not supported", pos
        ))
    }
}

/// Decodes a value of the given type.
///
/// If `tag` is given, it replaces the natural tag of the type. If the tag
/// doesn’t match, a missing field error with `name` is returned.
fn decode_type(
    data: &Bytes, pos: usize, end: usize,
    desc: &TypeDesc, tag: Option<Tag>, name: &'static str, mode: Mode,
) -> Result<(Value, usize), DecodeError> {
    let (header, start, content_end) = read_header(data, pos, end, mode)?;
    if let Some(expected) = tag.or_else(|| desc.natural_tag()) {
        if header.tag() != expected {
            return Err(DecodeError::new(
                ErrorKind::MissingRequiredField(name), pos
            ))
        }
    }
    let value = match *desc {
        TypeDesc::Primitive(universal) => {
            if header.is_constructed() {
                return Err(DecodeError::content(
                    "constructed encoding not supported", pos
                ))
            }
            let codec = match Codec::get(universal) {
                Some(codec) => codec,
                None => {
                    return Err(DecodeError::content(
                        "unsupported primitive type", pos
                    ))
                }
            };
            (codec.decode)(
                universal, data.slice(start..content_end), mode
            ).map_err(|err| DecodeError::content(err, pos))?
        }
        TypeDesc::Any => {
            Value::Any(Any::new(
                header.tag(), header.is_constructed(),
                data.slice(start..content_end)
            ))
        }
        TypeDesc::Sequence(ref seq) => {
            if !header.is_constructed() {
                return Err(primitive_constructed(pos))
            }
            let mut res = decode_fields(data, start, content_end, seq, mode)?;
            res.set_raw(Captured::new(data.slice(pos..content_end)));
            Value::Sequence(res)
        }
    };
    Ok((value, content_end))
}

/// Decodes the fields of a sequence from its content.
fn decode_fields(
    data: &Bytes, start: usize, end: usize, seq: &SequenceDesc, mode: Mode
) -> Result<Sequence, DecodeError> {
    let mut res = Sequence::with_capacity(seq.fields().len());
    let mut pos = start;
    for field in seq.fields() {
        if pos >= end {
            if field.is_optional() {
                continue
            }
            return Err(DecodeError::new(ErrorKind::Truncated, pos))
        }
        let ty = match field.resolve(&res) {
            Some(ty) => ty,
            None => {
                return Err(DecodeError::new(
                    ErrorKind::UnsupportedSelectorValue(field.name()), pos
                ))
            }
        };

        // Peek at the next value to see if it is ours.
        if let Some(expected) = field.outer_tag(ty) {
            let (header, _) = Header::read(data, pos, end - pos, mode)?;
            if header.tag() != expected {
                if field.is_optional() {
                    continue
                }
                return Err(DecodeError::new(
                    ErrorKind::MissingRequiredField(field.name()), pos
                ))
            }
        }

        let (value, next) = decode_field(data, pos, end, field, ty, mode)?;
        res.push(field.name(), value);
        pos = next;
    }
    if pos != end {
        return Err(DecodeError::new(ErrorKind::TrailingData, pos))
    }
    Ok(res)
}

/// Decodes a field whose presence has been established.
fn decode_field(
    data: &Bytes, pos: usize, end: usize,
    field: &FieldDesc, ty: &TypeDesc, mode: Mode,
) -> Result<(Value, usize), DecodeError> {
    let tagging = match field.tagging() {
        Some(tagging) => tagging,
        None => return decode_repeat(data, pos, end, field, ty, None, mode),
    };
    match tagging.mode {
        TagMode::Implicit => {
            decode_repeat(data, pos, end, field, ty, Some(tagging.tag), mode)
        }
        TagMode::Explicit => {
            let (header, start, content_end) = read_header(
                data, pos, end, mode
            )?;
            if header.tag() != tagging.tag {
                return Err(DecodeError::new(
                    ErrorKind::MissingRequiredField(field.name()), pos
                ))
            }
            if !header.is_constructed() {
                return Err(primitive_constructed(pos))
            }
            if start == content_end {
                return Err(DecodeError::new(ErrorKind::Truncated, start))
            }
            let (value, next) = decode_repeat(
                data, start, content_end, field, ty, None, mode
            )?;
            if next != content_end {
                return Err(DecodeError::new(ErrorKind::TrailingData, next))
            }
            Ok((value, content_end))
        }
    }
}

/// Decodes a single value or a repetition for a field.
///
/// The `tag` replaces the outermost tag, i.e., that of the repetition if
/// there is one.
fn decode_repeat(
    data: &Bytes, pos: usize, end: usize,
    field: &FieldDesc, ty: &TypeDesc, tag: Option<Tag>, mode: Mode,
) -> Result<(Value, usize), DecodeError> {
    let outer = match field.repeat() {
        Repeat::Single => {
            return decode_type(data, pos, end, ty, tag, field.name(), mode)
        }
        Repeat::SetOf => Tag::SET,
        Repeat::SequenceOf => Tag::SEQUENCE,
    };
    let (header, start, content_end) = read_header(data, pos, end, mode)?;
    if header.tag() != tag.unwrap_or(outer) {
        return Err(DecodeError::new(
            ErrorKind::MissingRequiredField(field.name()), pos
        ))
    }
    if !header.is_constructed() {
        return Err(primitive_constructed(pos))
    }
    let mut items = Vec::new();
    let mut item_pos = start;
    while item_pos < content_end {
        let (item, next) = decode_type(
            data, item_pos, content_end, ty, None, field.name(), mode
        )?;
        items.push(item);
        item_pos = next;
    }
    let value = match field.repeat() {
        Repeat::SetOf => Value::SetOf(items),
        _ => Value::SequenceOf(items),
    };
    Ok((value, content_end))
}

fn primitive_constructed(pos: usize) -> DecodeError {
    DecodeError::content(
        ContentError::from_static("primitive encoding of constructed type"),
        pos
    )
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::Pos;
    use crate::int::Integer;
    use crate::oid::{self, ConstOid};
    use crate::template::{FieldDesc, Selector};
    use super::*;

    static INTEGER: TypeDesc = TypeDesc::Primitive(Tag::INTEGER);
    static BOOLEAN: TypeDesc = TypeDesc::Primitive(Tag::BOOLEAN);
    static OCTET_STRING: TypeDesc = TypeDesc::Primitive(Tag::OCTET_STRING);
    static OID: TypeDesc = TypeDesc::Primitive(Tag::OID);
    static NULL: TypeDesc = TypeDesc::Primitive(Tag::NULL);

    static RECORD_FIELDS: [FieldDesc; 4] = [
        FieldDesc::new("version", &INTEGER).optional().explicit(Tag::ctx(0)),
        FieldDesc::new("id", &INTEGER),
        FieldDesc::new("flag", &BOOLEAN).optional(),
        FieldDesc::new("data", &OCTET_STRING).implicit(Tag::ctx(1)),
    ];
    static RECORD: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("Record", &RECORD_FIELDS)
    );

    static LIST_FIELDS: [FieldDesc; 2] = [
        FieldDesc::new("items", &INTEGER).sequence_of(),
        FieldDesc::new("set", &BOOLEAN).set_of().implicit(Tag::ctx(2))
            .optional(),
    ];
    static LIST: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("List", &LIST_FIELDS)
    );

    static WRAPPED_FIELDS: [FieldDesc; 1] = [
        FieldDesc::new("value", &INTEGER).explicit(Tag::ctx(0)),
    ];
    static WRAPPED: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("Wrapped", &WRAPPED_FIELDS)
    );

    static INNER_FIELDS: [FieldDesc; 1] = [
        FieldDesc::new("x", &INTEGER),
    ];
    static INNER: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("Inner", &INNER_FIELDS)
    );
    static OUTER_FIELDS: [FieldDesc; 1] = [
        FieldDesc::new("inner", &INNER).implicit(Tag::ctx(1)),
    ];
    static OUTER: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("Outer", &OUTER_FIELDS)
    );

    static BIT_STRING: TypeDesc = TypeDesc::Primitive(Tag::BIT_STRING);

    static PARAMS_CHOICES: [(ConstOid, &TypeDesc); 1] = [
        (oid::RSA_ENCRYPTION, &NULL)
    ];
    static PARAMS: Selector = Selector::new(
        "algorithm", &PARAMS_CHOICES, None
    );
    static ALG_FIELDS: [FieldDesc; 2] = [
        FieldDesc::new("algorithm", &OID),
        FieldDesc::selected("parameters", &PARAMS).optional(),
    ];
    static ALG: TypeDesc = TypeDesc::Sequence(
        SequenceDesc::new("Alg", &ALG_FIELDS)
    );

    fn decode_der(data: &'static [u8], desc: &TypeDesc) -> Result<Value, DecodeError> {
        decode(Bytes::from_static(data), desc, Mode::Der)
    }

    fn kind(res: Result<Value, DecodeError>) -> ErrorKind {
        res.unwrap_err().kind().clone()
    }

    #[test]
    fn all_fields_present() {
        let data = b"\x30\x0f\xa0\x03\x02\x01\x02\x02\x01\x2a\x01\x01\xff\
                     \x81\x02ab";
        let value = decode_der(data, &RECORD).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(
            seq.get("version").and_then(Value::as_integer),
            Some(&Integer::from_i64(2))
        );
        assert_eq!(
            seq.get("id").and_then(Value::as_integer),
            Some(&Integer::from_i64(42))
        );
        assert_eq!(seq.get("flag").and_then(Value::as_bool), Some(true));
        assert_eq!(
            seq.get("data").and_then(Value::as_octet_string).unwrap().as_ref(),
            b"ab"
        );
        assert_eq!(seq.raw().unwrap().as_slice(), &data[..]);
    }

    #[test]
    fn optional_fields_skipped() {
        let value = decode_der(b"\x30\x07\x02\x01\x2a\x81\x02ab", &RECORD);
        let value = value.unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(
            seq.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            ["id", "data"]
        );
    }

    #[test]
    fn field_errors() {
        // Required field with the wrong tag.
        assert_eq!(
            kind(decode_der(b"\x30\x03\x01\x01\xff", &RECORD)),
            ErrorKind::MissingRequiredField("id")
        );

        // Content ends before the required data field.
        assert_eq!(
            kind(decode_der(b"\x30\x03\x02\x01\x2a", &RECORD)),
            ErrorKind::Truncated
        );

        // Another value after the last field.
        assert_eq!(
            kind(decode_der(b"\x30\x09\x02\x01\x2a\x81\x00\x05\x00\x05\x00", &RECORD)),
            ErrorKind::TrailingData
        );
        let err = decode_der(b"\x30\x07\x02\x01\x2a\x81\x00\x05\x00", &RECORD)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TrailingData);
        assert_eq!(err.pos(), Pos::from(7));

        // Data after the value itself.
        assert_eq!(
            kind(decode_der(b"\x30\x05\x02\x01\x2a\x81\x00\x00", &RECORD)),
            ErrorKind::TrailingData
        );

        // Wrong outer tag.
        assert_eq!(
            kind(decode_der(b"\x31\x05\x02\x01\x2a\x81\x00", &RECORD)),
            ErrorKind::MissingRequiredField("Record")
        );

        // Outer length beyond the data.
        assert_eq!(
            kind(decode_der(b"\x30\x09\x02\x01\x2a\x81\x00", &RECORD)),
            ErrorKind::LengthOverflow
        );
    }

    #[test]
    fn indefinite_length_rejected() {
        let res = decode(
            Bytes::from_static(b"\x30\x80\x02\x01\x2a\x81\x00\x00\x00"),
            &RECORD, Mode::Ber
        );
        assert!(matches!(kind(res), ErrorKind::Content(_)));
    }

    #[test]
    fn repetitions() {
        let value = decode_der(
            b"\x30\x0f\x30\x06\x02\x01\x01\x02\x01\x02\xa2\x03\x01\x01\x00\
              \x30\x00",
            &LIST
        );
        assert_eq!(kind(value), ErrorKind::TrailingData);

        let value = decode_der(
            b"\x30\x0c\x30\x06\x02\x01\x01\x02\x01\x02\xa2\x02\x01\x00",
            &LIST
        );
        assert!(value.is_err());

        let value = decode_der(
            b"\x30\x0d\x30\x06\x02\x01\x01\x02\x01\x02\xa2\x03\x01\x01\x00",
            &LIST
        ).unwrap();
        let seq = value.as_sequence().unwrap();
        let items = seq.get("items").and_then(Value::as_items).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_integer(), Some(&Integer::from_i64(2)));
        assert_eq!(
            seq.get("set"), Some(&Value::SetOf(vec![Value::Boolean(false)]))
        );

        let value = decode_der(b"\x30\x02\x30\x00", &LIST).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.get("items"), Some(&Value::SequenceOf(Vec::new())));
        assert!(!seq.contains("set"));

        // A wrong item inside the repetition.
        assert_eq!(
            kind(decode_der(b"\x30\x05\x30\x03\x01\x01\x00", &LIST)),
            ErrorKind::MissingRequiredField("items")
        );
    }

    #[test]
    fn selector() {
        let value = decode_der(
            b"\x30\x0d\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01\x05\x00",
            &ALG
        ).unwrap();
        assert_eq!(
            value.as_sequence().unwrap().get("parameters"), Some(&Value::Null)
        );

        // Without parameters, the selector isn’t needed.
        let value = decode_der(b"\x30\x03\x06\x01\x2a", &ALG).unwrap();
        assert_eq!(value.as_sequence().unwrap().len(), 1);

        // Unknown algorithm with parameters and no default.
        assert_eq!(
            kind(decode_der(b"\x30\x05\x06\x01\x2a\x05\x00", &ALG)),
            ErrorKind::UnsupportedSelectorValue("parameters")
        );
    }

    #[test]
    fn explicit_wrapper() {
        let value = decode_der(b"\x30\x05\xa0\x03\x02\x01\x02", &WRAPPED)
            .unwrap();
        assert_eq!(
            value.as_sequence().unwrap().get("value"),
            Some(&Value::Integer(Integer::from_i64(2)))
        );

        // The wrapper must be constructed.
        assert!(matches!(
            kind(decode_der(b"\x30\x05\x80\x03\x02\x01\x02", &WRAPPED)),
            ErrorKind::Content(_)
        ));

        // An empty wrapper is missing its value.
        assert_eq!(
            kind(decode_der(b"\x30\x02\xa0\x00", &WRAPPED)),
            ErrorKind::Truncated
        );

        // The wrapper holds exactly one value.
        assert_eq!(
            kind(decode_der(
                b"\x30\x07\xa0\x05\x02\x01\x02\x05\x00", &WRAPPED
            )),
            ErrorKind::TrailingData
        );
    }

    #[test]
    fn implicit_sequence() {
        let value = decode_der(b"\x30\x05\xa1\x03\x02\x01\x05", &OUTER)
            .unwrap();
        let inner = value.as_sequence().unwrap().get("inner").unwrap();
        let inner = inner.as_sequence().unwrap();
        assert_eq!(
            inner.get("x").and_then(Value::as_integer),
            Some(&Integer::from_i64(5))
        );
        assert_eq!(inner.raw().unwrap().as_slice(), b"\xa1\x03\x02\x01\x05");

        // The natural tag is replaced.
        assert_eq!(
            kind(decode_der(b"\x30\x05\x30\x03\x02\x01\x05", &OUTER)),
            ErrorKind::MissingRequiredField("inner")
        );

        // The sequence still has to be constructed.
        assert!(matches!(
            kind(decode_der(b"\x30\x05\x81\x03\x02\x01\x05", &OUTER)),
            ErrorKind::Content(_)
        ));

        // On its own, the tagged value doesn’t match the type.
        assert_eq!(
            kind(decode_der(b"\xa1\x03\x02\x01\x05", &INNER)),
            ErrorKind::MissingRequiredField("Inner")
        );
    }

    #[test]
    fn empty_bit_string_keeps_unused() {
        let data = Bytes::from_static(b"\x03\x01\x03");
        let value = decode(data.clone(), &BIT_STRING, Mode::Ber).unwrap();
        assert_eq!(value.as_bit_string().map(|bits| bits.unused()), Some(3));
        assert_eq!(crate::template::encode(&value, &BIT_STRING), Ok(data));
        assert!(matches!(
            kind(decode_der(b"\x03\x01\x03", &BIT_STRING)),
            ErrorKind::Content(_)
        ));
    }
}
