//! Encoding values according to a type descriptor.
//!
//! Encoding happens in two passes like with any DER encoder. First, the
//! length of every value is calculated bottom-up. Then the headers and
//! contents are written. Both passes check the value against the
//! descriptor, so a value that passed the first one will also pass the
//! second one.

use bytes::{BufMut, Bytes};
use crate::encode::EncodeError;
use crate::header::Header;
use crate::ident::Tag;
use crate::length::Length;
use crate::value::{Sequence, Value};
use super::primitive::Codec;
use super::{FieldDesc, Repeat, TagMode, TypeDesc};


//------------ encode --------------------------------------------------------

/// Encodes a value of the given type using DER.
pub fn encode(value: &Value, desc: &TypeDesc) -> Result<Bytes, EncodeError> {
    let len = encoded_len(value, desc, None, desc.name())?;
    let mut target = Vec::with_capacity(len);
    write_encoded(value, desc, None, desc.name(), &mut target)?;
    debug_assert_eq!(target.len(), len);
    Ok(target.into())
}


//------------ Values --------------------------------------------------------

/// Returns the length of a complete encoded value.
fn encoded_len(
    value: &Value, desc: &TypeDesc, tag: Option<Tag>, name: &'static str
) -> Result<usize, EncodeError> {
    let (tag, constructed) = header_tag(value, desc, tag, name)?;
    let len = content_len(value, desc, name)?;
    Ok(header_len(tag, constructed, len) + len)
}

/// Writes a complete encoded value.
fn write_encoded(
    value: &Value, desc: &TypeDesc, tag: Option<Tag>, name: &'static str,
    target: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let (tag, constructed) = header_tag(value, desc, tag, name)?;
    let len = content_len(value, desc, name)?;
    Header::new(tag, constructed, Length::definite(len)).write_encoded(target);
    write_content(value, desc, name, target)
}

/// Returns the tag and constructed flag for the header of a value.
fn header_tag(
    value: &Value, desc: &TypeDesc, tag: Option<Tag>, name: &'static str
) -> Result<(Tag, bool), EncodeError> {
    let natural = match *desc {
        TypeDesc::Primitive(universal) => (universal, false),
        TypeDesc::Sequence(_) => (Tag::SEQUENCE, true),
        TypeDesc::Any => match *value {
            Value::Any(ref any) => (any.tag(), any.is_constructed()),
            _ => match primitive_tag(value) {
                Some(universal) => (universal, false),
                None => return Err(EncodeError::TypeMismatch(name))
            }
        }
    };
    Ok((tag.unwrap_or(natural.0), natural.1))
}

/// Returns the natural tag of a primitive value.
fn primitive_tag(value: &Value) -> Option<Tag> {
    match *value {
        Value::Boolean(_) => Some(Tag::BOOLEAN),
        Value::Null => Some(Tag::NULL),
        Value::Integer(_) => Some(Tag::INTEGER),
        Value::Oid(_) => Some(Tag::OID),
        Value::BitString(_) => Some(Tag::BIT_STRING),
        Value::OctetString(_) => Some(Tag::OCTET_STRING),
        Value::CharString(ref s) => Some(s.tag()),
        _ => None
    }
}

/// Returns the codec for a primitive value of the given type.
fn primitive_codec(
    value: &Value, universal: Tag, name: &'static str
) -> Result<&'static Codec, EncodeError> {
    let codec = Codec::get(universal).ok_or(EncodeError::TypeMismatch(name))?;
    if (codec.content_len)(universal, value).is_none() {
        return Err(EncodeError::TypeMismatch(name))
    }
    Ok(codec)
}

/// Returns the length of the content octets of a value.
fn content_len(
    value: &Value, desc: &TypeDesc, name: &'static str
) -> Result<usize, EncodeError> {
    match *desc {
        TypeDesc::Primitive(universal) => primitive_len(value, universal, name),
        TypeDesc::Any => match *value {
            Value::Any(ref any) => Ok(any.content().len()),
            _ => match primitive_tag(value) {
                Some(universal) => primitive_len(value, universal, name),
                None => Err(EncodeError::TypeMismatch(name))
            }
        },
        TypeDesc::Sequence(ref seq) => {
            let value = match value.as_sequence() {
                Some(value) => value,
                None => return Err(EncodeError::TypeMismatch(seq.name()))
            };
            check_field_names(value, seq.fields(), seq.name())?;
            let mut res = 0;
            for field in seq.fields() {
                res += field_len(value, field)?;
            }
            Ok(res)
        }
    }
}

fn primitive_len(
    value: &Value, universal: Tag, name: &'static str
) -> Result<usize, EncodeError> {
    Codec::get(universal).and_then(|codec| {
        (codec.content_len)(universal, value)
    }).ok_or(EncodeError::TypeMismatch(name))
}

/// Writes the content octets of a value.
fn write_content(
    value: &Value, desc: &TypeDesc, name: &'static str, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    match *desc {
        TypeDesc::Primitive(universal) => {
            let codec = primitive_codec(value, universal, name)?;
            (codec.write_content)(value, target);
            Ok(())
        }
        TypeDesc::Any => match *value {
            Value::Any(ref any) => {
                target.put_slice(any.content().as_ref());
                Ok(())
            }
            _ => match primitive_tag(value) {
                Some(universal) => {
                    let codec = primitive_codec(value, universal, name)?;
                    (codec.write_content)(value, target);
                    Ok(())
                }
                None => Err(EncodeError::TypeMismatch(name))
            }
        },
        TypeDesc::Sequence(ref seq) => {
            let value = match value.as_sequence() {
                Some(value) => value,
                None => return Err(EncodeError::TypeMismatch(seq.name()))
            };
            for field in seq.fields() {
                write_field(value, field, target)?;
            }
            Ok(())
        }
    }
}

/// Checks that a sequence doesn’t contain fields unknown to its type.
fn check_field_names(
    value: &Sequence, fields: &[FieldDesc], name: &'static str
) -> Result<(), EncodeError> {
    let known = value.iter().all(|(field_name, _)| {
        fields.iter().any(|field| field.name() == field_name)
    });
    if known {
        Ok(())
    }
    else {
        Err(EncodeError::TypeMismatch(name))
    }
}


//------------ Fields --------------------------------------------------------

/// Looks up the value and type of a field.
///
/// Returns `Ok(None)` if an optional field is absent.
fn field_parts<'a>(
    seq: &'a Sequence, field: &FieldDesc
) -> Result<Option<(&'a Value, &'static TypeDesc)>, EncodeError> {
    let value = match seq.get(field.name()) {
        Some(value) => value,
        None => {
            if field.is_optional() {
                return Ok(None)
            }
            return Err(EncodeError::MissingRequiredField(field.name()))
        }
    };
    match field.resolve(seq) {
        Some(ty) => Ok(Some((value, ty))),
        None => Err(EncodeError::UnsupportedSelectorValue(field.name())),
    }
}

/// Returns the encoded length of a field in a sequence.
fn field_len(seq: &Sequence, field: &FieldDesc) -> Result<usize, EncodeError> {
    let (value, ty) = match field_parts(seq, field)? {
        Some(parts) => parts,
        None => return Ok(0)
    };
    match field.tagging() {
        None => repeat_len(value, field, ty, None),
        Some(tagging) => match tagging.mode {
            TagMode::Implicit => {
                repeat_len(value, field, ty, Some(tagging.tag))
            }
            TagMode::Explicit => {
                let len = repeat_len(value, field, ty, None)?;
                Ok(header_len(tagging.tag, true, len) + len)
            }
        }
    }
}

/// Writes a field of a sequence.
fn write_field(
    seq: &Sequence, field: &FieldDesc, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let (value, ty) = match field_parts(seq, field)? {
        Some(parts) => parts,
        None => return Ok(())
    };
    match field.tagging() {
        None => write_repeat(value, field, ty, None, target),
        Some(tagging) => match tagging.mode {
            TagMode::Implicit => {
                write_repeat(value, field, ty, Some(tagging.tag), target)
            }
            TagMode::Explicit => {
                let len = repeat_len(value, field, ty, None)?;
                Header::constructed(tagging.tag, len).write_encoded(target);
                write_repeat(value, field, ty, None, target)
            }
        }
    }
}

/// Returns the items of a repeated field.
fn repeat_items<'a>(
    value: &'a Value, field: &FieldDesc
) -> Result<Option<(Tag, &'a [Value])>, EncodeError> {
    match (field.repeat(), value) {
        (Repeat::Single, _) => Ok(None),
        (Repeat::SetOf, Value::SetOf(items)) => {
            Ok(Some((Tag::SET, items.as_slice())))
        }
        (Repeat::SequenceOf, Value::SequenceOf(items)) => {
            Ok(Some((Tag::SEQUENCE, items.as_slice())))
        }
        _ => Err(EncodeError::TypeMismatch(field.name()))
    }
}

/// Returns the encoded length of all items of a repetition.
fn items_len(
    items: &[Value], ty: &TypeDesc, name: &'static str
) -> Result<usize, EncodeError> {
    let mut len = 0;
    for item in items {
        len += encoded_len(item, ty, None, name)?;
    }
    Ok(len)
}

/// Returns the encoded length of a field’s value or repetition.
fn repeat_len(
    value: &Value, field: &FieldDesc, ty: &TypeDesc, tag: Option<Tag>
) -> Result<usize, EncodeError> {
    let (outer, items) = match repeat_items(value, field)? {
        Some(items) => items,
        None => return encoded_len(value, ty, tag, field.name()),
    };
    let len = items_len(items, ty, field.name())?;
    Ok(header_len(tag.unwrap_or(outer), true, len) + len)
}

/// Writes a field’s value or repetition.
///
/// Items of a SET OF are written in the order given. Values decoded from
/// DER are already sorted correctly.
fn write_repeat(
    value: &Value, field: &FieldDesc, ty: &TypeDesc, tag: Option<Tag>,
    target: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let (outer, items) = match repeat_items(value, field)? {
        Some(items) => items,
        None => return write_encoded(value, ty, tag, field.name(), target),
    };
    let len = items_len(items, ty, field.name())?;
    Header::constructed(tag.unwrap_or(outer), len).write_encoded(target);
    for item in items {
        write_encoded(item, ty, None, field.name(), target)?;
    }
    Ok(())
}

fn header_len(tag: Tag, constructed: bool, len: usize) -> usize {
    Header::new(tag, constructed, Length::definite(len)).encoded_len()
}


//============ Tests =========================================================
