//! The generic value model.
//!
//! This module contains [`Value`], the result of decoding data with the
//! template engine and the input when encoding it again. A value only
//! knows what kind of data it holds. How it is tagged and which fields a
//! sequence may have is described by the type descriptor used alongside.

use std::fmt;
use bytes::Bytes;
use crate::captured::Captured;
use crate::ident::Tag;
use crate::int::Integer;
use crate::oid::{ConstOid, Oid};
use crate::string::{BitString, CharString};


//------------ Value ---------------------------------------------------------

/// A decoded value of any supported type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// A BOOLEAN.
    Boolean(bool),

    /// A NULL.
    Null,

    /// An INTEGER or ENUMERATED.
    Integer(Integer),

    /// An OBJECT IDENTIFIER.
    Oid(Oid),

    /// A BIT STRING.
    BitString(BitString),

    /// An OCTET STRING.
    OctetString(Bytes),

    /// One of the character string or time types.
    CharString(CharString),

    /// A value of a type not known when decoding.
    Any(Any),

    /// A SEQUENCE with named fields.
    Sequence(Sequence),

    /// A SET OF values of the same type.
    SetOf(Vec<Value>),

    /// A SEQUENCE OF values of the same type.
    SequenceOf(Vec<Value>),
}

impl Value {
    /// Returns a short name of the kind of value for diagnostics.
    pub fn kind(&self) -> &'static str {
        match *self {
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Oid(_) => "OBJECT IDENTIFIER",
            Value::BitString(_) => "BIT STRING",
            Value::OctetString(_) => "OCTET STRING",
            Value::CharString(_) => "character string",
            Value::Any(_) => "ANY",
            Value::Sequence(_) => "SEQUENCE",
            Value::SetOf(_) => "SET OF",
            Value::SequenceOf(_) => "SEQUENCE OF",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match *self {
            Value::Integer(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match *self {
            Value::Oid(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self {
            Value::BitString(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_octet_string(&self) -> Option<&Bytes> {
        match *self {
            Value::OctetString(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match *self {
            Value::Sequence(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the items of a SET OF or SEQUENCE OF value.
    pub fn as_items(&self) -> Option<&[Value]> {
        match *self {
            Value::SetOf(ref items) | Value::SequenceOf(ref items) => {
                Some(items.as_slice())
            }
            _ => None
        }
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<Oid> for Value {
    fn from(value: Oid) -> Self {
        Value::Oid(value)
    }
}

impl From<ConstOid> for Value {
    fn from(value: ConstOid) -> Self {
        Value::Oid(value.into())
    }
}

impl From<BitString> for Value {
    fn from(value: BitString) -> Self {
        Value::BitString(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::OctetString(value)
    }
}

impl From<CharString> for Value {
    fn from(value: CharString) -> Self {
        Value::CharString(value)
    }
}

impl From<Any> for Value {
    fn from(value: Any) -> Self {
        Value::Any(value)
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Value::Sequence(value)
    }
}


//------------ Any -----------------------------------------------------------

/// A value of unknown type.
///
/// The value keeps its header information and the raw content octets so it
/// can be encoded again unchanged.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Any {
    tag: Tag,
    constructed: bool,
    content: Bytes,
}

impl Any {
    pub fn new(tag: Tag, constructed: bool, content: Bytes) -> Self {
        Any { tag, constructed, content }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}


//------------ Sequence ------------------------------------------------------

/// The fields of a SEQUENCE value.
///
/// Fields are kept in the order they appear in the encoding, each with the
/// name given in its type descriptor. Absent optional fields are simply
/// missing.
///
/// When produced by decoding, the sequence also keeps the complete encoding
/// it was decoded from, header included. This raw encoding is not taken
/// into account when comparing sequences.
#[derive(Clone, Default)]
pub struct Sequence {
    fields: Vec<(&'static str, Value)>,
    raw: Option<Captured>,
}

impl Sequence {
    /// Creates a new, empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Sequence { fields: Vec::with_capacity(capacity), raw: None }
    }

    /// Appends a field and returns the sequence.
    ///
    /// This is useful for building sequences in one expression.
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field to the sequence.
    pub fn push(&mut self, name: &'static str, value: impl Into<Value>) {
        self.fields.push((name, value.into()))
    }

    /// Returns the value of the field with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(field, _)| *field == name).map(|x| &x.1)
    }

    /// Returns whether the sequence contains a field with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns an iterator over the names and values of all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Returns the number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the raw encoding the sequence was decoded from.
    pub fn raw(&self) -> Option<&Captured> {
        self.raw.as_ref()
    }

    /// Sets the raw encoding of the sequence.
    pub fn set_raw(&mut self, raw: Captured) {
        self.raw = Some(raw)
    }
}


//--- PartialEq and Eq

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Sequence { }


//--- Debug

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


//============ Tests =========================================================
