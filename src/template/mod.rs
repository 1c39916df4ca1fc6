//! Declaration-driven decoding and encoding.
//!
//! Instead of writing a parser for every structure, the structure is
//! described by a [`TypeDesc`]. The template engine interprets such a
//! descriptor to turn encoded data into a [`Value`][crate::Value] via
//! [`decode`] and a value back into its DER encoding via [`encode`].
//!
//! Descriptors are meant to be `static` values. All constructors are
//! `const fn`s, so a structure such as
//!
//! ```text
//! AlgorithmIdentifier ::= SEQUENCE {
//!     algorithm   OBJECT IDENTIFIER,
//!     parameters  ANY DEFINED BY algorithm OPTIONAL }
//! ```
//!
//! can be written like this:
//!
//! ```
//! use bercert::Tag;
//! use bercert::template::{FieldDesc, SequenceDesc, TypeDesc};
//!
//! static OID: TypeDesc = TypeDesc::Primitive(Tag::OID);
//! static FIELDS: [FieldDesc; 2] = [
//!     FieldDesc::new("algorithm", &OID),
//!     FieldDesc::new("parameters", &TypeDesc::Any).optional(),
//! ];
//! static ALGORITHM_IDENTIFIER: TypeDesc = TypeDesc::Sequence(
//!     SequenceDesc::new("AlgorithmIdentifier", &FIELDS)
//! );
//! ```
//!
//! The engine does not backtrack. An optional field is skipped if the tag
//! of the next value doesn’t match, so an optional field must have a tag
//! different from all the fields that may follow it. An optional field of
//! type ANY can only be the last field. [`SequenceDesc::validate`] checks
//! these rules.

pub use self::decode::decode;
pub use self::encode::encode;

mod decode;
mod encode;
mod primitive;

use crate::ident::Tag;
use crate::oid::ConstOid;
use crate::value::Sequence;


//------------ TypeDesc ------------------------------------------------------

/// The description of a type.
#[derive(Clone, Copy, Debug)]
pub enum TypeDesc {
    /// A primitive type identified by its universal tag.
    Primitive(Tag),

    /// Any value at all.
    Any,

    /// A SEQUENCE with the given fields.
    Sequence(SequenceDesc),
}

impl TypeDesc {
    /// Returns the name of the type for diagnostics.
    pub fn name(&self) -> &'static str {
        match *self {
            TypeDesc::Primitive(tag) => primitive::name(tag),
            TypeDesc::Any => "ANY",
            TypeDesc::Sequence(ref seq) => seq.name,
        }
    }

    /// Returns the tag of the type if it isn’t tagged otherwise.
    ///
    /// Returns `None` for ANY since it matches every tag.
    pub fn natural_tag(&self) -> Option<Tag> {
        match *self {
            TypeDesc::Primitive(tag) => Some(tag),
            TypeDesc::Any => None,
            TypeDesc::Sequence(_) => Some(Tag::SEQUENCE),
        }
    }
}


//------------ SequenceDesc --------------------------------------------------

/// The description of a SEQUENCE type.
#[derive(Clone, Copy, Debug)]
pub struct SequenceDesc {
    /// The name of the type.
    name: &'static str,

    /// The fields in order.
    fields: &'static [FieldDesc],
}

impl SequenceDesc {
    pub const fn new(name: &'static str, fields: &'static [FieldDesc]) -> Self {
        SequenceDesc { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldDesc] {
        self.fields
    }

    /// Checks that all optional fields can be told apart from what follows.
    ///
    /// Returns the name of the first offending field on failure. Nested
    /// sequences are checked, too.
    pub fn validate(&self) -> Result<(), &'static str> {
        for (idx, field) in self.fields.iter().enumerate() {
            field.validate_nested()?;
            if !field.optional {
                continue
            }
            let tags = match field.outer_tags() {
                Some(tags) => tags,
                None => {
                    if idx + 1 == self.fields.len() {
                        continue
                    }
                    return Err(field.name)
                }
            };

            // Compare with all following fields up to and including the
            // first required one.
            for next in &self.fields[idx + 1..] {
                match next.outer_tags() {
                    Some(next_tags) => {
                        if next_tags.iter().any(|tag| tags.contains(tag)) {
                            return Err(field.name)
                        }
                    }
                    None => return Err(field.name)
                }
                if !next.optional {
                    break
                }
            }
        }
        Ok(())
    }
}


//------------ FieldDesc -----------------------------------------------------

/// The description of a field in a sequence.
#[derive(Clone, Copy, Debug)]
pub struct FieldDesc {
    /// The name of the field.
    name: &'static str,

    /// The type of the field.
    ty: FieldType,

    /// The tagging of the field if it isn’t using its natural tag.
    tagging: Option<Tagging>,

    /// Whether the field may be absent.
    optional: bool,

    /// Whether the field is a repetition of its type.
    repeat: Repeat,
}

impl FieldDesc {
    /// Creates a required, untagged field of a fixed type.
    pub const fn new(name: &'static str, ty: &'static TypeDesc) -> Self {
        FieldDesc {
            name,
            ty: FieldType::Fixed(ty),
            tagging: None,
            optional: false,
            repeat: Repeat::Single,
        }
    }

    /// Creates a required, untagged field whose type is selected.
    pub const fn selected(
        name: &'static str, selector: &'static Selector
    ) -> Self {
        FieldDesc {
            name,
            ty: FieldType::Selected(selector),
            tagging: None,
            optional: false,
            repeat: Repeat::Single,
        }
    }

    /// Marks the field as optional.
    pub const fn optional(self) -> Self {
        FieldDesc { optional: true, ..self }
    }

    /// Tags the field implicitly with the given tag.
    pub const fn implicit(self, tag: Tag) -> Self {
        FieldDesc {
            tagging: Some(Tagging { tag, mode: TagMode::Implicit }),
            ..self
        }
    }

    /// Tags the field explicitly with the given tag.
    pub const fn explicit(self, tag: Tag) -> Self {
        FieldDesc {
            tagging: Some(Tagging { tag, mode: TagMode::Explicit }),
            ..self
        }
    }

    /// Turns the field into a SET OF its type.
    pub const fn set_of(self) -> Self {
        FieldDesc { repeat: Repeat::SetOf, ..self }
    }

    /// Turns the field into a SEQUENCE OF its type.
    pub const fn sequence_of(self) -> Self {
        FieldDesc { repeat: Repeat::SequenceOf, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn tagging(&self) -> Option<Tagging> {
        self.tagging
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Resolves the type of the field.
    ///
    /// For selected fields, the earlier fields of the sequence are needed.
    /// Returns `None` if the selector doesn’t produce a type.
    pub fn resolve(&self, siblings: &Sequence) -> Option<&'static TypeDesc> {
        match self.ty {
            FieldType::Fixed(ty) => Some(ty),
            FieldType::Selected(selector) => selector.select(siblings),
        }
    }

    /// Returns the tag the encoding of the field starts with.
    ///
    /// Returns `None` if the field may start with any tag.
    fn outer_tag(&self, ty: &TypeDesc) -> Option<Tag> {
        if let Some(tagging) = self.tagging {
            return Some(tagging.tag)
        }
        match self.repeat {
            Repeat::Single => ty.natural_tag(),
            Repeat::SetOf => Some(Tag::SET),
            Repeat::SequenceOf => Some(Tag::SEQUENCE),
        }
    }

    /// Returns all tags the encoding of the field may start with.
    ///
    /// Returns `None` if the field may start with any tag.
    fn outer_tags(&self) -> Option<Vec<Tag>> {
        match self.ty {
            FieldType::Fixed(ty) => self.outer_tag(ty).map(|tag| vec![tag]),
            FieldType::Selected(selector) => {
                let mut res = Vec::new();
                for ty in selector.types() {
                    res.push(self.outer_tag(ty)?);
                }
                Some(res)
            }
        }
    }

    fn validate_nested(&self) -> Result<(), &'static str> {
        let check = |ty: &TypeDesc| match *ty {
            TypeDesc::Sequence(ref seq) => seq.validate(),
            _ => Ok(())
        };
        match self.ty {
            FieldType::Fixed(ty) => check(ty),
            FieldType::Selected(selector) => {
                selector.types().try_for_each(check)
            }
        }
    }
}


//------------ FieldType -----------------------------------------------------

/// The type of a field.
#[derive(Clone, Copy, Debug)]
pub enum FieldType {
    /// The field always has the same type.
    Fixed(&'static TypeDesc),

    /// The type depends on the value of an earlier field.
    Selected(&'static Selector),
}


//------------ Tagging -------------------------------------------------------

/// How a field is tagged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tagging {
    pub tag: Tag,
    pub mode: TagMode,
}

/// The tagging mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagMode {
    /// The tag replaces the tag of the value.
    Implicit,

    /// The value is wrapped into a constructed value with the tag.
    Explicit,
}


//------------ Repeat --------------------------------------------------------

/// Whether a field contains a single value or a repetition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Repeat {
    Single,
    SetOf,
    SequenceOf,
}


//------------ Selector ------------------------------------------------------

/// Selects the type of a field by the object identifier of another field.
///
/// This implements the ‘ANY DEFINED BY’ construct. The referenced field has
/// to come earlier in the same sequence. If its value isn’t found in the
/// table of choices, the default is used. If there is no default either,
/// the field can’t be decoded or encoded.
#[derive(Debug)]
pub struct Selector {
    /// The name of the field holding the object identifier.
    field: &'static str,

    /// The known object identifiers and their types.
    choices: &'static [(ConstOid, &'static TypeDesc)],

    /// The type for all other object identifiers.
    default: Option<&'static TypeDesc>,
}

impl Selector {
    pub const fn new(
        field: &'static str,
        choices: &'static [(ConstOid, &'static TypeDesc)],
        default: Option<&'static TypeDesc>,
    ) -> Self {
        Selector { field, choices, default }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the type selected by the fields decoded so far.
    pub fn select(&self, siblings: &Sequence) -> Option<&'static TypeDesc> {
        let oid = siblings.get(self.field).and_then(|value| value.as_oid());
        if let Some(oid) = oid {
            let choice = self.choices.iter().find(|(key, _)| key == oid);
            if let Some((_, ty)) = choice {
                return Some(*ty)
            }
        }
        self.default
    }

    /// Returns an iterator over all types the selector may produce.
    fn types(&self) -> impl Iterator<Item = &'static TypeDesc> {
        self.choices.iter().map(|(_, ty)| *ty).chain(self.default)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    static INTEGER: TypeDesc = TypeDesc::Primitive(Tag::INTEGER);
    static BOOLEAN: TypeDesc = TypeDesc::Primitive(Tag::BOOLEAN);

    static GOOD_FIELDS: [FieldDesc; 4] = [
        FieldDesc::new("version", &INTEGER).optional().explicit(Tag::ctx(0)),
        FieldDesc::new("flag", &BOOLEAN).optional(),
        FieldDesc::new("serial", &INTEGER),
        FieldDesc::new("rest", &TypeDesc::Any).optional(),
    ];
    static GOOD: SequenceDesc = SequenceDesc::new("Good", &GOOD_FIELDS);

    static AMBIGUOUS_FIELDS: [FieldDesc; 2] = [
        FieldDesc::new("first", &INTEGER).optional(),
        FieldDesc::new("second", &INTEGER),
    ];
    static AMBIGUOUS: SequenceDesc = SequenceDesc::new(
        "Ambiguous", &AMBIGUOUS_FIELDS
    );

    static EARLY_ANY_FIELDS: [FieldDesc; 2] = [
        FieldDesc::new("any", &TypeDesc::Any).optional(),
        FieldDesc::new("second", &INTEGER),
    ];
    static EARLY_ANY: SequenceDesc = SequenceDesc::new(
        "EarlyAny", &EARLY_ANY_FIELDS
    );

    static TWO_OPTIONAL_FIELDS: [FieldDesc; 3] = [
        FieldDesc::new("a", &INTEGER).optional().implicit(Tag::ctx(1)),
        FieldDesc::new("b", &BOOLEAN).optional(),
        FieldDesc::new("c", &INTEGER).implicit(Tag::ctx(1)),
    ];
    static TWO_OPTIONAL: SequenceDesc = SequenceDesc::new(
        "TwoOptional", &TWO_OPTIONAL_FIELDS
    );

    #[test]
    fn validate() {
        assert_eq!(GOOD.validate(), Ok(()));
        assert_eq!(AMBIGUOUS.validate(), Err("first"));
        assert_eq!(EARLY_ANY.validate(), Err("any"));
        assert_eq!(TWO_OPTIONAL.validate(), Err("a"));
    }

    #[test]
    fn builders() {
        let field = GOOD_FIELDS[0];
        assert!(field.is_optional());
        assert_eq!(
            field.tagging(),
            Some(Tagging { tag: Tag::ctx(0), mode: TagMode::Explicit })
        );
        assert_eq!(field.repeat(), Repeat::Single);
        assert_eq!(
            FieldDesc::new("x", &INTEGER).set_of().repeat(), Repeat::SetOf
        );
    }
}
