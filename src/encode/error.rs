//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};


//------------ EncodeError ---------------------------------------------------

/// A value could not be encoded with the given type descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodeError {
    /// The value lacks the required field with the given name.
    MissingRequiredField(&'static str),

    /// The value doesn’t fit the type with the given name.
    TypeMismatch(&'static str),

    /// The type of the given field couldn’t be selected.
    UnsupportedSelectorValue(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::MissingRequiredField(name) => {
                write!(f, "missing required field '{}'", name)
            }
            EncodeError::TypeMismatch(name) => {
                write!(f, "value doesn't match type '{}'", name)
            }
            EncodeError::UnsupportedSelectorValue(name) => {
                write!(f, "unsupported selector value for '{}'", name)
            }
        }
    }
}

impl error::Error for EncodeError { }
