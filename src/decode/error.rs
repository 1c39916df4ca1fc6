//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt, ops};


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error consists of the kind of problem encountered and the position
/// in the input data where the offending value started.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// What went wrong.
    kind: ErrorKind,

    /// Where it went wrong.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error from its kind and position.
    pub fn new(kind: ErrorKind, pos: impl Into<Pos>) -> Self {
        DecodeError { kind, pos: pos.into() }
    }

    /// Creates a content error at the given position.
    pub fn content(err: impl Into<ContentError>, pos: impl Into<Pos>) -> Self {
        Self::new(ErrorKind::Content(err.into()), pos)
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position in the data where the error happened.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.pos)
    }
}

impl error::Error for DecodeError { }


//------------ ErrorKind -----------------------------------------------------

/// The kind of decoding error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The data ended inside the identifier or length octets.
    HeaderTruncated,

    /// The declared length exceeds the data available for the value.
    LengthOverflow,

    /// There are more length octets than fit into a `usize`.
    LengthTooLarge,

    /// A constructed value contains more data than its type describes.
    TrailingData,

    /// A constructed value ended before all required fields were found.
    Truncated,

    /// A required field with the given name was not present.
    MissingRequiredField(&'static str),

    /// The selector for the given field didn’t resolve to a type.
    UnsupportedSelectorValue(&'static str),

    /// The content of a value was malformed.
    Content(ContentError),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::HeaderTruncated => f.write_str("truncated header"),
            ErrorKind::LengthOverflow => {
                f.write_str("length exceeds available data")
            }
            ErrorKind::LengthTooLarge => f.write_str("excessive length"),
            ErrorKind::TrailingData => f.write_str("trailing data"),
            ErrorKind::Truncated => f.write_str("unexpected end of value"),
            ErrorKind::MissingRequiredField(name) => {
                write!(f, "missing required field '{}'", name)
            }
            ErrorKind::UnsupportedSelectorValue(name) => {
                write!(f, "unsupported selector value for '{}'", name)
            }
            ErrorKind::Content(ref err) => fmt::Display::fmt(err, f),
        }
    }
}


//------------ ContentError --------------------------------------------------

/// The content octets of a value were not encoded correctly.
///
/// This is a simple wrapper around a static message describing the
/// problem.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContentError {
    message: &'static str,
}

impl ContentError {
    /// Creates a content error from a static message.
    pub const fn from_static(message: &'static str) -> Self {
        ContentError { message }
    }

    /// Returns the error message.
    pub fn message(self) -> &'static str {
        self.message
    }
}

impl From<&'static str> for ContentError {
    fn from(message: &'static str) -> Self {
        Self::from_static(message)
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl error::Error for ContentError { }


//------------ Pos -----------------------------------------------------------

/// The logical position within the decoded data.
///
/// Values of this type can only be used for diagnostics. This is why we use
/// a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add<usize> for Pos {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        Pos(self.0 + rhs)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
