//! Errors reported when decoding data.
//!
//! Decoding itself happens through the template engine in
//! [`template`][crate::template] and the headers read via
//! [`read_header`][crate::read_header]. All of these report problems as a
//! [`DecodeError`] which tells what went wrong and where.

pub use self::error::{ContentError, DecodeError, ErrorKind, Pos};

mod error;
