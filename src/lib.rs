//! Declaration-driven BER/DER decoding and certificate verification.
//!
//! This crate contains three layers. At the bottom, there are the types for
//! the tag and length header of encoded values and for the primitive types
//! such as [`Integer`], [`Oid`], or [`BitString`].
//!
//! On top of that sits a template engine in the [`template`] module. It
//! decodes data into and encodes data from the generic [`Value`] by
//! interpreting static type descriptors, so that structures don’t need
//! their own parser.
//!
//! Finally, the [`cert`] module uses the template engine to describe a
//! reduced certificate format and the [`verify`][mod@verify] module checks
//! the RSA signature of such certificates.
//!
//! The crate currently only supports definite length encodings. Data is
//! decoded according to a [`Mode`], either BER or DER. Encoding always
//! produces DER.

//--- Re-exports

pub use self::captured::Captured;
pub use self::header::{read_header, write_header, Header};
pub use self::ident::{Class, Tag};
pub use self::int::Integer;
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::oid::{ConstOid, Oid};
pub use self::string::{BitString, CharString};
pub use self::value::{Any, Sequence, Value};
pub use self::verify::{verify, VerifiedInfo, Verifier, VerifyError};


//--- Public modules

pub mod cert;
pub mod decode;
pub mod encode;
pub mod oid;
pub mod string;
pub mod template;
pub mod verify;


//--- Private modules

mod captured;
mod header;
mod ident;
mod int;
mod length;
mod mode;
mod value;
