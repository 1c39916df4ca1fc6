//! BER encoding for various strings types.
//!
//! There are two types of strings for binary data. Octet strings contain
//! an unrestricted sequence of octets and are represented by plain
//! [`Bytes`][bytes::Bytes] values. [`BitString`]s contain a sequence of bits
//! that does not need to be of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character
//! strings and the two time types. All of these are kept in a
//! [`CharString`] which remembers the tag and the raw content octets.

//--- Re-exports

pub use self::bit::BitString;
pub use self::restricted::CharString;

//--- Private modules

mod bit;
mod restricted;
