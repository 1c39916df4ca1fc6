//! Encoding data in DER.
//!
//! Values are encoded by the template engine via
//! [`template::encode`][crate::template::encode]. Lengths are computed
//! bottom-up before anything is written, so the output always uses definite
//! lengths in their shortest form.
//!
//! This module provides the error type for encoding.

pub use self::error::EncodeError;

mod error;
