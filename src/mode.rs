//! The encoding rules.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Mode ----------------------------------------------------------

/// The encoding rules to apply when decoding data.
///
/// Encoding always produces DER since that is the only form that can be
/// re-verified against a signature. When decoding, the mode determines how
/// strict the decoder is about alternative encodings of the same value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values. The latter are
    /// recognized but not supported by the template engine.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    Der,
}

impl Mode {
    /// Returns whether the mode is DER.
    pub fn is_der(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Does this mode allow indefinite length constructed values?
    pub fn allow_indefinite(self) -> bool {
        !self.is_der()
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ber
    }
}
