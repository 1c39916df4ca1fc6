//! Verifying certificate signatures.
//!
//! The [`verify`] function decodes a certificate, checks its RSA signature
//! over the exact octets of the signed part, and, if that succeeds, returns
//! the information a consumer needs as a [`VerifiedInfo`]. Nothing taken
//! from the certificate is returned unless the signature is correct.
//!
//! Computing the digest and recovering it from the signature are done by
//! the two traits [`Digest`] and [`SignatureRecovery`]. The crate provides
//! [`Sha256`] and [`ModExp`] as default implementations. Other
//! implementations can be plugged in through a [`Verifier`].
//!
//! The recovery only undoes the RSA operation. The PKCS#1 padding of the
//! recovered block is not checked, only its trailing octets are compared
//! to the digest.

use std::{error, fmt};
use bytes::Bytes;
use log::{debug, trace, warn};
use subtle::ConstantTimeEq;
use crate::cert::{Certificate, Extension, RsaPublicKey};
use crate::decode::DecodeError;
use crate::mode::Mode;


//------------ verify --------------------------------------------------------

/// Verifies a certificate using the default configuration.
///
/// This decodes the certificate using BER and checks the signature with
/// SHA-256 and plain modular exponentiation.
pub fn verify(data: &[u8]) -> Result<VerifiedInfo, VerifyError> {
    Verifier::new().verify(data)
}


//------------ Verifier ------------------------------------------------------

/// A configurable certificate verifier.
///
/// A verifier holds the decoding mode and the two primitives used for
/// checking the signature.
#[derive(Clone, Debug, Default)]
pub struct Verifier<D = Sha256, R = ModExp> {
    mode: Mode,
    digest: D,
    recovery: R,
}

impl Verifier {
    /// Creates a verifier with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Digest, R: SignatureRecovery> Verifier<D, R> {
    /// Changes the mode used for decoding the certificate.
    pub fn with_mode(self, mode: Mode) -> Self {
        Verifier { mode, ..self }
    }

    /// Changes the digest algorithm.
    pub fn with_digest<T: Digest>(self, digest: T) -> Verifier<T, R> {
        Verifier { mode: self.mode, digest, recovery: self.recovery }
    }

    /// Changes the signature recovery primitive.
    pub fn with_recovery<T: SignatureRecovery>(
        self, recovery: T
    ) -> Verifier<D, T> {
        Verifier { mode: self.mode, digest: self.digest, recovery }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Verifies a certificate.
    pub fn verify(&self, data: &[u8]) -> Result<VerifiedInfo, VerifyError> {
        let cert = Certificate::decode(
            Bytes::copy_from_slice(data), self.mode
        ).map_err(VerifyError::MalformedCertificate)?;
        debug!(
            "decoded certificate with serial number {} signed with {}",
            cert.serial_number(), cert.signature_algorithm().algorithm
        );

        let key = cert.public_key().rsa_public_key(
            self.mode
        ).map_err(VerifyError::MalformedPublicKey)?;
        check_key(&key)?;
        debug!("RSA public key with {} octet modulus", key.modulus_len());

        self.check_signature(&cert, &key)?;
        debug!("signature verified");

        let limit = key.modulus_len();
        let mut extensions = Vec::with_capacity(cert.extension_count());
        for ext in cert.extensions() {
            trace!(
                "extension {:?}, {} octets, critical: {}",
                ext.id, ext.value.len(), ext.is_critical()
            );
            extensions.push(extension_entry(ext, limit)?);
        }

        Ok(VerifiedInfo {
            serial_number: cert.serial_number().to_i64(),
            public_key: (
                key.modulus.magnitude().clone(),
                key.exponent.magnitude().clone(),
            ),
            extensions,
        })
    }

    /// Checks the signature over the signed part of the certificate.
    fn check_signature(
        &self, cert: &Certificate, key: &RsaPublicKey
    ) -> Result<(), VerifyError> {
        let signature = cert.signature();
        if signature.unused() != 0 {
            warn!("signature with unused bits");
            return Err(VerifyError::SignatureInvalid)
        }
        let computed = self.digest.digest(cert.tbs().as_slice());
        let recovered = match self.recovery.recover(
            key.modulus.magnitude(), key.exponent.magnitude(),
            signature.octet_slice(), self.digest.output_len()
        ) {
            Some(recovered) => recovered,
            None => {
                warn!("failed to recover digest from signature");
                return Err(VerifyError::SignatureInvalid)
            }
        };
        if bool::from(computed.as_slice().ct_eq(recovered.as_slice())) {
            Ok(())
        }
        else {
            warn!("signature digest mismatch");
            Err(VerifyError::SignatureInvalid)
        }
    }
}

/// Rejects keys with negative or zero components.
fn check_key(key: &RsaPublicKey) -> Result<(), VerifyError> {
    for component in &[&key.modulus, &key.exponent] {
        if component.is_negative() || component.is_zero() {
            return Err(VerifyError::MalformedPublicKey(DecodeError::content(
                "non-positive RSA key component", 0
            )))
        }
    }
    Ok(())
}

/// Returns the object identifier and value of an extension.
///
/// Values longer than `limit` octets are taken to be hex strings and are
/// returned as the octets they describe. If that doesn’t work or the
/// result still is too long, the extension is rejected.
fn extension_entry(
    ext: &Extension, limit: usize
) -> Result<(Bytes, Bytes), VerifyError> {
    let id = ext.id.0.clone();
    if ext.value.len() <= limit {
        return Ok((id, ext.value.clone()))
    }
    match hex::decode(&ext.value) {
        Ok(value) if value.len() <= limit => {
            trace!("packed hex value of extension {}", ext.id);
            Ok((id, value.into()))
        }
        _ => Err(VerifyError::ExtensionBufferTooSmall)
    }
}


//------------ VerifiedInfo --------------------------------------------------

/// The information taken from a certificate with a valid signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifiedInfo {
    /// The serial number if it fits into an `i64`.
    pub serial_number: Option<i64>,

    /// The octets of the modulus and the exponent of the public key.
    ///
    /// Both are unsigned big-endian integers without leading zeros.
    pub public_key: (Bytes, Bytes),

    /// The object identifier octets and value of each extension.
    pub extensions: Vec<(Bytes, Bytes)>,
}


//------------ Digest --------------------------------------------------------

/// A digest algorithm.
pub trait Digest {
    /// Returns the length of the digest in octets.
    fn output_len(&self) -> usize;

    /// Returns the digest of the given data.
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}


//------------ Sha256 --------------------------------------------------------

/// The SHA-256 digest algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256;

impl Digest for Sha256 {
    fn output_len(&self) -> usize {
        32
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        use sha2::Digest as _;

        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}


//------------ SignatureRecovery ---------------------------------------------

/// Recovering a digest from an RSA signature.
pub trait SignatureRecovery {
    /// Returns the trailing `digest_len` octets of the recovered block.
    ///
    /// The modulus, exponent, and signature are unsigned big-endian
    /// integers. Returns `None` if the signature can’t be processed with
    /// the key.
    fn recover(
        &self, modulus: &[u8], exponent: &[u8], signature: &[u8],
        digest_len: usize,
    ) -> Option<Vec<u8>>;
}


//------------ ModExp --------------------------------------------------------

/// Signature recovery through plain modular exponentiation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModExp;

impl SignatureRecovery for ModExp {
    fn recover(
        &self, modulus: &[u8], exponent: &[u8], signature: &[u8],
        digest_len: usize,
    ) -> Option<Vec<u8>> {
        let n = rsa::BigUint::from_bytes_be(modulus);
        let e = rsa::BigUint::from_bytes_be(exponent);
        let s = rsa::BigUint::from_bytes_be(signature);
        if s >= n || digest_len > modulus.len() {
            return None
        }
        let block = s.modpow(&e, &n).to_bytes_be();
        if block.len() >= digest_len {
            Some(block[block.len() - digest_len..].to_vec())
        }
        else {
            // Leading zeros got lost in the conversion.
            let mut res = vec![0; digest_len - block.len()];
            res.extend_from_slice(&block);
            Some(res)
        }
    }
}


//------------ VerifyError ---------------------------------------------------

/// An error happened while verifying a certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyError {
    /// The certificate could not be decoded.
    MalformedCertificate(DecodeError),

    /// The public key could not be decoded or is unusable.
    MalformedPublicKey(DecodeError),

    /// The signature does not match the signed part.
    SignatureInvalid,

    /// An extension value is too long.
    ExtensionBufferTooSmall,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VerifyError::MalformedCertificate(ref err) => {
                write!(f, "malformed certificate: {}", err)
            }
            VerifyError::MalformedPublicKey(ref err) => {
                write!(f, "malformed public key: {}", err)
            }
            VerifyError::SignatureInvalid => f.write_str("invalid signature"),
            VerifyError::ExtensionBufferTooSmall => {
                f.write_str("extension value too long")
            }
        }
    }
}

impl error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            VerifyError::MalformedCertificate(ref err) => Some(err),
            VerifyError::MalformedPublicKey(ref err) => Some(err),
            _ => None
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::oid::Oid;
    use super::*;

    const CERT: &[u8] = include_bytes!("../tests/data/test-cert.der");

    /// A recovery that always fails.
    struct Refuse;

    impl SignatureRecovery for Refuse {
        fn recover(
            &self, _: &[u8], _: &[u8], _: &[u8], _: usize
        ) -> Option<Vec<u8>> {
            None
        }
    }

    /// A digest that is all zeros.
    struct Zero;

    impl Digest for Zero {
        fn output_len(&self) -> usize {
            32
        }

        fn digest(&self, _: &[u8]) -> Vec<u8> {
            vec![0; 32]
        }
    }

    #[test]
    fn mod_exp() {
        // The textbook key n = 61 * 53, e = 17, d = 2753.
        let n = b"\x0c\xa1";
        assert_eq!(
            ModExp.recover(n, b"\x0a\xc1", b"\x0a\xe6", 1),
            Some(vec![65])
        );
        assert_eq!(
            ModExp.recover(n, b"\x0a\xc1", b"\x0a\xe6", 2),
            Some(vec![0, 65])
        );
        assert_eq!(ModExp.recover(n, b"\x0a\xc1", b"\x0a\xe6", 3), None);
        assert_eq!(ModExp.recover(n, b"\x11", b"\x0c\xa1", 1), None);
    }

    #[test]
    fn sha256() {
        assert_eq!(Sha256.output_len(), 32);
        assert_eq!(
            hex::encode(Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_fixture() {
        let info = verify(CERT).unwrap();
        assert_eq!(info.serial_number, Some(42));
        assert_eq!(info.public_key.1.as_ref(), b"\x01\x00\x01");
        assert_eq!(info.extensions.len(), 2);
        assert_eq!(
            Oid(info.extensions[0].0.clone()).to_string(),
            "1.3.6.1.4.1.55555.1.1"
        );
        assert_eq!(info.extensions[0].1.as_ref(), b"hello");
        assert_eq!(
            info.extensions[1].1.as_ref(),
            (0..200u8).collect::<Vec<_>>().as_slice()
        );

        let der = Verifier::new().with_mode(Mode::Der);
        assert_eq!(der.mode(), Mode::Der);
        assert_eq!(der.verify(CERT), Ok(info));
    }

    #[test]
    fn pluggable_primitives() {
        assert_eq!(
            Verifier::new().with_recovery(Refuse).verify(CERT),
            Err(VerifyError::SignatureInvalid)
        );
        assert_eq!(
            Verifier::new().with_digest(Zero).verify(CERT),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn extension_values() {
        let ext = |value: &'static [u8]| Extension {
            id: Oid(Bytes::from_static(b"\x2a\x03")),
            critical: None,
            value: Bytes::from_static(value),
        };
        assert_eq!(
            extension_entry(&ext(b"abcd"), 4).unwrap().1.as_ref(),
            b"abcd"
        );
        assert_eq!(
            extension_entry(&ext(b"0aff10"), 4).unwrap().1.as_ref(),
            b"\x0a\xff\x10"
        );
        assert_eq!(
            extension_entry(&ext(b"0aff1"), 4),
            Err(VerifyError::ExtensionBufferTooSmall)
        );
        assert_eq!(
            extension_entry(&ext(b"hello"), 4),
            Err(VerifyError::ExtensionBufferTooSmall)
        );
        assert_eq!(
            extension_entry(&ext(b"0102030405"), 4),
            Err(VerifyError::ExtensionBufferTooSmall)
        );
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            verify(&CERT[..10]),
            Err(VerifyError::MalformedCertificate(_))
        ));
        assert!(matches!(
            verify(b""),
            Err(VerifyError::MalformedCertificate(_))
        ));
    }
}
