//! Certificates.
//!
//! This module provides typed access to certificates of the reduced schema
//! described in [`schema`]. Each type can be decoded from and encoded into
//! its encoded form and converted to and from a generic
//! [`Value`][crate::Value].
//!
//! Decoding a [`Certificate`] keeps the exact octets of its signed part so
//! that a signature can be checked over what was actually signed.

pub mod schema;

use bytes::Bytes;
use crate::captured::Captured;
use crate::decode::{DecodeError, ErrorKind};
use crate::encode::EncodeError;
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::string::BitString;
use crate::template::{self, TypeDesc};
use crate::value::{Sequence, Value};


//------------ Certificate ---------------------------------------------------

/// A certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    /// The signed part of the certificate.
    info: CertificateInfo,

    /// The algorithm used for the signature.
    signature_algorithm: AlgorithmIdentifier,

    /// The signature.
    signature: BitString,

    /// The encoding of the signed part, header included.
    tbs: Captured,
}

impl Certificate {
    /// Creates a new certificate.
    ///
    /// The signed part is encoded in DER in order to have something to
    /// sign and verify.
    pub fn new(
        info: CertificateInfo,
        signature_algorithm: AlgorithmIdentifier,
        signature: BitString,
    ) -> Result<Self, EncodeError> {
        let tbs = Captured::new(info.encode()?);
        Ok(Certificate { info, signature_algorithm, signature, tbs })
    }

    /// Decodes a certificate.
    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(data, mode, &schema::CERTIFICATE, Self::from_value)
    }

    /// Encodes the certificate in DER.
    ///
    /// Note that the signed part is encoded anew. If the certificate was
    /// decoded from something other than DER, the result may differ.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::CERTIFICATE)
    }

    pub fn info(&self) -> &CertificateInfo {
        &self.info
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature(&self) -> &BitString {
        &self.signature
    }

    /// Returns the encoding of the signed part, header included.
    pub fn tbs(&self) -> &Captured {
        &self.tbs
    }

    pub fn serial_number(&self) -> &Integer {
        &self.info.serial_number
    }

    pub fn public_key(&self) -> &SubjectPublicKeyInfo {
        &self.info.public_key
    }

    /// Returns the number of extensions.
    pub fn extension_count(&self) -> usize {
        self.extensions().len()
    }

    /// Returns the extension with the given index.
    pub fn extension(&self, idx: usize) -> Option<&Extension> {
        self.extensions().get(idx)
    }

    /// Returns all extensions.
    ///
    /// A certificate without the extensions field has none.
    pub fn extensions(&self) -> &[Extension] {
        self.info.extensions.as_deref().unwrap_or(&[])
    }

    /// Converts a generic value into a certificate.
    ///
    /// If the value wasn’t produced by decoding, the signed part is encoded
    /// to get its octets.
    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        let tbs_value = seq.get("tbs")?;
        let info = CertificateInfo::from_value(tbs_value)?;
        let tbs = match tbs_value.as_sequence()?.raw() {
            Some(raw) => raw.clone(),
            None => Captured::new(info.encode().ok()?),
        };
        Some(Certificate {
            info,
            signature_algorithm: AlgorithmIdentifier::from_value(
                seq.get("signatureAlgorithm")?
            )?,
            signature: seq.get("signature")?.as_bit_string()?.clone(),
            tbs,
        })
    }

    pub fn to_value(&self) -> Value {
        Sequence::new()
            .with("tbs", self.info.to_value())
            .with("signatureAlgorithm", self.signature_algorithm.to_value())
            .with("signature", self.signature.clone())
            .into()
    }
}


//------------ CertificateInfo -----------------------------------------------

/// The signed part of a certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateInfo {
    pub serial_number: Integer,
    pub signature_algorithm: AlgorithmIdentifier,
    pub public_key: SubjectPublicKeyInfo,

    /// The extensions if the field is present.
    pub extensions: Option<Vec<Extension>>,
}

impl CertificateInfo {
    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(data, mode, &schema::CERTIFICATE_INFO, Self::from_value)
    }

    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::CERTIFICATE_INFO)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        let extensions = match seq.get("extensions") {
            Some(value) => {
                let items = value.as_items()?;
                let mut res = Vec::with_capacity(items.len());
                for item in items {
                    res.push(Extension::from_value(item)?);
                }
                Some(res)
            }
            None => None
        };
        Some(CertificateInfo {
            serial_number: seq.get("serialNumber")?.as_integer()?.clone(),
            signature_algorithm: AlgorithmIdentifier::from_value(
                seq.get("signatureAlgorithm")?
            )?,
            public_key: SubjectPublicKeyInfo::from_value(
                seq.get("subjectPublicKeyInfo")?
            )?,
            extensions,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut res = Sequence::new()
            .with("serialNumber", self.serial_number.clone())
            .with("signatureAlgorithm", self.signature_algorithm.to_value())
            .with("subjectPublicKeyInfo", self.public_key.to_value());
        if let Some(extensions) = self.extensions.as_ref() {
            res.push("extensions", Value::SequenceOf(
                extensions.iter().map(Extension::to_value).collect()
            ));
        }
        res.into()
    }
}


//------------ AlgorithmIdentifier -------------------------------------------

/// An algorithm and its parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlgorithmIdentifier {
    pub algorithm: Oid,
    pub parameters: Option<Value>,
}

impl AlgorithmIdentifier {
    /// Creates an identifier for an algorithm with NULL parameters.
    ///
    /// This is the form used by the RSA algorithms.
    pub fn with_null(algorithm: impl Into<Oid>) -> Self {
        AlgorithmIdentifier {
            algorithm: algorithm.into(),
            parameters: Some(Value::Null),
        }
    }

    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(data, mode, &schema::ALGORITHM_IDENTIFIER, Self::from_value)
    }

    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::ALGORITHM_IDENTIFIER)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        Some(AlgorithmIdentifier {
            algorithm: seq.get("algorithm")?.as_oid()?.clone(),
            parameters: seq.get("parameters").cloned(),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut res = Sequence::new().with("algorithm", self.algorithm.clone());
        if let Some(parameters) = self.parameters.as_ref() {
            res.push("parameters", parameters.clone());
        }
        res.into()
    }
}


//------------ Extension -----------------------------------------------------

/// A certificate extension.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Extension {
    pub id: Oid,

    /// The critical flag if it was present.
    pub critical: Option<bool>,

    /// The content of the value octet string.
    pub value: Bytes,
}

impl Extension {
    /// Returns whether the extension is critical.
    ///
    /// The flag defaults to false if absent.
    pub fn is_critical(&self) -> bool {
        self.critical.unwrap_or(false)
    }

    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(data, mode, &schema::EXTENSION, Self::from_value)
    }

    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::EXTENSION)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        let critical = match seq.get("critical") {
            Some(value) => Some(value.as_bool()?),
            None => None
        };
        Some(Extension {
            id: seq.get("id")?.as_oid()?.clone(),
            critical,
            value: seq.get("value")?.as_octet_string()?.clone(),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut res = Sequence::new().with("id", self.id.clone());
        if let Some(critical) = self.critical {
            res.push("critical", critical);
        }
        res.with("value", self.value.clone()).into()
    }
}


//------------ SubjectPublicKeyInfo ------------------------------------------

/// The public key of a certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,

    /// The encoded public key.
    pub public_key: BitString,
}

impl SubjectPublicKeyInfo {
    /// Creates the key info for an RSA public key.
    pub fn from_rsa(key: &RsaPublicKey) -> Result<Self, EncodeError> {
        Ok(SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifier::with_null(
                crate::oid::RSA_ENCRYPTION
            ),
            public_key: BitString::from_octets(key.encode()?),
        })
    }

    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(
            data, mode, &schema::SUBJECT_PUBLIC_KEY_INFO, Self::from_value
        )
    }

    /// Returns the DER encoding of the key info.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::SUBJECT_PUBLIC_KEY_INFO)
    }

    /// Decodes the RSA public key kept in the bit string.
    ///
    /// The algorithm identifier is not checked.
    pub fn rsa_public_key(
        &self, mode: Mode
    ) -> Result<RsaPublicKey, DecodeError> {
        if self.public_key.unused() != 0 {
            return Err(DecodeError::content(
                "public key with unused bits", 0
            ))
        }
        RsaPublicKey::decode(self.public_key.octet_bytes(), mode)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        Some(SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifier::from_value(
                seq.get("algorithm")?
            )?,
            public_key: seq.get("subjectPublicKey")?.as_bit_string()?.clone(),
        })
    }

    pub fn to_value(&self) -> Value {
        Sequence::new()
            .with("algorithm", self.algorithm.to_value())
            .with("subjectPublicKey", self.public_key.clone())
            .into()
    }
}


//------------ RsaPublicKey --------------------------------------------------

/// An RSA public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPublicKey {
    pub modulus: Integer,
    pub exponent: Integer,
}

impl RsaPublicKey {
    pub fn decode(data: Bytes, mode: Mode) -> Result<Self, DecodeError> {
        decode_as(data, mode, &schema::RSA_PUBLIC_KEY, Self::from_value)
    }

    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        template::encode(&self.to_value(), &schema::RSA_PUBLIC_KEY)
    }

    /// Returns the length of the modulus in octets.
    pub fn modulus_len(&self) -> usize {
        self.modulus.magnitude().len()
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_sequence()?;
        Some(RsaPublicKey {
            modulus: seq.get("modulus")?.as_integer()?.clone(),
            exponent: seq.get("publicExponent")?.as_integer()?.clone(),
        })
    }

    pub fn to_value(&self) -> Value {
        Sequence::new()
            .with("modulus", self.modulus.clone())
            .with("publicExponent", self.exponent.clone())
            .into()
    }
}


//------------ Helper Functions ----------------------------------------------

/// Decodes data with a descriptor and converts the result.
fn decode_as<T>(
    data: Bytes, mode: Mode, desc: &TypeDesc,
    convert: fn(&Value) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = template::decode(data, desc, mode)?;
    convert(&value).ok_or_else(|| {
        DecodeError::new(
            ErrorKind::MissingRequiredField(desc.name()), 0
        )
    })
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::oid;
    use super::*;

    const CERT: &[u8] = include_bytes!("../../tests/data/test-cert.der");

    fn ext1_id() -> Oid {
        Oid(Bytes::from_static(b"\x2b\x06\x01\x04\x01\x83\xb2\x03\x01\x01"))
    }

    fn rsa_key() -> RsaPublicKey {
        RsaPublicKey {
            modulus: Integer::from_unsigned_be(
                Bytes::from_static(b"\xc5\x01\x02\x03\x04\x05\x06\x07")
            ),
            exponent: Integer::from_u64(65537),
        }
    }

    fn info() -> CertificateInfo {
        CertificateInfo {
            serial_number: Integer::from_i64(0x2A),
            signature_algorithm: AlgorithmIdentifier::with_null(
                oid::SHA256_WITH_RSA_ENCRYPTION
            ),
            public_key: SubjectPublicKeyInfo::from_rsa(&rsa_key()).unwrap(),
            extensions: Some(vec![
                Extension {
                    id: ext1_id(),
                    critical: None,
                    value: Bytes::from_static(b"hello"),
                },
                Extension {
                    id: oid::CE_BASIC_CONSTRAINTS.into(),
                    critical: Some(true),
                    value: Bytes::from_static(b"\x30\x00"),
                },
            ]),
        }
    }

    #[test]
    fn decode_fixture() {
        let cert = Certificate::decode(
            Bytes::from_static(CERT), Mode::Der
        ).unwrap();
        assert_eq!(cert.serial_number().to_i64(), Some(42));
        assert_eq!(cert.tbs().as_slice(), &CERT[4..772]);
        assert_eq!(
            cert.signature_algorithm().algorithm,
            oid::SHA256_WITH_RSA_ENCRYPTION
        );
        assert_eq!(cert.signature_algorithm().parameters, Some(Value::Null));
        assert_eq!(cert.signature().octet_len(), 256);
        assert_eq!(cert.extension_count(), 2);

        let ext = cert.extension(0).unwrap();
        assert_eq!(ext.id, ext1_id());
        assert!(!ext.is_critical());
        assert_eq!(ext.value.as_ref(), b"hello");
        let ext = cert.extension(1).unwrap();
        assert_eq!(ext.critical, Some(true));
        assert_eq!(ext.value.len(), 400);
        assert!(cert.extension(2).is_none());

        let key = cert.public_key().rsa_public_key(Mode::Der).unwrap();
        assert_eq!(key.modulus_len(), 256);
        assert_eq!(key.exponent.to_u64(), Some(65537));
        assert_eq!(
            key.modulus.magnitude().as_ref(),
            &include_bytes!("../../tests/data/test-modulus.bin")[..]
        );

        // The fixture is DER, so we get the same octets back.
        assert_eq!(cert.encode().unwrap().as_ref(), CERT);
        assert_eq!(
            cert.public_key().encode().unwrap().as_ref(),
            &CERT[26..26 + 294]
        );
    }

    #[test]
    fn round_trip_entities() {
        let key = rsa_key();
        assert_eq!(
            RsaPublicKey::decode(key.encode().unwrap(), Mode::Der).unwrap(),
            key
        );

        let info = info();
        let encoded = info.encode().unwrap();
        assert_eq!(
            CertificateInfo::decode(encoded.clone(), Mode::Der).unwrap(),
            info
        );

        let cert = Certificate::new(
            info.clone(),
            AlgorithmIdentifier::with_null(oid::SHA256_WITH_RSA_ENCRYPTION),
            BitString::from_octets(Bytes::from_static(b"\x01\x02\x03")),
        ).unwrap();
        assert_eq!(cert.tbs().as_slice(), encoded.as_ref());
        let decoded = Certificate::decode(
            cert.encode().unwrap(), Mode::Der
        ).unwrap();
        assert_eq!(decoded, cert);
        assert_eq!(decoded.tbs(), cert.tbs());

        for ext in cert.extensions() {
            assert_eq!(
                Extension::decode(ext.encode().unwrap(), Mode::Der).unwrap(),
                *ext
            );
        }
        let alg = AlgorithmIdentifier {
            algorithm: oid::SHA256.into(),
            parameters: None,
        };
        assert_eq!(
            AlgorithmIdentifier::decode(alg.encode().unwrap(), Mode::Der)
                .unwrap(),
            alg
        );
    }

    #[test]
    fn no_extensions() {
        let mut info = info();
        info.extensions = None;
        let decoded = CertificateInfo::decode(
            info.encode().unwrap(), Mode::Der
        ).unwrap();
        assert_eq!(decoded.extensions, None);

        info.extensions = Some(Vec::new());
        let decoded = CertificateInfo::decode(
            info.encode().unwrap(), Mode::Der
        ).unwrap();
        assert_eq!(decoded.extensions, Some(Vec::new()));
    }

    #[test]
    fn unknown_parameters_kept() {
        // An algorithm with some unexpected parameters.
        let data = b"\x30\x08\x06\x01\x2a\x30\x03\x02\x01\x05";
        let alg = AlgorithmIdentifier::decode(
            Bytes::from_static(data), Mode::Der
        ).unwrap();
        assert!(matches!(alg.parameters, Some(Value::Any(_))));
        assert_eq!(alg.encode().unwrap().as_ref(), &data[..]);
    }

    #[test]
    fn decode_failures() {
        assert!(Certificate::decode(
            Bytes::from_static(&CERT[..10]), Mode::Der
        ).is_err());
        let err = Certificate::decode(
            Bytes::from_static(&CERT[..3]), Mode::Der
        ).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::HeaderTruncated);
    }
}
