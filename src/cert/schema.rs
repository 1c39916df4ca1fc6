//! The type descriptors of the certificate schema.
//!
//! The schema is a reduced form of the X.509 certificate of RFC 5280. The
//! signed part only contains the serial number, the signature algorithm,
//! the public key, and the extensions:
//!
//! ```text
//! Certificate  ::=  SEQUENCE  {
//!      tbs                  CertificateInfo,
//!      signatureAlgorithm   AlgorithmIdentifier,
//!      signature            BIT STRING  }
//!
//! CertificateInfo  ::=  SEQUENCE  {
//!      serialNumber         INTEGER,
//!      signatureAlgorithm   AlgorithmIdentifier,
//!      subjectPublicKeyInfo SubjectPublicKeyInfo,
//!      extensions      [3]  EXPLICIT SEQUENCE OF Extension OPTIONAL }
//!
//! AlgorithmIdentifier  ::=  SEQUENCE  {
//!      algorithm            OBJECT IDENTIFIER,
//!      parameters           ANY DEFINED BY algorithm OPTIONAL  }
//!
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!      algorithm            AlgorithmIdentifier,
//!      subjectPublicKey     BIT STRING  }
//!
//! Extension  ::=  SEQUENCE  {
//!      id                   OBJECT IDENTIFIER,
//!      critical             BOOLEAN OPTIONAL,
//!      value                OCTET STRING  }
//!
//! RSAPublicKey ::= SEQUENCE {
//!      modulus              INTEGER,
//!      publicExponent       INTEGER }
//! ```
//!
//! The parameters of the RSA algorithm identifiers are NULL. For all other
//! algorithms they are kept as they are.

use crate::ident::Tag;
use crate::oid::{self, ConstOid};
use crate::template::{FieldDesc, SequenceDesc, Selector, TypeDesc};


//------------ Primitives ----------------------------------------------------

static OID: TypeDesc = TypeDesc::Primitive(Tag::OID);
static NULL: TypeDesc = TypeDesc::Primitive(Tag::NULL);
static BOOLEAN: TypeDesc = TypeDesc::Primitive(Tag::BOOLEAN);
static INTEGER: TypeDesc = TypeDesc::Primitive(Tag::INTEGER);
static BIT_STRING: TypeDesc = TypeDesc::Primitive(Tag::BIT_STRING);
static OCTET_STRING: TypeDesc = TypeDesc::Primitive(Tag::OCTET_STRING);


//------------ AlgorithmIdentifier -------------------------------------------

static PARAMETER_CHOICES: [(ConstOid, &TypeDesc); 5] = [
    (oid::RSA_ENCRYPTION, &NULL),
    (oid::SHA1_WITH_RSA_ENCRYPTION, &NULL),
    (oid::SHA256_WITH_RSA_ENCRYPTION, &NULL),
    (oid::SHA384_WITH_RSA_ENCRYPTION, &NULL),
    (oid::SHA512_WITH_RSA_ENCRYPTION, &NULL),
];

static PARAMETERS: Selector = Selector::new(
    "algorithm", &PARAMETER_CHOICES, Some(&TypeDesc::Any)
);

static ALGORITHM_IDENTIFIER_FIELDS: [FieldDesc; 2] = [
    FieldDesc::new("algorithm", &OID),
    FieldDesc::selected("parameters", &PARAMETERS).optional(),
];

pub static ALGORITHM_IDENTIFIER: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("AlgorithmIdentifier", &ALGORITHM_IDENTIFIER_FIELDS)
);


//------------ Extension -----------------------------------------------------

static EXTENSION_FIELDS: [FieldDesc; 3] = [
    FieldDesc::new("id", &OID),
    FieldDesc::new("critical", &BOOLEAN).optional(),
    FieldDesc::new("value", &OCTET_STRING),
];

pub static EXTENSION: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("Extension", &EXTENSION_FIELDS)
);


//------------ SubjectPublicKeyInfo ------------------------------------------

static SUBJECT_PUBLIC_KEY_INFO_FIELDS: [FieldDesc; 2] = [
    FieldDesc::new("algorithm", &ALGORITHM_IDENTIFIER),
    FieldDesc::new("subjectPublicKey", &BIT_STRING),
];

pub static SUBJECT_PUBLIC_KEY_INFO: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("SubjectPublicKeyInfo", &SUBJECT_PUBLIC_KEY_INFO_FIELDS)
);


//------------ RsaPublicKey --------------------------------------------------

static RSA_PUBLIC_KEY_FIELDS: [FieldDesc; 2] = [
    FieldDesc::new("modulus", &INTEGER),
    FieldDesc::new("publicExponent", &INTEGER),
];

pub static RSA_PUBLIC_KEY: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("RSAPublicKey", &RSA_PUBLIC_KEY_FIELDS)
);


//------------ CertificateInfo -----------------------------------------------

static CERTIFICATE_INFO_FIELDS: [FieldDesc; 4] = [
    FieldDesc::new("serialNumber", &INTEGER),
    FieldDesc::new("signatureAlgorithm", &ALGORITHM_IDENTIFIER),
    FieldDesc::new("subjectPublicKeyInfo", &SUBJECT_PUBLIC_KEY_INFO),
    FieldDesc::new("extensions", &EXTENSION)
        .sequence_of().explicit(Tag::ctx(3)).optional(),
];

pub static CERTIFICATE_INFO: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("CertificateInfo", &CERTIFICATE_INFO_FIELDS)
);


//------------ Certificate ---------------------------------------------------

static CERTIFICATE_FIELDS: [FieldDesc; 3] = [
    FieldDesc::new("tbs", &CERTIFICATE_INFO),
    FieldDesc::new("signatureAlgorithm", &ALGORITHM_IDENTIFIER),
    FieldDesc::new("signature", &BIT_STRING),
];

pub static CERTIFICATE: TypeDesc = TypeDesc::Sequence(
    SequenceDesc::new("Certificate", &CERTIFICATE_FIELDS)
);


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn schema_is_unambiguous() {
        for desc in &[
            &ALGORITHM_IDENTIFIER, &EXTENSION, &SUBJECT_PUBLIC_KEY_INFO,
            &RSA_PUBLIC_KEY, &CERTIFICATE_INFO, &CERTIFICATE
        ] {
            match **desc {
                TypeDesc::Sequence(ref seq) => {
                    assert_eq!(seq.validate(), Ok(()), "{}", seq.name())
                }
                _ => panic!("not a sequence")
            }
        }
    }
}
