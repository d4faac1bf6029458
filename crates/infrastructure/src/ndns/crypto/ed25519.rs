use ndns_application::ports::CryptoProvider;
use ndns_domain::{DomainError, PublicKey, SignedObject};
use ring::signature::{UnparsedPublicKey, ED25519};
use tracing::trace;

const ED25519_KEY_LEN: usize = 32;

/// DER prefix of an Ed25519 SubjectPublicKeyInfo (RFC 8410)
const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// Ed25519 signature verification backed by `ring`
pub struct RingCrypto;

impl RingCrypto {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RingCrypto {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for RingCrypto {
    fn verify_signature(&self, object: &SignedObject, key: &PublicKey) -> bool {
        if object.signature.is_empty() {
            return false;
        }

        let public_key = UnparsedPublicKey::new(&ED25519, key.as_bytes());
        let valid = public_key
            .verify(&object.signed_region(), &object.signature)
            .is_ok();

        trace!(name = %object.name, valid = valid, "Ed25519 signature check");

        valid
    }

    /// Accepts raw 32-byte key bits or an Ed25519 SubjectPublicKeyInfo
    fn extract_public_key(&self, certificate: &[u8]) -> Result<PublicKey, DomainError> {
        let bits = match certificate.len() {
            ED25519_KEY_LEN => certificate,
            len if len == ED25519_SPKI_PREFIX.len() + ED25519_KEY_LEN
                && certificate.starts_with(&ED25519_SPKI_PREFIX) =>
            {
                &certificate[ED25519_SPKI_PREFIX.len()..]
            }
            len => {
                return Err(DomainError::Crypto(format!(
                    "certificate payload of {} bytes is not an Ed25519 key",
                    len
                )))
            }
        };

        Ok(PublicKey::new(bytes::Bytes::copy_from_slice(bits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndns::crypto::DataSigner;
    use bytes::Bytes;
    use ndns_domain::{ContentType, Name};

    fn signer() -> DataSigner {
        DataSigner::generate(Name::parse("/ndn/DNS/zsk-1/NDNCERT").unwrap()).unwrap()
    }

    #[test]
    fn test_verifies_own_signature() {
        let crypto = RingCrypto::new();
        let signer = signer();
        let object = signer.sign(
            Name::parse("/ndn/DNS/www/TXT").unwrap(),
            Bytes::from_static(b"payload"),
            ContentType::Data,
            60,
        );

        assert!(crypto.verify_signature(&object, &signer.public_key()));
    }

    #[test]
    fn test_rejects_tampering_and_wrong_key() {
        let crypto = RingCrypto::new();
        let signer = signer();
        let other = self::signer();
        let object = signer.sign(
            Name::parse("/ndn/DNS/www/TXT").unwrap(),
            Bytes::from_static(b"payload"),
            ContentType::Data,
            60,
        );

        let mut tampered = object.clone();
        tampered.content = Bytes::from_static(b"PAYLOAD");
        assert!(!crypto.verify_signature(&tampered, &signer.public_key()));
        assert!(!crypto.verify_signature(&object, &other.public_key()));

        let mut unsigned = object;
        unsigned.signature = Bytes::new();
        assert!(!crypto.verify_signature(&unsigned, &signer.public_key()));
    }

    #[test]
    fn test_extract_public_key_forms() {
        let crypto = RingCrypto::new();
        let raw = [9u8; 32];

        assert_eq!(crypto.extract_public_key(&raw).unwrap().as_bytes(), &raw);

        let mut spki = ED25519_SPKI_PREFIX.to_vec();
        spki.extend_from_slice(&raw);
        assert_eq!(crypto.extract_public_key(&spki).unwrap().as_bytes(), &raw);

        assert!(matches!(
            crypto.extract_public_key(&[1, 2, 3]),
            Err(DomainError::Crypto(_))
        ));
    }
}
