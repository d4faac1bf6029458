use bytes::Bytes;
use ndns_domain::name::SERVICE_COMPONENT;
use ndns_domain::{ContentType, DomainError, Name, PublicKey, RecordType, SignedObject};
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};

/// Producer-side signing with an Ed25519 key
///
/// Objects are stamped with the signer's key name as key locator. Zone
/// tooling and test fixtures use this to publish records and certificates.
pub struct DataSigner {
    key_name: Name,
    key_pair: Ed25519KeyPair,
}

impl DataSigner {
    /// Fresh random key pair
    pub fn generate(key_name: Name) -> Result<Self, DomainError> {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng)
            .map_err(|_| DomainError::Crypto("key generation failed".into()))?;
        Self::from_pkcs8(key_name, pkcs8.as_ref())
    }

    pub fn from_pkcs8(key_name: Name, pkcs8: &[u8]) -> Result<Self, DomainError> {
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8)
            .map_err(|e| DomainError::Crypto(format!("invalid PKCS#8 key: {}", e)))?;
        Ok(Self { key_name, key_pair })
    }

    pub fn key_name(&self) -> &Name {
        &self.key_name
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(Bytes::copy_from_slice(self.key_pair.public_key().as_ref()))
    }

    pub fn sign(
        &self,
        name: Name,
        content: Bytes,
        content_type: ContentType,
        freshness_seconds: u32,
    ) -> SignedObject {
        let mut object = SignedObject {
            name,
            content,
            content_type,
            freshness_seconds,
            key_locator: Some(self.key_name.clone()),
            signature: Bytes::new(),
        };
        let signature = self.key_pair.sign(&object.signed_region());
        object.signature = Bytes::copy_from_slice(signature.as_ref());
        object
    }

    /// Certificate for `subject`: its key bits, published under
    /// `certificate_name`
    pub fn certify(
        &self,
        certificate_name: Name,
        subject: &PublicKey,
        freshness_seconds: u32,
    ) -> SignedObject {
        self.sign(
            certificate_name,
            Bytes::copy_from_slice(subject.as_bytes()),
            ContentType::Key,
            freshness_seconds,
        )
    }
}

/// `<zone>/DNS/<label…>/<TYPE>/<version>`
pub fn rrset_data_name(zone: &Name, label: &Name, record_type: RecordType, version: u64) -> Name {
    zone.clone()
        .append(SERVICE_COMPONENT)
        .append_name(label)
        .append(record_type.as_str())
        .append_version(version)
}
