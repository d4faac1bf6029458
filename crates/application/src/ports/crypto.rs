use ndns_domain::{DomainError, PublicKey, SignedObject};

/// Signature primitives; synchronous and side-effect free
pub trait CryptoProvider: Send + Sync {
    /// Check `object.signature` over `object.signed_region()` with `key`
    fn verify_signature(&self, object: &SignedObject, key: &PublicKey) -> bool;

    /// Decode the public key carried in a certificate payload
    fn extract_public_key(&self, certificate: &[u8]) -> Result<PublicKey, DomainError>;
}
