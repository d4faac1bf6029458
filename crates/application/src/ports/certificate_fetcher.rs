use async_trait::async_trait;
use ndns_domain::{DomainError, Name, SignedObject};

/// Retrieves the certificate object published under a key name
///
/// The trust verifier uses this to reach back into the resolver. The
/// returned object is not verified; `depth` is the chain budget left for
/// any sub-resolution the fetch needs (e.g. the zone's forwarding hint).
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    async fn fetch_certificate(
        &self,
        key_name: &Name,
        depth: u32,
    ) -> Result<SignedObject, DomainError>;
}
