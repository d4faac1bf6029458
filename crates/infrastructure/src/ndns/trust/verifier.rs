use super::key_cache::TrustedKeyCache;
use super::policy::TrustPolicy;
use futures::future::BoxFuture;
use ndns_application::ports::{CertificateFetcher, CryptoProvider};
use ndns_domain::SignedObject;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Validates signature chains against trust anchors and authorization rules
///
/// `verify` never fails: every problem (exhausted depth, unauthorized
/// signer, unreachable certificate, bad signature) yields `false`. Keys
/// proven along the way are kept in the shared [`TrustedKeyCache`].
pub struct TrustVerifier {
    policy: TrustPolicy,
    crypto: Arc<dyn CryptoProvider>,
    keys: Arc<TrustedKeyCache>,
}

impl TrustVerifier {
    pub fn new(
        policy: TrustPolicy,
        crypto: Arc<dyn CryptoProvider>,
        keys: Arc<TrustedKeyCache>,
    ) -> Self {
        Self {
            policy,
            crypto,
            keys,
        }
    }

    pub fn key_cache(&self) -> &Arc<TrustedKeyCache> {
        &self.keys
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    /// Verify `object` with at most `depth` chain links
    ///
    /// Certificates missing from the key cache are retrieved through
    /// `fetcher` and verified recursively with `depth - 1`.
    pub fn verify<'a>(
        &'a self,
        fetcher: &'a dyn CertificateFetcher,
        object: &'a SignedObject,
        depth: u32,
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            if depth == 0 {
                debug!(name = %object.name, "Certificate chain too long");
                return false;
            }

            if !self.policy.has_anchors() {
                warn!("No trust anchors configured");
                return false;
            }

            if self.keys.get(&object.name).is_some() {
                trace!(name = %object.name, "Object already trusted");
                return true;
            }

            let Some(key_name) = object.signer_key_name() else {
                debug!(name = %object.name, "Object carries no key locator");
                return false;
            };

            if let Some(anchor) = self.policy.anchor_for(&object.name, key_name) {
                let valid = self.crypto.verify_signature(object, &anchor.public_key);
                debug!(
                    name = %object.name,
                    anchor = %anchor.key_name,
                    valid = valid,
                    "Checked against trust anchor"
                );
                return valid;
            }

            if !self.policy.rule_authorizes(&object.name, key_name) {
                debug!(name = %object.name, key = %key_name, "Signer not authorized");
                return false;
            }

            if let Some(key) = self.keys.get(key_name) {
                return self.crypto.verify_signature(object, &key);
            }

            let certificate = match fetcher.fetch_certificate(key_name, depth - 1).await {
                Ok(certificate) => certificate,
                Err(e) => {
                    debug!(key = %key_name, error = %e, "Certificate fetch failed");
                    return false;
                }
            };

            if !self.verify(fetcher, &certificate, depth - 1).await {
                debug!(key = %key_name, "Certificate not trusted");
                return false;
            }

            let key = match self.crypto.extract_public_key(&certificate.content) {
                Ok(key) => key,
                Err(e) => {
                    debug!(key = %key_name, error = %e, "Unusable certificate payload");
                    return false;
                }
            };

            if !self.crypto.verify_signature(object, &key) {
                debug!(name = %object.name, key = %key_name, "Signature mismatch");
                return false;
            }

            self.keys
                .insert(key_name.clone(), key, certificate.freshness());

            debug!(
                name = %object.name,
                key = %key_name,
                depth = depth,
                "Verified through certificate chain"
            );

            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndns::crypto::{DataSigner, RingCrypto};
    use async_trait::async_trait;
    use bytes::Bytes;
    use ndns_domain::{AuthorizationRule, ContentType, DomainError, Name, TrustAnchor};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct MapFetcher {
        certificates: HashMap<Name, SignedObject>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CertificateFetcher for MapFetcher {
        async fn fetch_certificate(
            &self,
            key_name: &Name,
            _depth: u32,
        ) -> Result<SignedObject, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.certificates
                .get(key_name)
                .cloned()
                .ok_or(DomainError::QueryTimeout)
        }
    }

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    fn signer(uri: &str) -> DataSigner {
        DataSigner::generate(name(uri)).unwrap()
    }

    fn verifier(anchors: Vec<TrustAnchor>) -> TrustVerifier {
        TrustVerifier::new(
            TrustPolicy::new(anchors, &AuthorizationRule::ndns_defaults()).unwrap(),
            Arc::new(RingCrypto::new()),
            Arc::new(TrustedKeyCache::new(100)),
        )
    }

    fn record(signer: &DataSigner, uri: &str) -> SignedObject {
        signer.sign(name(uri), Bytes::from_static(b"rr"), ContentType::Data, 60)
    }

    #[tokio::test]
    async fn test_depth_zero_is_rejected() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            root.key_name().clone(),
            Name::root(),
            root.public_key(),
        )]);
        let fetcher = MapFetcher::default();

        let object = record(&root, "/DNS/ndn/NS");
        assert!(!verifier.verify(&fetcher, &object, 0).await);
        assert!(verifier.verify(&fetcher, &object, 1).await);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_anchors_rejects_everything() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let verifier = verifier(Vec::new());

        let object = record(&root, "/DNS/ndn/NS");
        assert!(!verifier.verify(&MapFetcher::default(), &object, 5).await);
    }

    #[tokio::test]
    async fn test_anchor_outside_namespace_falls_back_to_rules() {
        let anchor = signer("/DNS/ksk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            anchor.key_name().clone(),
            name("/ndn"),
            anchor.public_key(),
        )]);
        let fetcher = MapFetcher::default();

        // "/org/..." is outside the anchor namespace and the certificate
        // cannot be fetched
        let object = record(&anchor, "/org/DNS/www/TXT");
        assert!(!verifier.verify(&fetcher, &object, 5).await);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_through_zone_key() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let zone = signer("/ndn/DNS/zsk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            root.key_name().clone(),
            Name::root(),
            root.public_key(),
        )]);

        let mut fetcher = MapFetcher::default();
        fetcher.certificates.insert(
            zone.key_name().clone(),
            root.certify(zone.key_name().clone(), &zone.public_key(), 3600),
        );

        let object = record(&zone, "/ndn/DNS/www/TXT");
        assert!(verifier.verify(&fetcher, &object, 5).await);
        assert_eq!(verifier.key_cache().get(zone.key_name()), Some(zone.public_key()));

        // second object signed by the same key needs no fetch
        let other = record(&zone, "/ndn/DNS/mail/TXT");
        assert!(verifier.verify(&fetcher, &other, 5).await);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_needs_two_links() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let zone = signer("/ndn/DNS/zsk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            root.key_name().clone(),
            Name::root(),
            root.public_key(),
        )]);

        let mut fetcher = MapFetcher::default();
        fetcher.certificates.insert(
            zone.key_name().clone(),
            root.certify(zone.key_name().clone(), &zone.public_key(), 3600),
        );

        let object = record(&zone, "/ndn/DNS/www/TXT");
        assert!(!verifier.verify(&fetcher, &object, 1).await);
        assert!(verifier.key_cache().is_empty());
    }

    #[tokio::test]
    async fn test_forged_record_is_rejected() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let zone = signer("/ndn/DNS/zsk-1/NDNCERT");
        let impostor = signer("/ndn/DNS/zsk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            root.key_name().clone(),
            Name::root(),
            root.public_key(),
        )]);

        let mut fetcher = MapFetcher::default();
        fetcher.certificates.insert(
            zone.key_name().clone(),
            root.certify(zone.key_name().clone(), &zone.public_key(), 3600),
        );

        let forged = record(&impostor, "/ndn/DNS/www/TXT");
        assert!(!verifier.verify(&fetcher, &forged, 5).await);
        assert!(verifier.key_cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_key_expires_with_certificate_freshness() {
        let root = signer("/DNS/ksk-1/NDNCERT");
        let zone = signer("/ndn/DNS/zsk-1/NDNCERT");
        let verifier = verifier(vec![TrustAnchor::new(
            root.key_name().clone(),
            Name::root(),
            root.public_key(),
        )]);

        let mut fetcher = MapFetcher::default();
        fetcher.certificates.insert(
            zone.key_name().clone(),
            root.certify(zone.key_name().clone(), &zone.public_key(), 10),
        );

        let object = record(&zone, "/ndn/DNS/www/TXT");
        assert!(verifier.verify(&fetcher, &object, 5).await);

        tokio::time::advance(Duration::from_secs(11)).await;

        assert!(verifier.verify(&fetcher, &object, 5).await);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
