use super::caching::CachingQuery;
use super::simple::SimpleQuery;
use crate::ndns::cache::QueryCache;
use crate::ndns::codec::{TlvPacketCodec, WireRecordCodec};
use crate::ndns::crypto::RingCrypto;
use crate::ndns::trust::{TrustPolicy, TrustVerifier, TrustedKeyCache};
use anyhow::Context;
use ndns_application::ports::{CryptoProvider, PacketCodec, RecordCodec, Transport};
use ndns_domain::{Config, TrustAnchor};
use std::sync::Arc;
use tracing::info;

/// Wires transport, crypto, codecs, trust verifier and caches into a
/// [`CachingQuery`]
///
/// Crypto and codecs default to the Ed25519 and wire-format adapters of
/// this crate; caches default to fresh instances sized from the config.
pub struct NdnsResolverBuilder {
    transport: Arc<dyn Transport>,
    config: Config,
    crypto: Option<Arc<dyn CryptoProvider>>,
    record_codec: Option<Arc<dyn RecordCodec>>,
    packet_codec: Option<Arc<dyn PacketCodec>>,
    key_cache: Option<Arc<TrustedKeyCache>>,
    query_cache: Option<Arc<QueryCache>>,
    extra_anchors: Vec<TrustAnchor>,
}

impl NdnsResolverBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Config::default(),
            crypto: None,
            record_codec: None,
            packet_codec: None,
            key_cache: None,
            query_cache: None,
            extra_anchors: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_crypto(mut self, crypto: Arc<dyn CryptoProvider>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    pub fn with_record_codec(mut self, codec: Arc<dyn RecordCodec>) -> Self {
        self.record_codec = Some(codec);
        self
    }

    pub fn with_packet_codec(mut self, codec: Arc<dyn PacketCodec>) -> Self {
        self.packet_codec = Some(codec);
        self
    }

    pub fn with_key_cache(mut self, cache: Arc<TrustedKeyCache>) -> Self {
        self.key_cache = Some(cache);
        self
    }

    pub fn with_query_cache(mut self, cache: Arc<QueryCache>) -> Self {
        self.query_cache = Some(cache);
        self
    }

    /// Anchor added after the configured ones
    pub fn with_trust_anchor(mut self, anchor: TrustAnchor) -> Self {
        self.extra_anchors.push(anchor);
        self
    }

    pub fn build(self) -> anyhow::Result<Arc<CachingQuery>> {
        self.config.validate().context("invalid resolver configuration")?;

        let mut anchors = self.config.trust.trust_anchors()?;
        anchors.extend(self.extra_anchors);

        info!(
            anchors = anchors.len(),
            rules = self.config.trust.rules.len(),
            chain_limit = self.config.trust.chain_limit,
            key_cache_capacity = self.config.trust.key_cache_capacity,
            "Building NDNS resolver"
        );

        let policy = TrustPolicy::new(anchors, &self.config.trust.authorization_rules())
            .context("invalid authorization rule")?;

        let key_cache = self.key_cache.unwrap_or_else(|| {
            Arc::new(TrustedKeyCache::new(self.config.trust.key_cache_capacity))
        });
        let crypto = self
            .crypto
            .unwrap_or_else(|| Arc::new(RingCrypto::new()));
        let verifier = Arc::new(TrustVerifier::new(policy, crypto, key_cache));

        let simple = SimpleQuery::new(
            self.transport,
            self.packet_codec
                .unwrap_or_else(|| Arc::new(TlvPacketCodec::new())),
            self.record_codec
                .unwrap_or_else(|| Arc::new(WireRecordCodec::new())),
            Arc::clone(&verifier),
            self.config.query.interest_lifetime(),
        );

        let resolver = CachingQuery::new(
            simple,
            verifier,
            self.query_cache.unwrap_or_default(),
            self.config.trust.chain_limit,
        );

        info!("NDNS resolver built successfully");
        Ok(Arc::new(resolver))
    }
}
