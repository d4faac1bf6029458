use super::iterative::IterativeQuery;
use super::simple::{SimpleQuery, SimpleRequest};
use super::QueryOptions;
use crate::ndns::cache::{CacheTable, CachedAnswer, QueryCache};
use crate::ndns::trust::TrustVerifier;
use async_trait::async_trait;
use ndns_application::ports::{CertificateFetcher, NameResolver, Resolution};
use ndns_domain::{
    DomainError, Name, QueryShape, QueryTarget, RecordData, RecordType, SignedObject,
};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolver front end: memoizes answers by (name, type), by zone and by
/// wire query
///
/// Cache misses run an [`IterativeQuery`], whose NS/FH probes come back
/// through [`CachingQuery::resolve_simple`]. The trust verifier reaches
/// this type through [`CertificateFetcher`] to retrieve certificates.
pub struct CachingQuery {
    simple: SimpleQuery,
    verifier: Arc<TrustVerifier>,
    cache: Arc<QueryCache>,
    chain_limit: u32,
}

impl CachingQuery {
    pub fn new(
        simple: SimpleQuery,
        verifier: Arc<TrustVerifier>,
        cache: Arc<QueryCache>,
        chain_limit: u32,
    ) -> Self {
        Self {
            simple,
            verifier,
            cache,
            chain_limit,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn verifier(&self) -> &Arc<TrustVerifier> {
        &self.verifier
    }

    /// Options for a caller-facing request: verified, full chain budget
    pub fn top_level_options(&self) -> QueryOptions {
        QueryOptions::verified(self.chain_limit)
    }

    /// Verify `object` with the configured chain limit
    pub async fn verify(&self, object: &SignedObject) -> bool {
        self.verifier.verify(self, object, self.chain_limit).await
    }

    /// `record_type` records of `name`, with zone cut discovery
    pub async fn resolve_named(
        &self,
        name: &Name,
        record_type: RecordType,
        options: QueryOptions,
    ) -> Result<Resolution, DomainError> {
        let key = (name.clone(), record_type);
        if let Some(cached) = self.cache.named().get(&key) {
            return self
                .serve_cached(self.cache.named(), &key, cached, options)
                .await;
        }

        let resolution = IterativeQuery::new(self, options)
            .resolve(name, record_type)
            .await?;

        self.cache.named().insert(
            key,
            resolution.object.clone(),
            resolution.answer.clone(),
            options.verify,
        );

        Ok(resolution)
    }

    /// Forwarding hint of `zone`
    pub async fn resolve_zone_hint(
        &self,
        zone: &Name,
        options: QueryOptions,
    ) -> Result<Name, DomainError> {
        let resolution = match self.cache.zone_hints().get(zone) {
            Some(cached) => {
                self.serve_cached(self.cache.zone_hints(), zone, cached, options)
                    .await?
            }
            None => {
                let resolution = IterativeQuery::new(self, options)
                    .resolve(zone, RecordType::FH)
                    .await?;
                self.cache.zone_hints().insert(
                    zone.clone(),
                    resolution.object.clone(),
                    resolution.answer.clone(),
                    options.verify,
                );
                resolution
            }
        };

        preferred_hint(&resolution).ok_or_else(|| {
            DomainError::NoAnswer(format!("zone [{}] has no forwarding hint", zone))
        })
    }

    /// One network query, memoized by the exact name sent on the wire
    pub async fn resolve_raw(
        &self,
        query: &Name,
        request: &SimpleRequest,
    ) -> Result<Resolution, DomainError> {
        let (wire_name, _) = SimpleQuery::wire_name(query, request.hint.as_ref());

        if let Some(cached) = self.cache.raw().get(&wire_name) {
            let mut resolution = self
                .serve_cached(self.cache.raw(), &wire_name, cached, request.options)
                .await?;
            if request.want_parsed && resolution.answer.is_none() {
                resolution.answer = Some(self.simple.parse_answer(
                    query,
                    &resolution.object,
                    &request.target,
                )?);
            }
            return Ok(resolution);
        }

        let resolution = self.simple.query(self, query, request).await?;

        self.cache.raw().insert(
            wire_name,
            resolution.object.clone(),
            resolution.answer.clone(),
            request.options.verify,
        );

        Ok(resolution)
    }

    /// Query `<zone>/DNS/<label…>/<TYPE>`, optionally through `hint`
    pub async fn resolve_simple(
        &self,
        shape: QueryShape,
        hint: Option<Name>,
        options: QueryOptions,
    ) -> Result<Resolution, DomainError> {
        let query = shape.query_name();
        let request = SimpleRequest::new(
            QueryTarget::Explicit {
                zone: shape.zone,
                label: shape.label,
                record_type: shape.record_type,
            },
            hint,
            options,
        );
        self.resolve_raw(&query, &request).await
    }

    async fn serve_cached<K>(
        &self,
        table: &CacheTable<K>,
        key: &K,
        cached: CachedAnswer,
        options: QueryOptions,
    ) -> Result<Resolution, DomainError>
    where
        K: Eq + Hash + Debug + Send + Sync,
    {
        if options.verify && !cached.verified {
            if !self.verifier.verify(self, &cached.object, options.depth).await {
                return Err(DomainError::AnswerNotTrusted);
            }
            table.mark_verified(key);
        }

        Ok(Resolution {
            object: cached.object,
            answer: cached.answer,
            cache_hit: true,
        })
    }
}

/// Lowest-priority forwarding hint of an FH answer
fn preferred_hint(resolution: &Resolution) -> Option<Name> {
    resolution
        .answer
        .as_ref()?
        .answer_of_type(RecordType::FH)?
        .records
        .iter()
        .filter_map(|record| match &record.data {
            RecordData::Fh { priority, hint, .. } => Some((*priority, hint)),
            _ => None,
        })
        .min_by_key(|(priority, _)| *priority)
        .map(|(_, hint)| hint.clone())
}

#[async_trait]
impl CertificateFetcher for CachingQuery {
    /// Certificates come back unverified: the verifier checks them itself.
    /// A key whose zone has no reachable forwarding hint is asked for by
    /// its plain name.
    async fn fetch_certificate(
        &self,
        key_name: &Name,
        depth: u32,
    ) -> Result<SignedObject, DomainError> {
        let options = QueryOptions::unverified(depth);
        let request = SimpleRequest::new(QueryTarget::Inferred, None, options).raw();

        let resolution = match key_name.service_marker_position() {
            None | Some(0) => self.resolve_raw(key_name, &request).await?,
            Some(position) => {
                let zone = key_name.prefix(position);
                match self.resolve_zone_hint(&zone, options).await {
                    Ok(hint) => {
                        debug!(key = %key_name, zone = %zone, hint = %hint, "Fetching certificate through hint");
                        let request = SimpleRequest {
                            hint: Some(hint),
                            ..request
                        };
                        self.resolve_raw(key_name, &request).await?
                    }
                    Err(e) => {
                        debug!(key = %key_name, zone = %zone, error = %e, "No zone hint, fetching certificate by name");
                        self.resolve_raw(key_name, &request).await?
                    }
                }
            }
        };

        Ok(resolution.object)
    }
}

#[async_trait]
impl NameResolver for CachingQuery {
    async fn resolve(
        &self,
        name: &Name,
        record_type: RecordType,
    ) -> Result<Resolution, DomainError> {
        let resolution = self
            .resolve_named(name, record_type, self.top_level_options())
            .await?;

        info!(
            name = %name,
            record_type = %record_type,
            cache_hit = resolution.cache_hit,
            "Resolved"
        );

        Ok(resolution)
    }
}
