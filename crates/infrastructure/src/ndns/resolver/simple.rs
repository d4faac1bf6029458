use super::QueryOptions;
use crate::ndns::trust::TrustVerifier;
use ndns_application::ports::{
    CertificateFetcher, PacketCodec, RecordCodec, Resolution, Transport,
};
use ndns_domain::{
    dnsify, DomainError, Name, QueryShape, QueryTarget, RecordData, RecordSet,
    RecordSetMessage, SignedObject,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// How one network query should be sent and checked
#[derive(Debug, Clone)]
pub struct SimpleRequest {
    pub target: QueryTarget,
    /// Forwarding hint to encapsulate the query under
    pub hint: Option<Name>,
    /// Parse the payload as a record-set message
    pub want_parsed: bool,
    pub options: QueryOptions,
}

impl SimpleRequest {
    pub fn new(target: QueryTarget, hint: Option<Name>, options: QueryOptions) -> Self {
        Self {
            target,
            hint,
            want_parsed: true,
            options,
        }
    }

    /// Fetch the object only, without parsing its payload
    pub fn raw(mut self) -> Self {
        self.want_parsed = false;
        self
    }
}

/// One request, one reply
///
/// Sends a single Interest (hint-encapsulated when needed), unwraps the
/// inner object of an encapsulated reply, runs it through the trust
/// verifier and parses the payload.
pub struct SimpleQuery {
    transport: Arc<dyn Transport>,
    packet_codec: Arc<dyn PacketCodec>,
    record_codec: Arc<dyn RecordCodec>,
    verifier: Arc<TrustVerifier>,
    interest_lifetime: Duration,
}

impl SimpleQuery {
    pub fn new(
        transport: Arc<dyn Transport>,
        packet_codec: Arc<dyn PacketCodec>,
        record_codec: Arc<dyn RecordCodec>,
        verifier: Arc<TrustVerifier>,
        interest_lifetime: Duration,
    ) -> Self {
        Self {
            transport,
            packet_codec,
            record_codec,
            verifier,
            interest_lifetime,
        }
    }

    /// Name actually sent for `query`, and whether the hint was applied
    pub fn wire_name(query: &Name, hint: Option<&Name>) -> (Name, bool) {
        match hint {
            Some(hint) if !hint.is_prefix_of(query) => (Name::encapsulate(hint, query), true),
            _ => (query.clone(), false),
        }
    }

    pub async fn query(
        &self,
        fetcher: &dyn CertificateFetcher,
        query: &Name,
        request: &SimpleRequest,
    ) -> Result<Resolution, DomainError> {
        let (wire_name, hinted) = Self::wire_name(query, request.hint.as_ref());

        trace!(name = %wire_name, hinted = hinted, "Expressing interest");

        let reply = tokio::time::timeout(
            self.interest_lifetime,
            self.transport.express_interest(&wire_name),
        )
        .await
        .map_err(|_| {
            debug!(name = %wire_name, "Interest timed out");
            DomainError::QueryTimeout
        })??;

        let object = if hinted {
            self.packet_codec.decode(&reply.content)?
        } else {
            reply
        };

        if request.options.verify
            && !self
                .verifier
                .verify(fetcher, &object, request.options.depth)
                .await
        {
            debug!(name = %object.name, "Answer failed verification");
            return Err(DomainError::AnswerNotTrusted);
        }

        let answer = if request.want_parsed {
            Some(self.parse_answer(query, &object, &request.target)?)
        } else {
            None
        };

        Ok(Resolution::new(object, answer))
    }

    /// Simple query for `<zone>/DNS/<label…>/<TYPE>`
    pub async fn query_shape(
        &self,
        fetcher: &dyn CertificateFetcher,
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
        self.query(fetcher, &query, &request).await
    }

    /// Parse the payload of `object`
    ///
    /// Certificates are published as raw key bits; when such a payload does
    /// not parse, a single-record answer is built around it instead.
    pub fn parse_answer(
        &self,
        query: &Name,
        object: &SignedObject,
        target: &QueryTarget,
    ) -> Result<RecordSetMessage, DomainError> {
        let reason = match self.record_codec.parse(&object.content) {
            Ok(message) => return Ok(message),
            Err(DomainError::InvalidRecordData(reason)) => reason,
            Err(e) => return Err(e),
        };

        let is_certificate = target
            .record_type(query)
            .is_some_and(|record_type| record_type.is_certificate());
        if !is_certificate {
            return Err(DomainError::InvalidRecordData(reason));
        }

        let shape = target.resolve(query)?;
        let owner = dnsify(&shape.label).unwrap_or_else(|_| shape.label.to_string());

        trace!(name = %object.name, owner = %owner, "Wrapping raw certificate payload");

        Ok(RecordSetMessage::new().with_answer(
            RecordSet::new(owner, shape.record_type).with_record(
                object.freshness_seconds,
                RecordData::NdnCert {
                    certificate: object.content.clone(),
                },
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndns::codec::{TlvPacketCodec, WireRecordCodec};
    use crate::ndns::crypto::RingCrypto;
    use crate::ndns::transport::InMemoryTransport;
    use crate::ndns::trust::{TrustPolicy, TrustedKeyCache};
    use async_trait::async_trait;
    use bytes::Bytes;
    use ndns_domain::{AuthorizationRule, ContentType, RecordType};

    struct NoCertificates;

    #[async_trait]
    impl CertificateFetcher for NoCertificates {
        async fn fetch_certificate(
            &self,
            _key_name: &Name,
            _depth: u32,
        ) -> Result<SignedObject, DomainError> {
            Err(DomainError::QueryTimeout)
        }
    }

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    fn simple_query(transport: Arc<InMemoryTransport>) -> SimpleQuery {
        let verifier = TrustVerifier::new(
            TrustPolicy::new(Vec::new(), &AuthorizationRule::ndns_defaults()).unwrap(),
            Arc::new(RingCrypto::new()),
            Arc::new(TrustedKeyCache::new(16)),
        );
        SimpleQuery::new(
            transport,
            Arc::new(TlvPacketCodec::new()),
            Arc::new(WireRecordCodec::new()),
            Arc::new(verifier),
            Duration::from_millis(100),
        )
    }

    fn unsigned(uri: &str, content: Bytes) -> SignedObject {
        SignedObject {
            name: name(uri),
            content,
            content_type: ContentType::Key,
            freshness_seconds: 300,
            key_locator: None,
            signature: Bytes::new(),
        }
    }

    #[test]
    fn test_wire_name() {
        let query = name("/ndn/DNS/www/TXT");

        let (wire, hinted) = SimpleQuery::wire_name(&query, None);
        assert_eq!((wire, hinted), (query.clone(), false));

        // a hint that already prefixes the query is not applied
        let (wire, hinted) = SimpleQuery::wire_name(&query, Some(&name("/ndn")));
        assert_eq!((wire, hinted), (query.clone(), false));

        let (wire, hinted) = SimpleQuery::wire_name(&query, Some(&name("/hub")));
        assert!(hinted);
        assert_eq!(wire, Name::encapsulate(&name("/hub"), &query));
    }

    #[tokio::test]
    async fn test_raw_certificate_gets_synthesized_answer() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.publish(unsigned(
            "/ndn/DNS/alex/zsk-1/NDNCERT",
            Bytes::from(vec![5u8; 32]),
        ));
        let simple = simple_query(transport);

        let query = name("/ndn/DNS/alex/zsk-1/NDNCERT");
        let request = SimpleRequest::new(QueryTarget::Inferred, None, QueryOptions::unverified(1));
        let resolution = simple.query(&NoCertificates, &query, &request).await.unwrap();

        let answer = resolution.answer.unwrap();
        let rrset = answer.answer_of_type(RecordType::NDNCERT).unwrap();
        assert_eq!(rrset.owner, "zsk-1.alex");
        assert_eq!(rrset.records[0].ttl, 300);
        assert_eq!(
            rrset.records[0].data,
            RecordData::NdnCert {
                certificate: Bytes::from(vec![5u8; 32])
            }
        );
    }

    #[tokio::test]
    async fn test_raw_payload_for_other_types_is_an_error() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.publish(unsigned("/ndn/DNS/www/TXT", Bytes::from_static(b"junk")));
        let simple = simple_query(transport);

        let request = SimpleRequest::new(QueryTarget::Inferred, None, QueryOptions::unverified(1));
        let result = simple
            .query(&NoCertificates, &name("/ndn/DNS/www/TXT"), &request)
            .await;

        assert!(matches!(result, Err(DomainError::InvalidRecordData(_))));
    }

    #[tokio::test]
    async fn test_malformed_certificate_query() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.publish(unsigned("/ndn/alex/NDNCERT", Bytes::from(vec![5u8; 32])));
        let simple = simple_query(transport);

        let request = SimpleRequest::new(QueryTarget::Inferred, None, QueryOptions::unverified(1));
        let result = simple
            .query(&NoCertificates, &name("/ndn/alex/NDNCERT"), &request)
            .await;

        assert!(matches!(result, Err(DomainError::MalformedQuery(_))));
    }

    #[tokio::test]
    async fn test_unverifiable_answer_is_not_trusted() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.publish(unsigned("/ndn/DNS/www/TXT", Bytes::new()));
        let simple = simple_query(transport);

        let request = SimpleRequest::new(QueryTarget::Inferred, None, QueryOptions::verified(5));
        let result = simple
            .query(&NoCertificates, &name("/ndn/DNS/www/TXT"), &request)
            .await;

        assert!(matches!(result, Err(DomainError::AnswerNotTrusted)));
    }

    #[tokio::test]
    async fn test_missing_reply_times_out() {
        let simple = simple_query(Arc::new(InMemoryTransport::new()));

        let request = SimpleRequest::new(QueryTarget::Inferred, None, QueryOptions::unverified(1))
            .raw();
        let result = simple
            .query(&NoCertificates, &name("/ndn/DNS/www/TXT"), &request)
            .await;

        assert!(matches!(result, Err(DomainError::QueryTimeout)));
    }
}
