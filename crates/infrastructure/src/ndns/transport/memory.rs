use crate::ndns::codec::TlvPacketCodec;
use async_trait::async_trait;
use dashmap::DashMap;
use ndns_application::ports::{PacketCodec, Transport};
use ndns_domain::{Component, ContentType, DomainError, Name, SignedObject};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug, Clone)]
struct Published {
    object: SignedObject,
    /// Only reachable through this forwarding hint
    behind: Option<Name>,
}

/// Local publish/serve face
///
/// An Interest is answered with the published object whose name it is a
/// prefix of, latest version first. Interests of the form
/// `hint ∥ ESCAPE ∥ query` are answered with an unsigned wrapper whose
/// content is the encoded inner object. Names with no matching object time
/// out.
pub struct InMemoryTransport {
    store: DashMap<Name, Published>,
    codec: Arc<dyn PacketCodec>,
    interests: RwLock<Vec<Name>>,
    call_count: AtomicU64,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::with_codec(Arc::new(TlvPacketCodec::new()))
    }

    pub fn with_codec(codec: Arc<dyn PacketCodec>) -> Self {
        Self {
            store: DashMap::new(),
            codec,
            interests: RwLock::new(Vec::new()),
            call_count: AtomicU64::new(0),
        }
    }

    /// Serve `object` to plain and hinted Interests
    pub fn publish(&self, object: SignedObject) {
        self.store.insert(
            object.name.clone(),
            Published {
                object,
                behind: None,
            },
        );
    }

    /// Serve `object` only to Interests encapsulated under `hint`
    pub fn publish_behind(&self, hint: Name, object: SignedObject) {
        self.store.insert(
            object.name.clone(),
            Published {
                object,
                behind: Some(hint),
            },
        );
    }

    pub fn unpublish(&self, name: &Name) {
        self.store.remove(name);
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every Interest name received, in order
    pub async fn interests(&self) -> Vec<Name> {
        self.interests.read().await.clone()
    }

    pub async fn reset_log(&self) {
        self.interests.write().await.clear();
        self.call_count.store(0, Ordering::Relaxed);
    }

    fn lookup(&self, query: &Name, hint: Option<&Name>) -> Option<SignedObject> {
        self.store
            .iter()
            .filter(|entry| query.is_prefix_of(entry.key()))
            .filter(|entry| match &entry.behind {
                None => true,
                Some(required) => Some(required) == hint,
            })
            .max_by_key(|entry| entry.object.name.last().and_then(Component::to_version))
            .map(|entry| entry.object.clone())
    }

    fn wrap(&self, interest: &Name, inner: &SignedObject) -> SignedObject {
        SignedObject {
            name: interest.clone(),
            content: self.codec.encode(inner),
            content_type: ContentType::Data,
            freshness_seconds: inner.freshness_seconds,
            key_locator: None,
            signature: bytes::Bytes::new(),
        }
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn express_interest(&self, name: &Name) -> Result<SignedObject, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.interests.write().await.push(name.clone());

        let reply = match name.split_encapsulated() {
            Some((hint, query)) => self
                .lookup(&query, Some(&hint))
                .map(|inner| self.wrap(name, &inner)),
            None => self.lookup(name, None),
        };

        trace!(name = %name, found = reply.is_some(), "In-memory interest");

        reply.ok_or(DomainError::QueryTimeout)
    }
}
