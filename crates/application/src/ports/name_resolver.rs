use async_trait::async_trait;
use ndns_domain::{DomainError, Name, RecordSetMessage, RecordType, SignedObject};

/// Authenticated answer for a query
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Signed object the answer came from
    pub object: SignedObject,
    /// Parsed payload, when parsing was requested
    pub answer: Option<RecordSetMessage>,
    pub cache_hit: bool,
}

impl Resolution {
    pub fn new(object: SignedObject, answer: Option<RecordSetMessage>) -> Self {
        Self {
            object,
            answer,
            cache_hit: false,
        }
    }
}

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `record_type` records for `name`, discovering zone cuts and
    /// forwarding hints on the way
    async fn resolve(&self, name: &Name, record_type: RecordType)
        -> Result<Resolution, DomainError>;
}
