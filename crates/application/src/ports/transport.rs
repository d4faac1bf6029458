use async_trait::async_trait;
use ndns_domain::{DomainError, Name, SignedObject};

/// Name-addressed request/reply network primitive
///
/// One call sends one Interest and yields at most one Data. A missing reply
/// is reported as `DomainError::QueryTimeout`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn express_interest(&self, name: &Name) -> Result<SignedObject, DomainError>;
}
