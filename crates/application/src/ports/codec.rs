use bytes::Bytes;
use ndns_domain::{DomainError, RecordSetMessage, SignedObject};

/// Record-set message wire format
pub trait RecordCodec: Send + Sync {
    /// Fails with `DomainError::InvalidRecordData` when `bytes` are not a
    /// record-set message (e.g. a raw certificate blob)
    fn parse(&self, bytes: &[u8]) -> Result<RecordSetMessage, DomainError>;

    fn serialize(&self, message: &RecordSetMessage) -> Result<Bytes, DomainError>;
}

/// Signed object wire format, used to unwrap hint-encapsulated replies
pub trait PacketCodec: Send + Sync {
    fn encode(&self, object: &SignedObject) -> Bytes;

    fn decode(&self, bytes: &[u8]) -> Result<SignedObject, DomainError>;
}
