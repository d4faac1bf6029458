//! NDNS Domain Layer
pub mod config;
pub mod dnsifier;
pub mod errors;
pub mod name;
pub mod query;
pub mod record;
pub mod record_type;
pub mod signed_object;
pub mod trust;

pub use config::{Config, ConfigError};
pub use dnsifier::{dnsify, ndnify, relative_label};
pub use errors::DomainError;
pub use name::{Component, Name};
pub use query::{PartialResolution, QueryShape, QueryTarget, ResolutionState};
pub use record::{Record, RecordData, RecordSet, RecordSetMessage};
pub use record_type::RecordType;
pub use signed_object::{ContentType, SignedObject};
pub use trust::{AuthorizationRule, PublicKey, TrustAnchor};
