pub mod cache;
pub mod codec;
pub mod crypto;
pub mod resolver;
pub mod transport;
pub mod trust;

pub use cache::{CacheStatsSnapshot, QueryCache};
pub use codec::{TlvPacketCodec, WireRecordCodec};
pub use crypto::{rrset_data_name, DataSigner, RingCrypto};
pub use resolver::{CachingQuery, NdnsResolverBuilder, QueryOptions, SimpleQuery};
pub use transport::InMemoryTransport;
pub use trust::{TrustPolicy, TrustVerifier, TrustedKeyCache};
