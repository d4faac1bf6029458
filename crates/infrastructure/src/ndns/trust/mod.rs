pub mod key_cache;
pub mod policy;
pub mod verifier;

pub use key_cache::{KeyCacheStats, TrustedKeyCache};
pub use policy::TrustPolicy;
pub use verifier::TrustVerifier;
