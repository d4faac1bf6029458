pub mod builder;
pub mod caching;
pub mod iterative;
pub mod simple;

pub use builder::NdnsResolverBuilder;
pub use caching::CachingQuery;
pub use iterative::IterativeQuery;
pub use simple::{SimpleQuery, SimpleRequest};

/// Verification settings carried through one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Pass answers through the trust verifier
    pub verify: bool,
    /// Remaining certificate chain budget
    pub depth: u32,
}

impl QueryOptions {
    pub fn verified(depth: u32) -> Self {
        Self {
            verify: true,
            depth,
        }
    }

    /// Zone and hint discovery on behalf of the verifier
    pub fn unverified(depth: u32) -> Self {
        Self {
            verify: false,
            depth,
        }
    }
}
