use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network query settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// How long to wait for a reply to one Interest, in milliseconds
    #[serde(default = "default_interest_lifetime_ms")]
    pub interest_lifetime_ms: u64,
}

impl QueryConfig {
    pub fn interest_lifetime(&self) -> Duration {
        Duration::from_millis(self.interest_lifetime_ms)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            interest_lifetime_ms: default_interest_lifetime_ms(),
        }
    }
}

fn default_interest_lifetime_ms() -> u64 {
    4000
}
