pub mod entries;
pub mod query_cache;

pub use entries::{AnswerEntry, CacheTable, CachedAnswer, TableStats};
pub use query_cache::{CacheStatsSnapshot, QueryCache};
