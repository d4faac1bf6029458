//! Configuration module for NDNS
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration, loading and validation
//! - `trust`: Trust anchors, authorization rules and chain limits
//! - `query`: Network query settings
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod query;
pub mod root;
pub mod trust;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use query::QueryConfig;
pub use root::Config;
pub use trust::{AuthorizationRuleConfig, TrustAnchorConfig, TrustConfig};
