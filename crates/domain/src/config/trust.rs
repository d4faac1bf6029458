use super::ConfigError;
use crate::name::Name;
use crate::trust::{AuthorizationRule, PublicKey, TrustAnchor};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Trust policy configuration
///
/// Anchors and rules are kept in file order: the first matching entry
/// decides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrustConfig {
    /// Maximum length of a certificate chain (default: 10)
    #[serde(default = "default_chain_limit")]
    pub chain_limit: u32,

    /// Maximum number of verified keys kept in memory; the whole cache is
    /// dropped when it fills up (default: 10000)
    #[serde(default = "default_key_cache_capacity")]
    pub key_cache_capacity: usize,

    #[serde(default)]
    pub anchors: Vec<TrustAnchorConfig>,

    #[serde(default = "default_rules")]
    pub rules: Vec<AuthorizationRuleConfig>,
}

impl TrustConfig {
    pub fn trust_anchors(&self) -> Result<Vec<TrustAnchor>, ConfigError> {
        self.anchors.iter().map(TrustAnchorConfig::to_anchor).collect()
    }

    pub fn authorization_rules(&self) -> Vec<AuthorizationRule> {
        self.rules.iter().cloned().map(AuthorizationRule::from).collect()
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            chain_limit: default_chain_limit(),
            key_cache_capacity: default_key_cache_capacity(),
            anchors: Vec::new(),
            rules: default_rules(),
        }
    }
}

/// Pinned key as written in the config file
///
/// ```toml
/// [[trust.anchors]]
/// key_name = "/DNS/ksk-1/NDNCERT"
/// namespace = "/"
/// public_key = "base64..."
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrustAnchorConfig {
    pub key_name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Base64-encoded public key bits
    pub public_key: String,
}

impl TrustAnchorConfig {
    pub fn to_anchor(&self) -> Result<TrustAnchor, ConfigError> {
        let key_name = Name::parse(&self.key_name).map_err(|e| {
            ConfigError::Validation(format!("anchor key name [{}]: {}", self.key_name, e))
        })?;
        let namespace = Name::parse(&self.namespace).map_err(|e| {
            ConfigError::Validation(format!("anchor namespace [{}]: {}", self.namespace, e))
        })?;
        let bits = STANDARD.decode(self.public_key.trim()).map_err(|e| {
            ConfigError::Validation(format!("anchor [{}] public key: {}", self.key_name, e))
        })?;

        Ok(TrustAnchor::new(key_name, namespace, PublicKey::new(bits)))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizationRuleConfig {
    pub key_pattern: String,
    pub key_template: String,
    pub data_pattern: String,
    pub data_template: String,
}

impl From<AuthorizationRuleConfig> for AuthorizationRule {
    fn from(config: AuthorizationRuleConfig) -> Self {
        AuthorizationRule::new(
            config.key_pattern,
            config.key_template,
            config.data_pattern,
            config.data_template,
        )
    }
}

impl From<AuthorizationRule> for AuthorizationRuleConfig {
    fn from(rule: AuthorizationRule) -> Self {
        Self {
            key_pattern: rule.key_pattern,
            key_template: rule.key_template,
            data_pattern: rule.data_pattern,
            data_template: rule.data_template,
        }
    }
}

fn default_chain_limit() -> u32 {
    10
}

fn default_key_cache_capacity() -> usize {
    10_000
}

fn default_namespace() -> String {
    "/".to_string()
}

fn default_rules() -> Vec<AuthorizationRuleConfig> {
    AuthorizationRule::ndns_defaults()
        .into_iter()
        .map(AuthorizationRuleConfig::from)
        .collect()
}
