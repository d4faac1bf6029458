use super::name::Name;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use std::fmt;

/// Public key material as understood by the crypto collaborator
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(Bytes);

impl PublicKey {
    pub fn new(bits: impl Into<Bytes>) -> Self {
        Self(bits.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoding used for `public_key` in the config file
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bytes)", self.0.len())
    }
}

/// A pinned key: trusted without verification, but only for data under
/// its namespace
#[derive(Debug, Clone)]
pub struct TrustAnchor {
    pub key_name: Name,
    pub namespace: Name,
    pub public_key: PublicKey,
}

impl TrustAnchor {
    pub fn new(key_name: Name, namespace: Name, public_key: PublicKey) -> Self {
        Self {
            key_name,
            namespace,
            public_key,
        }
    }

    /// Exact signer match and data inside the anchor's namespace
    pub fn authorizes(&self, data_name: &Name, key_name: &Name) -> bool {
        self.key_name == *key_name && self.namespace.is_prefix_of(data_name)
    }
}

/// Pattern-based signing authorization
///
/// `key_pattern` / `data_pattern` are regular expressions matched against
/// the URI form of the signer key name and the data name; the templates
/// (`\1`, `\3`, ...) derive a namespace from each match. The key may sign
/// the data when the key namespace is a prefix of the data namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRule {
    pub key_pattern: String,
    pub key_template: String,
    pub data_pattern: String,
    pub data_template: String,
}

impl AuthorizationRule {
    pub fn new(
        key_pattern: impl Into<String>,
        key_template: impl Into<String>,
        data_pattern: impl Into<String>,
        data_template: impl Into<String>,
    ) -> Self {
        Self {
            key_pattern: key_pattern.into(),
            key_template: key_template.into(),
            data_pattern: data_pattern.into(),
            data_template: data_template.into(),
        }
    }

    /// The stock NDNS rules
    ///
    /// 1. A zone key (`<zone>/DNS/<label>/<id>/NDNCERT`) signs records of
    ///    its own zone and label.
    /// 2. Same key signs records of a zone published with a dotted
    ///    component (`/ndn/ucla.edu/DNS/...` as `/ndn/edu/ucla/...`).
    /// 3. Same key signs anything below its derived namespace.
    pub fn ndns_defaults() -> Vec<AuthorizationRule> {
        const ZONE_KEY: &str = r"^((/[^/]+)*)/DNS((/[^/]+)*)/[^/]+/NDNCERT$";
        vec![
            AuthorizationRule::new(ZONE_KEY, r"\1\3", r"^((/[^/]+)*)/DNS((/[^/]+)*)$", r"\1\3"),
            AuthorizationRule::new(
                ZONE_KEY,
                r"\1\3",
                r"^((/[^/]+)*)/([^/\.]+)\.([^/\.]+)/DNS((/[^/]+)*)$",
                r"\1/\4/\3\5",
            ),
            AuthorizationRule::new(ZONE_KEY, r"\1\3", r"(.*)", r"\1"),
        ]
    }
}
