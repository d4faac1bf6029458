use super::{ConfigError, LoggingConfig, QueryConfig, TrustConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub trust: TrustConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no path is given
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(Path::new(path))
                    .map_err(|e| ConfigError::FileRead(format!("{}: {}", path, e)))?;
                Self::from_toml_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check limits and that every anchor can be decoded
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trust.chain_limit == 0 {
            return Err(ConfigError::Validation(
                "trust.chain_limit must be at least 1".into(),
            ));
        }

        if self.trust.key_cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "trust.key_cache_capacity must be at least 1".into(),
            ));
        }

        if self.query.interest_lifetime_ms == 0 {
            return Err(ConfigError::Validation(
                "query.interest_lifetime_ms must be greater than 0".into(),
            ));
        }

        self.trust.trust_anchors()?;

        for (index, rule) in self.trust.rules.iter().enumerate() {
            if rule.key_pattern.is_empty() || rule.data_pattern.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "trust.rules[{}] has an empty pattern",
                    index
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.trust.chain_limit, 10);
        assert_eq!(config.trust.key_cache_capacity, 10_000);
        assert_eq!(config.trust.rules.len(), 3);
        assert!(config.trust.anchors.is_empty());
        assert_eq!(config.query.interest_lifetime_ms, 4000);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::from_toml_str(
            r#"
            [trust]
            chain_limit = 4

            [[trust.anchors]]
            key_name = "/DNS/ksk-1/NDNCERT"
            public_key = "AAECAw=="

            [query]
            interest_lifetime_ms = 250

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.trust.chain_limit, 4);
        assert_eq!(config.query.interest_lifetime_ms, 250);
        assert_eq!(config.logging.level, "debug");

        let anchors = config.trust.trust_anchors().unwrap();
        assert_eq!(anchors.len(), 1);
        assert!(anchors[0].namespace.is_root());
        assert_eq!(anchors[0].public_key.as_bytes(), &[0, 1, 2, 3]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.trust.chain_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = Config::from_toml_str(
            r#"
            [[trust.anchors]]
            key_name = "no-slash"
            public_key = "AAECAw=="
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = Config::from_toml_str(
            r#"
            [[trust.anchors]]
            key_name = "/k"
            public_key = "!!!"
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::from_toml_str("trust = 5"),
            Err(ConfigError::Parse(_))
        ));
    }
}
