//! Application-level configuration.

use serde::{Deserialize, Serialize};

use super::catalog::CatalogConfig;
use super::inference::InferenceConfig;
use super::quota::{QuotaConfig, QuotaStoreKind};
use super::server::ServerConfig;
use crate::error::ConfigError;

/// Full application configuration.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub catalog: CatalogConfig,
    pub quota: QuotaConfig,
    /// Inference provider credentials. Order defines the `key-N` labels.
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("inference", &self.inference)
            .field("catalog", &self.catalog)
            .field("quota", &self.quota)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}

impl AppConfig {
    /// Check numeric bounds. URL syntax is checked by the loader.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quota.daily_limit == 0 {
            return Err(ConfigError::invalid("quota.daily_limit", "must be greater than 0"));
        }
        if self.inference.max_attempts == 0 {
            return Err(ConfigError::invalid("inference.max_attempts", "must be greater than 0"));
        }
        if self.inference.attempt_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "inference.attempt_timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.inference.cooldown_base_secs > self.inference.cooldown_max_secs {
            return Err(ConfigError::invalid(
                "inference.cooldown_base_secs",
                "must not exceed cooldown_max_secs",
            ));
        }
        if self.inference.model.trim().is_empty() {
            return Err(ConfigError::invalid("inference.model", "must not be empty"));
        }
        if self.quota.store == QuotaStoreKind::Sqlite && self.quota.sqlite_path.is_none() {
            return Err(ConfigError::invalid("quota.sqlite_path", "required when store = sqlite"));
        }
        Ok(())
    }

    /// Drop blank and duplicate keys, keeping first occurrence order.
    pub fn normalize_api_keys(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.api_keys = std::mem::take(&mut self.api_keys)
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_daily_limit_rejected() {
        let mut config = AppConfig::default();
        config.quota.daily_limit = 0;
        match config.validate() {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "quota.daily_limit"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"quota": {"daily_limit": 5}, "api_keys": ["a"]}"#)
                .expect("parse");
        assert_eq!(config.quota.daily_limit, 5);
        assert_eq!(config.inference.max_attempts, 3);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_normalize_api_keys() {
        let mut config = AppConfig {
            api_keys: vec![" a ".into(), "".into(), "b".into(), "a".into()],
            ..AppConfig::default()
        };
        config.normalize_api_keys();
        assert_eq!(config.api_keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AppConfig { api_keys: vec!["AIza-secret".into()], ..AppConfig::default() };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("1 redacted"));
    }
}
