//! Configuration loading: JSON file, then environment overrides, then validation.

use halal_types::{AppConfig, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppResult;
use crate::utils::paths::get_data_dir;

const CONFIG_FILE: &str = "config.json";

/// Legacy single-key variables, read after `HALAL_API_KEYS`.
const LEGACY_KEY_VARS: &[&str] = &["KEY1", "KEY2", "KEY3", "KEY4", "KEY5", "KEY6"];

/// Load configuration from `explicit`, `HALAL_CONFIG`, or `<data_dir>/config.json`.
///
/// An explicitly named file must exist; a missing default file means defaults.
pub fn load_config(explicit: Option<&Path>) -> AppResult<AppConfig> {
    let env_path = std::env::var("HALAL_CONFIG").ok().filter(|p| !p.trim().is_empty());
    let (path, required) = match (explicit, env_path) {
        (Some(path), _) => (path.to_path_buf(), true),
        (None, Some(path)) => (PathBuf::from(path), true),
        (None, None) => (get_data_dir()?.join(CONFIG_FILE), false),
    };

    let mut config = read_config_file(&path, required)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    config.normalize_api_keys();
    validate_config(&config)?;

    if config.api_keys.is_empty() {
        tracing::warn!("No inference API keys configured; classification requests will fail");
    }
    tracing::info!(
        path = %path.display(),
        keys = config.api_keys.len(),
        daily_limit = config.quota.daily_limit,
        "Configuration loaded"
    );
    Ok(config)
}

pub fn read_config_file(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound { path: path.display().to_string() });
        }
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Apply `HALAL_*` and legacy `KEYn` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = lookup("HALAL_HOST") {
        config.server.host = host.trim().to_string();
    }
    if let Some(port) = lookup("HALAL_PORT") {
        config.server.port = parse_var("HALAL_PORT", &port)?;
    }
    if let Some(limit) = lookup("HALAL_DAILY_LIMIT") {
        config.quota.daily_limit = parse_var("HALAL_DAILY_LIMIT", &limit)?;
    }
    if let Some(keys) = lookup("HALAL_API_KEYS") {
        config.api_keys = keys.split(',').map(str::to_string).collect();
    }
    config.api_keys.extend(LEGACY_KEY_VARS.iter().filter_map(|name| lookup(*name)));
    Ok(())
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::ValidationError {
        field: name.to_string(),
        message: format!("cannot parse {:?}", value),
    })
}

/// Numeric bounds plus URL syntax.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    config.validate()?;
    for (field, value) in [
        ("inference.api_base_url", &config.inference.api_base_url),
        ("catalog.base_url", &config.catalog.base_url),
    ] {
        let parsed = url::Url::parse(value).map_err(|e| ConfigError::ValidationError {
            field: field.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = read_config_file(&dir.path().join(CONFIG_FILE), false).expect("defaults");
        assert_eq!(config.quota.daily_limit, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_config_file(&dir.path().join("nope.json"), true).expect_err("missing");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_reads_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"server": {"port": 8080}, "api_keys": ["k1", "k2"]}"#).expect("write");

        let config = read_config_file(&path, true).expect("parse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api_keys, vec!["k1", "k2"]);
        assert_eq!(config.inference.model, "gemini-flash-latest");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(read_config_file(&path, true), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig { api_keys: vec!["file-key".into()], ..AppConfig::default() };
        apply_env_overrides(
            &mut config,
            env(&[
                ("HALAL_PORT", "9000"),
                ("HALAL_DAILY_LIMIT", "10"),
                ("HALAL_API_KEYS", "a, b,,c"),
                ("KEY1", "legacy-1"),
                ("KEY3", "  "),
                ("KEY6", "legacy-6"),
            ]),
        )
        .expect("overrides");
        config.normalize_api_keys();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.quota.daily_limit, 10);
        assert_eq!(config.api_keys, vec!["a", "b", "c", "legacy-1", "legacy-6"]);
    }

    #[test]
    fn test_legacy_keys_extend_file_keys() {
        let mut config = AppConfig { api_keys: vec!["file-key".into()], ..AppConfig::default() };
        apply_env_overrides(&mut config, env(&[("KEY2", "legacy-2")])).expect("overrides");
        assert_eq!(config.api_keys, vec!["file-key", "legacy-2"]);
    }

    #[test]
    fn test_bad_env_number_is_validation_error() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("HALAL_PORT", "eighty")]))
            .expect_err("bad port");
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "HALAL_PORT"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = AppConfig::default();
        config.catalog.base_url = "not a url".to_string();
        assert!(validate_config(&config).is_err());

        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());

        assert!(validate_config(&AppConfig::default()).is_ok());
    }
}
