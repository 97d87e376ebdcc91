//! # Service Configuration
//!
//! Settings for a service hosting an API: listen address, coroutine stack
//! size and the documentation endpoint.
//!
//! Configuration comes from an optional file (`.yaml`/`.yml`, `.toml`, or
//! JSON for anything else) with environment variables applied on top:
//!
//! | Variable                 | Field         | Example          |
//! |--------------------------|---------------|------------------|
//! | `STRICTAPI_ADDR`         | `addr`        | `0.0.0.0:8080`   |
//! | `STRICTAPI_STACK_SIZE`   | `stack_size`  | `32768`, `0x8000`|
//! | `STRICTAPI_ENABLE_SPEC`  | `enable_spec` | `true`           |
//!
//! `enable_spec` is optional: when unset the schema's own setting stands.
//!
//! ```rust
//! use strictapi::config::ServiceConfig;
//!
//! let config = ServiceConfig::default();
//! assert_eq!(config.addr, "127.0.0.1:8080");
//! assert_eq!(config.stack_size, 0x8000);
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::{debug, warn};

/// Default coroutine stack size (32 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Listen address
    pub addr: String,
    /// Coroutine stack size in bytes
    #[serde(deserialize_with = "de_stack_size")]
    pub stack_size: usize,
    /// Overrides the schema's `enable_spec` when set
    pub enable_spec: Option<bool>,
    /// Path the documentation is served at
    pub spec_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            stack_size: DEFAULT_STACK_SIZE,
            enable_spec: None,
            spec_path: crate::dispatcher::DEFAULT_SPEC_PATH.to_string(),
        }
    }
}

/// Parses a byte count written in decimal or as `0x`-prefixed hex.
#[must_use]
pub fn parse_stack_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn de_stack_size<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(usize),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => parse_stack_size(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid stack size {s:?}"))),
    }
}

impl ServiceConfig {
    /// Loads a configuration file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML config {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("invalid TOML config {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON config {}", path.display()))?,
        };
        debug!(path = %path.display(), "Service config loaded");
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies the `STRICTAPI_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides read through `lookup`. Unparseable values are
    /// logged and ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STRICTAPI_ADDR") {
            self.addr = addr;
        }
        if let Some(raw) = lookup("STRICTAPI_STACK_SIZE") {
            match parse_stack_size(&raw) {
                Some(size) => self.stack_size = size,
                None => warn!(value = %raw, "Ignoring invalid STRICTAPI_STACK_SIZE"),
            }
        }
        if let Some(raw) = lookup("STRICTAPI_ENABLE_SPEC") {
            match raw.trim().to_ascii_lowercase().parse::<bool>() {
                Ok(enabled) => self.enable_spec = Some(enabled),
                Err(_) => warn!(value = %raw, "Ignoring invalid STRICTAPI_ENABLE_SPEC"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("32768"), Some(32768));
        assert_eq!(parse_stack_size("0x8000"), Some(0x8000));
        assert_eq!(parse_stack_size(" 0X10 "), Some(16));
        assert_eq!(parse_stack_size("big"), None);
    }

    #[test]
    fn test_env_overrides() {
        let config = ServiceConfig::default().with_overrides(lookup(&[
            ("STRICTAPI_ADDR", "0.0.0.0:9000"),
            ("STRICTAPI_STACK_SIZE", "0x10000"),
            ("STRICTAPI_ENABLE_SPEC", "TRUE"),
        ]));
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.stack_size, 0x10000);
        assert_eq!(config.enable_spec, Some(true));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = ServiceConfig::default().with_overrides(lookup(&[
            ("STRICTAPI_STACK_SIZE", "lots"),
            ("STRICTAPI_ENABLE_SPEC", "maybe"),
        ]));
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_load_yaml_toml_and_json() {
        let yaml = write_temp(".yaml", "addr: 0.0.0.0:1\nstack_size: 0x4000\nenable_spec: true\n");
        let config = ServiceConfig::load(yaml.path()).unwrap();
        assert_eq!(config.addr, "0.0.0.0:1");
        assert_eq!(config.stack_size, 0x4000);
        assert_eq!(config.enable_spec, Some(true));
        assert_eq!(config.spec_path, "/api_spec.json");

        let toml = write_temp(".toml", "addr = \"0.0.0.0:2\"\nstack_size = 65536\n");
        let config = ServiceConfig::load(toml.path()).unwrap();
        assert_eq!(config.addr, "0.0.0.0:2");
        assert_eq!(config.stack_size, 65536);
        assert_eq!(config.enable_spec, None);

        let json = write_temp(".conf", r#"{"spec_path": "/docs.json"}"#);
        let config = ServiceConfig::load(json.path()).unwrap();
        assert_eq!(config.spec_path, "/docs.json");
        assert_eq!(config.addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let yaml = write_temp(".yml", "port: 80\n");
        assert!(ServiceConfig::load(yaml.path()).is_err());
    }
}
