//! Application configuration.
//!
//! Declares base URLs, rate limits, and timeouts for each upstream
//! client. Loaded from a JSON file via `serde_json`: read a path,
//! parse, bail with context on failure.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_sec: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_rate_limit() -> f64 {
    10.0
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            rate_limit_per_sec: default_rate_limit(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

/// Deliberately carries no `api_key` field: the Navexa credential is
/// injected per request (`X-Vire-Navexa-Key`), never configured
/// process-wide.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavexaClientConfig {
    pub base_url: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_sec: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NavexaClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            rate_limit_per_sec: default_rate_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientsConfig {
    pub eodhd: ClientConfig,
    pub asx: ClientConfig,
    pub navexa: NavexaClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub clients: ClientsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navexa_config_has_no_api_key_field() {
        let json = r#"{
            "clients": {
                "eodhd": { "base_url": "https://eodhd.example", "api_key": "tok" },
                "asx": { "base_url": "https://asx.example" },
                "navexa": { "base_url": "https://navexa.example" }
            }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.clients.eodhd.api_key.as_deref(), Some("tok"));
        assert_eq!(config.clients.navexa.base_url, "https://navexa.example");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn default_config_is_usable_without_a_file() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.clients.navexa.base_url.is_empty());
    }
}
