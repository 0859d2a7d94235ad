//! Startup configuration read from the environment.

use api_invoker::employees::DEFAULT_BASE_URL;
use api_invoker::TrustPolicy;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("{name} must be one of true, false, 1, 0, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("UPSTREAM_URL must be an http(s) URL, got {0:?}")]
    InvalidUpstream(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub upstream_url: String,
    pub trust_policy: TrustPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_BASE_URL.to_string(),
            trust_policy: TrustPolicy::Verify,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|&p| p != 0)
                .ok_or(ConfigError::InvalidPort(port))?;
        }

        if let Some(url) = lookup("UPSTREAM_URL") {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUpstream(url.to_string()));
            }
            config.upstream_url = url.to_string();
        }

        if let Some(value) = lookup("ACCEPT_INVALID_CERTS") {
            if parse_flag("ACCEPT_INVALID_CERTS", &value)? {
                config.trust_policy = TrustPolicy::AcceptInvalidCerts;
            }
        }

        Ok(config)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.trust_policy, TrustPolicy::Verify);
    }

    #[test]
    fn reads_every_key() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("UPSTREAM_URL", "http://localhost:3000/api/v1"),
            ("ACCEPT_INVALID_CERTS", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.upstream_url, "http://localhost:3000/api/v1");
        assert_eq!(config.trust_policy, TrustPolicy::AcceptInvalidCerts);
    }

    #[test]
    fn false_flag_keeps_verification() {
        let config = ServerConfig::from_lookup(lookup(&[("ACCEPT_INVALID_CERTS", "0")])).unwrap();
        assert_eq!(config.trust_policy, TrustPolicy::Verify);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("PORT", "0")])),
            Err(ConfigError::InvalidPort("0".to_string()))
        );
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("ACCEPT_INVALID_CERTS", "yes")])),
            Err(ConfigError::InvalidFlag { name: "ACCEPT_INVALID_CERTS", .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("UPSTREAM_URL", "ftp://x")])),
            Err(ConfigError::InvalidUpstream(_))
        ));
    }
}
