//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Log output format, chosen before settings are loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the environment (and `.env`)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    /// `json` selects JSON lines; anything else keeps the compact format
    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin is allowed
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Workflow store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowConfig {
    /// Create a demo proposal at startup so the dashboard is not empty
    pub seed_demo_proposal: bool,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub workflow: WorkflowConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server = ServerConfig {
            host: var("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|s| Self::parse_origins(&s))
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let workflow = WorkflowConfig {
            seed_demo_proposal: match var("SEED_DEMO_PROPOSAL") {
                Some(v) => Self::parse_bool("SEED_DEMO_PROPOSAL", &v)?,
                None => false,
            },
        };

        Ok(Self {
            server,
            cors,
            workflow,
        })
    }

    /// Split a comma list of origins, dropping anything that is not a URL
    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter(|s| match url::Url::parse(s) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Ignoring invalid CORS origin '{}': {}", s, e);
                    false
                }
            })
            .map(|s| s.trim_end_matches('/').to_string())
            .collect()
    }

    fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(ConfigError::InvalidValue(format!(
                "{} must be a boolean, got '{}'",
                key, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert!(!settings.workflow.seed_demo_proposal);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let settings = settings_from(&[("PORT", "not-a-port"), ("HOST", "127.0.0.1")]).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, Ipv4Addr::new(127, 0, 0, 1));
    }

    #[test]
    fn test_origins_are_parsed_and_filtered() {
        let settings = settings_from(&[(
            "ALLOWED_ORIGINS",
            "http://localhost:5173/, not a url ,https://dash.example.com",
        )])
        .unwrap();
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://localhost:5173", "https://dash.example.com"]
        );
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
    }

    #[test]
    fn test_seed_flag() {
        assert!(settings_from(&[("SEED_DEMO_PROPOSAL", "true")]).unwrap().workflow.seed_demo_proposal);
        assert!(!settings_from(&[("SEED_DEMO_PROPOSAL", "0")]).unwrap().workflow.seed_demo_proposal);
        assert!(settings_from(&[("SEED_DEMO_PROPOSAL", "maybe")]).is_err());
    }
}
