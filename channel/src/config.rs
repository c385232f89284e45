//! Client configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, Result};

/// Endpoints, local file locations and logging settings
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// REST base URL, e.g. `http://localhost:3001/api`
    pub api_base_url: String,
    /// Media server URL handed to the media SDK
    pub media_server_url: String,
    /// Agent WebSocket URL
    pub websocket_url: String,
    /// Key passed to the agent as the `token` query parameter
    pub agent_api_key: String,
    /// REST request timeout
    pub request_timeout: Duration,
    /// Clear the agent "processing" flag after this long without a response
    pub processing_timeout: Option<Duration>,
    /// Where the bearer token is persisted between runs
    pub token_file: PathBuf,
    /// Where media settings are persisted
    pub settings_file: PathBuf,
    /// Log directory (daily rotation)
    pub log_dir: PathBuf,
    /// Log level filter (e.g., "channel=debug,info")
    pub log_level: String,
    /// Mirror logs to stderr
    pub log_to_stderr: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            media_server_url: "ws://localhost:7880".to_string(),
            websocket_url: "ws://localhost:3001".to_string(),
            agent_api_key: "demo-key".to_string(),
            request_timeout: Duration::from_secs(10),
            processing_timeout: None,
            token_file: PathBuf::from("./.channel-token.json"),
            settings_file: PathBuf::from("./channel-settings.json"),
            log_dir: PathBuf::from("logs"),
            log_level: "channel=info,warn".to_string(),
            log_to_stderr: false,
        }
    }
}

impl ChannelConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            media_server_url: lookup("LIVEKIT_URL").unwrap_or(defaults.media_server_url),
            websocket_url: lookup("WEBSOCKET_URL").unwrap_or(defaults.websocket_url),
            agent_api_key: lookup("AI_AGENT_API_KEY").unwrap_or(defaults.agent_api_key),
            request_timeout: lookup("CHANNEL_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            processing_timeout: lookup("CHANNEL_PROCESSING_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis),
            token_file: lookup("CHANNEL_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            settings_file: lookup("CHANNEL_SETTINGS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_file),
            log_dir: lookup("CHANNEL_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_to_stderr: lookup("CHANNEL_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(defaults.log_to_stderr),
        }
    }

    /// Endpoints are only checked for presence.
    pub fn require_endpoints(&self) -> Result<()> {
        let endpoints = [
            ("API_BASE_URL", &self.api_base_url),
            ("LIVEKIT_URL", &self.media_server_url),
            ("WEBSOCKET_URL", &self.websocket_url),
            ("AI_AGENT_API_KEY", &self.agent_api_key),
        ];

        for (name, value) in endpoints {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} is not set", name)));
            }
        }
        Ok(())
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ChannelConfig::from_lookup(|_| None);
        assert_eq!(config.api_base_url, "http://localhost:3001/api");
        assert_eq!(config.media_server_url, "ws://localhost:7880");
        assert_eq!(config.websocket_url, "ws://localhost:3001");
        assert_eq!(config.agent_api_key, "demo-key");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.processing_timeout.is_none());
        assert!(config.require_endpoints().is_ok());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("API_BASE_URL", "https://api.example.com"),
            ("CHANNEL_PROCESSING_TIMEOUT_MS", "30000"),
            ("CHANNEL_LOG_STDERR", "1"),
            ("RUST_LOG", "channel=debug"),
        ]);
        let config = ChannelConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.processing_timeout, Some(Duration::from_secs(30)));
        assert!(config.log_to_stderr);
        assert!(config.is_debug_enabled());
    }

    #[test]
    fn test_blank_endpoint_is_rejected() {
        let config = ChannelConfig::from_lookup(|k| (k == "WEBSOCKET_URL").then(|| " ".to_string()));
        let err = config.require_endpoints().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: WEBSOCKET_URL is not set");
    }
}
