//! Configuration loading from waypoint.toml and the environment.

use runtime::AnthropicAuth;
use runtime::providers::DEFAULT_MAX_TOKENS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "waypoint.toml";

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Model backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Model to use.
    pub model: String,

    /// Upper bound on tokens per reply.
    pub max_tokens: u32,

    /// Optional system prompt.
    pub system: Option<String>,

    /// Alternative API host.
    pub base_url: Option<String>,

    /// Standard Anthropic API key.
    /// Mutually exclusive with auth_token.
    pub api_key: Option<String>,

    /// Bearer token for gateways that expect `Authorization: Bearer`.
    /// Mutually exclusive with api_key.
    pub auth_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system: None,
            base_url: None,
            api_key: None,
            auth_token: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `explicit` if given, else `waypoint.toml` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Overlay values from environment variables. Empty values are ignored.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(token) = get("ANTHROPIC_AUTH_TOKEN") {
            self.backend.auth_token = Some(token);
        }
        if let Some(model) = get("WAYPOINT_MODEL") {
            self.backend.model = model;
        }
        if let Some(url) = get("ANTHROPIC_BASE_URL") {
            self.backend.base_url = Some(url);
        }
        self
    }

    /// Build the authentication from config.
    ///
    /// Requires exactly one of api_key or auth_token to be set.
    pub fn auth(&self) -> Result<AnthropicAuth, ConfigError> {
        match (&self.backend.api_key, &self.backend.auth_token) {
            (Some(key), None) => Ok(AnthropicAuth::ApiKey(key.clone())),
            (None, Some(token)) => Ok(AnthropicAuth::Bearer(token.clone())),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousAuth),
            (None, None) => Err(ConfigError::MissingAuth),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error(
        "model credentials not found: set ANTHROPIC_API_KEY (or backend.api_key in waypoint.toml)"
    )]
    MissingAuth,

    #[error("ambiguous authentication: set either an API key OR an auth token, not both")]
    AmbiguousAuth,
}
