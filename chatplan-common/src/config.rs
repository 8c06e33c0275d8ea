//! Configuration loading and compiled defaults
//!
//! Bootstrap configuration comes from an optional TOML file. Values not present
//! in the file fall back to compiled defaults. Credentials are resolved later by
//! the service (environment first, then TOML), see `chatplan_app::config`.
//!
//! # Config file location
//!
//! 1. Explicit path (`--config`)
//! 2. `<config dir>/chatplan/chatplan.toml` (`~/.config/chatplan/chatplan.toml` on Linux)
//!
//! A missing file is not an error: the service starts with defaults. A file
//! that exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5730;
/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default OpenAI-compatible API base
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Default Places API base
pub const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";
/// Default locale for place search results
pub const DEFAULT_LANGUAGE_CODE: &str = "ko";
/// Default outbound HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default idle lifetime of a session before it is evicted
pub const DEFAULT_SESSION_TTL_SECS: u64 = 2 * 60 * 60;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Language-model provider key (environment `OPENAI_API_KEY` takes priority)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Place-search provider key (environment `GOOGLE_MAPS_API_KEY` takes priority)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_api_key: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub places: PlacesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Idle seconds before a session is evicted (0 = never)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

/// Language-model client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat completion model name
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL (without the `/chat/completions` suffix)
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Place-search client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// API base URL (without the `/v1/places:searchText` suffix)
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    /// Locale requested for display names
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

fn default_places_base_url() -> String {
    DEFAULT_PLACES_BASE_URL.to_string()
}

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_llm_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_places_base_url(),
            language_code: default_language_code(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Default config file path for the platform
///
/// Returns `None` when the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatplan").join("chatplan.toml"))
}

/// Resolve which config file to read
///
/// `explicit` wins over the platform default path.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Load TOML configuration
///
/// `None` or a path that does not exist yields `TomlConfig::default()`.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) if p.exists() => p,
        _ => return Ok(TomlConfig::default()),
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}
