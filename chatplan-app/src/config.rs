//! Credential resolution for chatplan
//!
//! Provides 2-tier resolution with ENV → TOML priority. Both keys are
//! required; a missing key stops startup before the listener binds.

use chatplan_common::config::TomlConfig;
use chatplan_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable holding the language-model provider key
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the place-search provider key
pub const GOOGLE_MAPS_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Resolved provider credentials
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub google_maps_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("google_maps_api_key", &"<redacted>")
            .finish()
    }
}

/// Resolve both provider keys
pub fn resolve_credentials(toml_config: &TomlConfig) -> Result<Credentials> {
    let openai_api_key = resolve_api_key(
        "OpenAI",
        OPENAI_KEY_ENV,
        toml_config.openai_api_key.as_deref(),
    )?;
    let google_maps_api_key = resolve_api_key(
        "Google Maps",
        GOOGLE_MAPS_KEY_ENV,
        toml_config.google_maps_api_key.as_deref(),
    )?;

    Ok(Credentials {
        openai_api_key,
        google_maps_api_key,
    })
}

/// Resolve one API key
///
/// **Priority:** ENV → TOML
pub fn resolve_api_key(label: &str, env_var: &str, toml_key: Option<&str>) -> Result<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k));

    // Warn if multiple sources (potential misconfiguration)
    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in both environment and TOML. Using environment (highest priority).",
            label
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", label);
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", label);
        return Ok(key.to_string());
    }

    Err(Error::Config(format!(
        "{} API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/chatplan/chatplan.toml ({} = \"your-key\")",
        label,
        env_var,
        env_var.to_lowercase()
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
