//! Application configuration.
//!
//! Two sources: process environment ([`AppConfig`], server settings) and the
//! generated runtime-config artifact ([`RuntimeConfig`], the backend URL and
//! its public key). The logfire token is a secret and must never be logged.

use crate::{consts, i18n::Locale};
use anyhow::Context;
use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Envconfig, Clone, Debug)]
pub struct AppConfig {
    /// Values: "local", "dev", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding
    /// Example: "0.0.0.0", "localhost"
    #[envconfig(default = "127.0.0.1")]
    pub web_server_host: String,

    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Artifact written by `scripts gen-runtime-config`
    #[envconfig(default = "runtime-config.json")]
    pub runtime_config_path: String,

    /// 🔒 SENSITIVE: logfire write token; plain console logging when unset
    pub logfire_token: Option<String>,

    /// Interface language until the user picks one: "en" or "it"
    #[envconfig(default = "en")]
    pub default_language: String,

    /// Path to SSL private key file, prod only
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, prod only
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn default_locale(&self) -> Locale {
        Locale::parse(&self.default_language).unwrap_or_default()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }
}

/// Backend coordinates produced at build/deploy time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_anon_key: String,
    #[serde(default = "default_env")]
    pub env: String,
}

fn default_env() -> String {
    "development".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            supabase_url: consts::PLACEHOLDER_SUPABASE_URL.to_string(),
            supabase_anon_key: consts::PLACEHOLDER_SUPABASE_ANON_KEY.to_string(),
            env: default_env(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("invalid runtime config {}", path.display()))
    }

    /// Loads the artifact, falling back to placeholders when it is missing or
    /// unreadable so the app starts in the unconfigured state
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                logfire::warn!("runtime config not loaded: {error}", error = format!("{e:#}"));
                Self::default()
            }
        }
    }

    /// Backend URL and key, `None` when either is missing or a placeholder
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.supabase_url.trim();
        let key = self.supabase_anon_key.trim();

        if url.is_empty()
            || key.is_empty()
            || url == consts::PLACEHOLDER_SUPABASE_URL
            || key == consts::PLACEHOLDER_SUPABASE_ANON_KEY
        {
            return None;
        }

        Some((url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_not_credentials() {
        assert_eq!(RuntimeConfig::default().credentials(), None);

        let config = RuntimeConfig {
            supabase_url: "https://abc.supabase.co".to_string(),
            supabase_anon_key: "   ".to_string(),
            env: default_env(),
        };
        assert_eq!(config.credentials(), None);

        let config = RuntimeConfig {
            supabase_anon_key: "anon-key".to_string(),
            ..config
        };
        assert_eq!(
            config.credentials(),
            Some(("https://abc.supabase.co", "anon-key"))
        );
    }

    #[test]
    fn test_runtime_config_missing_fields_default() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"supabase_url":"https://abc.supabase.co"}"#).unwrap();

        assert_eq!(config.env, "development");
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let config = RuntimeConfig::load_or_default("does-not-exist/runtime-config.json");

        assert_eq!(config, RuntimeConfig::default());
    }
}
