use envconfig::Envconfig;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_SUPABASE_URL: &str = "YOUR_SUPABASE_URL_HERE";
pub const PLACEHOLDER_SUPABASE_ANON_KEY: &str = "YOUR_SUPABASE_ANON_KEY_HERE";

/// Values read from the build/deploy environment
#[derive(Envconfig, Clone, Debug)]
pub struct BuildConfig {
    #[envconfig(from = "SUPABASE_URL", default = "YOUR_SUPABASE_URL_HERE")]
    pub supabase_url: String,
    #[envconfig(from = "SUPABASE_ANON_KEY", default = "YOUR_SUPABASE_ANON_KEY_HERE")]
    pub supabase_anon_key: String,
    #[envconfig(from = "ENV", default = "development")]
    pub env: String,
}

/// The artifact the web app loads at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub env: String,
}

impl From<BuildConfig> for RuntimeConfig {
    fn from(config: BuildConfig) -> Self {
        Self {
            supabase_url: config.supabase_url.trim().to_string(),
            supabase_anon_key: config.supabase_anon_key.trim().to_string(),
            env: config.env,
        }
    }
}

impl RuntimeConfig {
    /// Names of the values still holding a placeholder (or nothing)
    pub fn missing_values(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.supabase_url.is_empty() || self.supabase_url == PLACEHOLDER_SUPABASE_URL {
            missing.push("SUPABASE_URL");
        }
        if self.supabase_anon_key.is_empty()
            || self.supabase_anon_key == PLACEHOLDER_SUPABASE_ANON_KEY
        {
            missing.push("SUPABASE_ANON_KEY");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unset_env_falls_back_to_placeholders() {
        let config: RuntimeConfig = BuildConfig::init_from_hashmap(&HashMap::new())
            .unwrap()
            .into();

        assert_eq!(config.supabase_url, PLACEHOLDER_SUPABASE_URL);
        assert_eq!(config.env, "development");
        assert_eq!(
            config.missing_values(),
            vec!["SUPABASE_URL", "SUPABASE_ANON_KEY"]
        );
    }

    #[test]
    fn test_configured_values_are_trimmed() {
        let env = HashMap::from([
            (
                "SUPABASE_URL".to_string(),
                " https://abc.supabase.co ".to_string(),
            ),
            ("SUPABASE_ANON_KEY".to_string(), "anon-key".to_string()),
        ]);
        let config: RuntimeConfig = BuildConfig::init_from_hashmap(&env).unwrap().into();

        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert!(config.missing_values().is_empty());
    }
}
