use crate::config::RuntimeConfig;
use anyhow::Context;
use std::path::Path;

pub fn write_runtime_config(path: &Path, config: &RuntimeConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

pub fn read_runtime_config(path: &Path) -> anyhow::Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("invalid runtime config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RuntimeConfig {
        RuntimeConfig {
            supabase_url: "https://abc.supabase.co".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            env: "prod".to_string(),
        }
    }

    #[test]
    fn test_written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("runtime-config.json");

        write_runtime_config(&path, &config()).unwrap();

        assert_eq!(read_runtime_config(&path).unwrap(), config());
    }

    #[test]
    fn test_read_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime-config.json");
        std::fs::write(&path, "{\"supabase_url\": 1}").unwrap();

        let err = read_runtime_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid runtime config"));
    }
}
