use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use desk_logging::{desk_info, desk_warn};
use publishing_engine::{BackendSettings, PollSettings};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

pub const DEFAULT_CONFIG_PATH: &str = "transfer_daily.ron";
pub const TOKEN_ENV_VAR: &str = "TRANSFER_DAILY_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub default_languages: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            poll_interval_secs: 20,
            poll_timeout_secs: 300,
            default_languages: ["es", "fr", "de", "it"].map(String::from).to_vec(),
        }
    }
}

impl AppConfig {
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            timeout: Duration::from_secs(self.poll_timeout_secs.max(1)),
        }
    }
}

/// Loads the config file; a missing or broken file falls back to defaults.
pub(crate) fn load(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            desk_info!("No config at {:?}; using defaults", path);
            return AppConfig::default();
        }
        Err(err) => {
            desk_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            desk_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            desk_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

/// Writes `config` atomically: temp file in the same directory, then rename.
pub(crate) fn save(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("resolving current directory")?,
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty).context("serializing config")?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("transfer_daily.ron");
        let config = AppConfig {
            api_base_url: "https://api.transferdaily.example/v1/".into(),
            poll_interval_secs: 5,
            default_languages: vec!["pt".into()],
            ..AppConfig::default()
        };

        save(&path, &config).unwrap();
        assert_eq!(load(&path), config);

        // Overwrites in place.
        save(&path, &AppConfig::default()).unwrap();
        assert_eq!(load(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.ron");
        fs::write(&path, "(poll_timeout_secs: 60)").unwrap();

        let config = load(&path);
        assert_eq!(config.poll_timeout_secs, 60);
        assert_eq!(config.poll_interval_secs, 20);
        assert_eq!(config.poll_settings().timeout, Duration::from_secs(60));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        fs::write(&path, "(api_base_url: ").unwrap();
        assert_eq!(load(&path), AppConfig::default());
    }
}
