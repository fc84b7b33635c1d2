use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend origin, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Poll cadences, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_fast_interval_ms")]
    pub fast_interval_ms: u64,
    #[serde(default = "default_slow_interval_ms")]
    pub slow_interval_ms: u64,
    #[serde(default = "default_detail_interval_ms")]
    pub detail_interval_ms: u64,
    #[serde(default = "default_rss_interval_ms")]
    pub rss_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
    /// Initial torrent table sort column.
    #[serde(default = "default_sort_field")]
    pub default_sort_field: String,
    /// `asc` or `desc`.
    #[serde(default = "default_sort_direction")]
    pub default_sort_direction: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: default_fast_interval_ms(),
            slow_interval_ms: default_slow_interval_ms(),
            detail_interval_ms: default_detail_interval_ms(),
            rss_interval_ms: default_rss_interval_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ms: default_toast_ms(),
            default_sort_field: default_sort_field(),
            default_sort_direction: default_sort_direction(),
        }
    }
}

impl PollingConfig {
    pub fn fast(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms.max(1))
    }

    pub fn slow(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms.max(1))
    }

    pub fn detail(&self) -> Duration {
        Duration::from_millis(self.detail_interval_ms.max(1))
    }

    pub fn rss(&self) -> Duration {
        Duration::from_millis(self.rss_interval_ms.max(1))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_fast_interval_ms() -> u64 {
    2000
}

fn default_slow_interval_ms() -> u64 {
    10_000
}

fn default_detail_interval_ms() -> u64 {
    1000
}

fn default_rss_interval_ms() -> u64 {
    10_000
}

fn default_toast_ms() -> u64 {
    3000
}

fn default_sort_field() -> String {
    "completion_on".to_string()
}

fn default_sort_direction() -> String {
    "desc".to_string()
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.polling.fast(), Duration::from_millis(2000));
        assert_eq!(config.polling.slow(), Duration::from_millis(10_000));
        assert_eq!(config.polling.detail(), Duration::from_millis(1000));
        assert_eq!(config.ui.toast_ms, 3000);
        assert_eq!(config.ui.default_sort_field, "completion_on");
        assert!(Config::config_path().ends_with("roverr/config.toml"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [polling]
            fast_interval_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.polling.fast_interval_ms, 500);
        assert_eq!(config.polling.slow_interval_ms, 10_000);
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.polling.rss_interval_ms, 10_000);

        let mut changed = config.clone();
        changed.server.base_url = "http://nas.local:8000".into();
        changed.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.server.base_url, "http://nas.local:8000");
    }
}
