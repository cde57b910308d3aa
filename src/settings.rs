use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use crate::theme::ThemeVariant;

const APP_SENTINEL: &str = "tubeview";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    /// Base URL of the backend, e.g. `http://localhost:5000/api`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeVariant>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            api_url: None,
            timeout_secs: None,
            theme: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Priority: CLI flag > settings file > default.
    pub fn resolve_api_url(&self, cli: Option<&str>) -> String {
        cli.or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string()
    }

    pub fn resolve_timeout(&self, cli: Option<u64>) -> Duration {
        cli.or(self.timeout_secs)
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("tubeview")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("tubeview.log")
}
