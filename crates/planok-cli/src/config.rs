//! Configuration management for PlanOk CLI
//!
//! Stores the API base URL and the session tokens in ~/.config/planok/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "planok";
const CONFIG_FILE: &str = "config.toml";

/// Overrides `base_url` from the file (also read from `.env`)
pub const BASE_URL_ENV: &str = "PLANOK_BASE_URL";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            access_token: None,
            refresh_token: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Store a fresh session
    pub fn set_session(&mut self, email: String, access: String, refresh: String) {
        self.email = Some(email);
        self.access_token = Some(access);
        self.refresh_token = Some(refresh);
    }

    /// Forget the tokens; the email is kept as the next login default
    pub fn clear_session(&mut self) -> bool {
        let had_session = self.access_token.is_some() || self.refresh_token.is_some();
        self.access_token = None;
        self.refresh_token = None;
        had_session
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}
