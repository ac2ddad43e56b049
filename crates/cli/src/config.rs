use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    #[serde(default = "default_quota_url")]
    pub quota_url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Domain (name or id) used when a project command gets no `--domain`.
    #[serde(default)]
    pub domain: Option<String>,
}

fn default_identity_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_quota_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            quota_url: default_quota_url(),
            token: None,
            domain: None,
        }
    }
}

pub const KEYS: &[&str] = &["identity_url", "quota_url", "token", "domain"];

impl CliConfig {
    /// Config file path: ~/.config/quotactl/cli.toml
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("quotactl");
        Ok(config_dir.join("cli.toml"))
    }

    /// Load config from file, falling back to defaults.
    /// Environment variables override file values.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file_only()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("OS_AUTH_URL") {
            self.identity_url = url;
        }
        if let Some(url) = var("QUOTACTL_QUOTA_URL") {
            self.quota_url = url;
        }
        if let Some(token) = var("OS_AUTH_TOKEN") {
            self.token = Some(token);
        }
        if let Some(domain) = var("OS_PROJECT_DOMAIN_NAME") {
            self.domain = Some(domain);
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Save current config to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Load config from file only, so that `set` never writes environment credentials to disk.
    fn load_file_only() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn assign(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "identity_url" => self.identity_url = value.to_string(),
            "quota_url" => self.quota_url = value.to_string(),
            "token" => self.token = Some(value.to_string()),
            "domain" => self.domain = Some(value.to_string()),
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    /// Set a single config key and save.
    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut config = Self::load_file_only()?;
        config.assign(key, value)?;
        config.save()
    }
}
