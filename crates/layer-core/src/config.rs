use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};
use crate::types::LayerEnvironment;

/// An auth/config field that can be supplied as `--<name> <value>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Contents of a `config.json` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<LayerEnvironment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth_flags: Vec<AuthFlag>,
}

impl ConfigFile {
    /// Read a config file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| LayerError::Config(format!("invalid {}: {e}", path.display())))?;
        Ok(Some(config))
    }

    /// Layer `other` on top of `self`. Set fields in `other` win; auth
    /// flags are merged by name.
    pub fn merge(mut self, other: ConfigFile) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.environment.is_some() {
            self.environment = other.environment;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        for flag in other.auth_flags {
            match self.auth_flags.iter_mut().find(|f| f.name == flag.name) {
                Some(existing) => *existing = flag,
                None => self.auth_flags.push(flag),
            }
        }
        self
    }

    /// Load `~/.layer/config.json` and `.layer/config.json` (project-local).
    /// Project-local entries override global ones.
    pub fn discover() -> Result<Self> {
        let mut merged = ConfigFile::default();
        if let Some(global) = global_config_path() {
            if let Some(config) = Self::load(&global)? {
                merged = merged.merge(config);
            }
        }
        if let Some(local) = Self::load(&local_config_path())? {
            merged = merged.merge(local);
        }
        Ok(merged)
    }
}

/// Path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".layer").join("config.json"))
}

/// Path to the project-local config file.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".layer").join("config.json")
}

/// Resolved settings for a [`crate::api::LayerApi`].
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Sent as the `Layer-Api-Key` header.
    pub api_key: String,
    pub environment: LayerEnvironment,
    /// API root without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl LayerConfig {
    pub fn builder(api_key: impl Into<String>) -> LayerConfigBuilder {
        LayerConfigBuilder {
            api_key: api_key.into(),
            environment: LayerEnvironment::default(),
            base_url: None,
            timeout_secs: 30,
        }
    }
}

/// Builder for [`LayerConfig`].
#[derive(Debug, Clone)]
pub struct LayerConfigBuilder {
    api_key: String,
    environment: LayerEnvironment,
    base_url: Option<String>,
    timeout_secs: u64,
}

impl LayerConfigBuilder {
    pub fn environment(mut self, environment: LayerEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Use this API root instead of the environment's.
    pub fn base_url(mut self, url: Option<String>) -> Self {
        self.base_url = url;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<LayerConfig> {
        if self.api_key.trim().is_empty() {
            return Err(LayerError::Config("missing Layer API key".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LayerError::Config("timeout must be at least 1 second".to_string()));
        }
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(LayerConfig {
            api_key: self.api_key,
            environment: self.environment,
            base_url,
            timeout_secs: self.timeout_secs,
        })
    }
}
