// SPDX-License-Identifier: AGPL-3.0-or-later

//! Settings management
//!
//! Handles loading and saving settings from ~/.gigachat/settings.json.
//! Credentials may also come from the environment, which takes precedence
//! over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_HISTORY_SIZE;
use crate::error::Result;

/// Main settings structure, stored in ~/.gigachat/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Client credentials for the token endpoint
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// API endpoints and model selection
    #[serde(default)]
    pub api: ApiConfig,

    /// Conversation window settings
    #[serde(default)]
    pub conversation: ConversationConfig,
}

/// Client id/secret pair, fixed for the process lifetime
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Endpoint and model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OAuth token endpoint
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Chat completion endpoint
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// CA bundle installed as an extra trust root when present on disk
    #[serde(default = "default_ca_bundle")]
    pub ca_bundle: PathBuf,
}

/// Conversation window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Number of turns kept and sent with each request
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_auth_url() -> String {
    crate::auth::DEFAULT_AUTH_URL.to_string()
}

fn default_chat_url() -> String {
    crate::chat::session::DEFAULT_CHAT_URL.to_string()
}

fn default_model() -> String {
    crate::chat::session::DEFAULT_MODEL.to_string()
}

fn default_ca_bundle() -> PathBuf {
    PathBuf::from("sberbank.crt")
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            chat_url: default_chat_url(),
            model: default_model(),
            ca_bundle: default_ca_bundle(),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
        }
    }
}

impl CredentialsConfig {
    /// Resolve the secret pair, environment first, then the settings file.
    pub fn resolve(&self) -> Option<(String, String)> {
        let client_id = std::env::var("GIGACHAT_CLIENT_ID")
            .ok()
            .or_else(|| self.client_id.clone())?;
        let client_secret = std::env::var("GIGACHAT_CLIENT_SECRET")
            .ok()
            .or_else(|| self.client_secret.clone())?;
        Some((client_id, client_secret))
    }
}

impl Settings {
    /// Get the per-user configuration directory.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gigachat")
    }

    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
