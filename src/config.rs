use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::metrics::DEFAULT_MIN_HTML_LENGTH;

pub const DEFAULT_BASE_URL: &str = "https://api.greenpt.ai/v1";
pub const DEFAULT_VISION_MODEL: &str = "gemma-3-27b-it";
pub const DEFAULT_SYNTHESIS_MODEL: &str = "green-l";
pub const DEFAULT_HTML_PROMPT_CHARS: usize = 6000;

pub const ENV_API_KEY: &str = "GREENPT_API_KEY";
pub const ENV_BASE_URL: &str = "GREENPT_BASE_URL";
pub const ENV_VISION_MODEL: &str = "GREENPT_VISION_MODEL";
pub const ENV_SYNTHESIS_MODEL: &str = "GREENPT_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min_html_length: usize,
    pub html_prompt_chars: usize,
    pub service: ServiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_html_length: DEFAULT_MIN_HTML_LENGTH,
            html_prompt_chars: DEFAULT_HTML_PROMPT_CHARS,
            service: ServiceConfig::default(),
        }
    }
}

/// Connection settings for the remote chat-completions service used by both
/// visual analysis and recommendation synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub vision_model: String,
    pub synthesis_model: String,
    /// Unset means no explicit per-call timeout.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            synthesis_model: DEFAULT_SYNTHESIS_MODEL.to_string(),
            request_timeout: None,
        }
    }
}

impl ServiceConfig {
    /// The credential, if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }
}

impl Config {
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; blank values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(ENV_API_KEY) {
            self.service.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.service.base_url = url;
        }
        if let Some(model) = get(ENV_VISION_MODEL) {
            self.service.vision_model = model;
        }
        if let Some(model) = get(ENV_SYNTHESIS_MODEL) {
            self.service.synthesis_model = model;
        }
        self.service.base_url = self.service.base_url.trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_html_length == 0 {
            return Err("min_html_length must be at least 1".to_string());
        }
        if self.html_prompt_chars == 0 {
            return Err("html_prompt_chars must be at least 1".to_string());
        }
        let base = self.service.base_url.trim();
        if base.is_empty() {
            return Err("service.base_url must not be empty".to_string());
        }
        let parsed =
            Url::parse(base).map_err(|e| format!("service.base_url {base:?} is invalid: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "service.base_url must use http or https, got {}",
                parsed.scheme()
            ));
        }
        if self.service.vision_model.trim().is_empty() {
            return Err("service.vision_model must not be empty".to_string());
        }
        if self.service.synthesis_model.trim().is_empty() {
            return Err("service.synthesis_model must not be empty".to_string());
        }
        Ok(())
    }
}
