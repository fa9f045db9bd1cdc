// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub collaborator_timeout: Duration,
    /// Exact origins, or `*` for any.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(45),
            collaborator_timeout: Duration::from_secs(15),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_allowed_origins
            .iter()
            .any(|allowed| allowed == "*" || allowed == origin)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageModelConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub retry: RetryPolicy,
}

impl Default for LanguageModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LanguageModelConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

pub fn validate_startup_config_contract(
    api: &ApiConfig,
    llm: &LanguageModelConfig,
) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body size must be > 0".to_string());
    }
    if api.request_timeout.is_zero() || api.collaborator_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    if api.collaborator_timeout > api.request_timeout {
        return Err("collaborator timeout must not exceed request timeout".to_string());
    }
    if api.cors_allowed_origins.iter().any(|o| o.trim().is_empty()) {
        return Err("cors origins must not be blank".to_string());
    }
    if llm.model.trim().is_empty() {
        return Err("language model name must not be empty".to_string());
    }
    if !(llm.base_url.starts_with("http://") || llm.base_url.starts_with("https://")) {
        return Err(format!("language model base url must be http(s): {}", llm.base_url));
    }
    if llm.retry.max_attempts == 0 {
        return Err("language model retry attempts must be > 0".to_string());
    }
    Ok(())
}
