use std::time::Duration;

use crate::ai::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::chat::constants::{
    API_BASE_ENV_VAR, API_KEY_ENV_VAR, HISTORY_STORAGE_KEY, MAX_SOURCES, MODEL_ENV_VAR,
    SYSTEM_PROMPT, WELCOME_TEXT,
};
use crate::request::{RetryPolicy, DEFAULT_REQUEST_TIMEOUT_MS};

/// Settings of a [`Chatbot`](crate::chat::Chatbot). The default targets the KOS assistant and
/// only lacks an API key.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatbotConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub system_prompt: String,
    pub welcome_text: String,
    pub storage_key: String,
    pub max_sources: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            welcome_text: WELCOME_TEXT.to_string(),
            storage_key: HISTORY_STORAGE_KEY.to_string(),
            max_sources: MAX_SOURCES,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ChatbotConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads `KOS_GEMINI_API_KEY` plus the optional `KOS_GEMINI_MODEL` and
    /// `KOS_GEMINI_API_BASE` overrides. Returns `None` without an API key.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::new(non_blank(API_KEY_ENV_VAR)?);
        if let Some(model) = non_blank(MODEL_ENV_VAR) {
            config.model = model;
        }
        if let Some(api_base) = non_blank(API_BASE_ENV_VAR) {
            config.api_base = api_base;
        }
        Some(config)
    }
}
