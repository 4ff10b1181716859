//! Client configuration: where the chat service lives and how to authenticate.

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "CHAT_BASE_URL";
pub const TOKEN_VAR: &str = "CHAT_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as `authorization: Bearer <token>` on every request when set.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read `CHAT_BASE_URL` (required) and `CHAT_TOKEN` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(BASE_URL_VAR))?;
        let mut config = Self::new(base_url.trim());
        config.token = lookup(TOKEN_VAR).filter(|v| !v.is_empty());
        Ok(config)
    }
}
