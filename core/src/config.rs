//! Client configuration supplied by the embedding application.
//!
//! Loading credentials from files is left to the embedder; `ClientConfig`
//! derives `Deserialize` so it can be read from whatever format they use.

use std::env;
use std::fmt;

use serde::Deserialize;

/// Production API host.
pub const API_URL: &str = "api.primfeed.com";
/// Public website host.
pub const WEB_URL: &str = "www.primfeed.com";

pub const BASE_URL_ENV: &str = "PRIMFEED_BASE_URL";
pub const TOKEN_ENV: &str = "PRIMFEED_TOKEN";

#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

impl ClientConfig {
    /// Read `PRIMFEED_BASE_URL` and `PRIMFEED_TOKEN`; unset or blank values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: non_empty_env(BASE_URL_ENV).unwrap_or_else(default_base_url),
            token: non_empty_env(TOKEN_ENV),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"token\":{}}}",
            self.base_url,
            self.token
                .as_ref()
                .map_or("null", |_| "\"[REDACTED]\"")
        )
    }
}
