//! Per-client session: base URL, bearer token and cached account data.
//!
//! A session starts unauthenticated and becomes authenticated once any token
//! is stored. It never reverts on its own; an expired token simply makes
//! later requests fail with `ApiError::Http`.

use crate::types::{Follower, NotificationsResponse, Profile};

/// Whether the session currently holds a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Data cached about the logged-in account. Each field is replaced
/// wholesale by the fetch that owns it.
#[derive(Debug, Clone, Default)]
pub struct Me {
    pub profile: Option<Profile>,
    pub followers: Vec<Follower>,
    pub following: Vec<Follower>,
    pub notifications: Option<NotificationsResponse>,
}

impl Me {
    /// Handle of the loaded profile, if any.
    pub fn handle(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .map(|profile| profile.user.handle.as_str())
            .filter(|handle| !handle.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    token: Option<String>,
    pub me: Me,
}

impl Session {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: None,
            me: Me::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store `token` verbatim; it is attached to every later request.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn state(&self) -> SessionState {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => SessionState::Authenticated,
            _ => SessionState::Unauthenticated,
        }
    }

    /// Absolute URL for an API path such as `/me`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

/// Prefix `https://` when no scheme is given and drop trailing slashes.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
