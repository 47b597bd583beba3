//! Error types for the Primfeed API client.
//!
//! # Design
//! Every failure surfaces to the immediate caller; nothing is retried and
//! nothing is swallowed except an empty 2xx body, which is not an error.
//! Login failures get their own variants so callers can tell "the server
//! refused these credentials" apart from "the request never completed".

use thiserror::Error;

/// Errors returned by `PrimfeedClient` and the dispatch helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, I/O).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a status outside 200..300.
    #[error("failed to fetch data: {status} {reason}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The server accepted the login request but reported a failure in the body.
    #[error("login rejected: {0}")]
    Login(String),

    /// A login request failed before a token could be read.
    #[error("login failed: {0}")]
    LoginFailed(#[source] Box<ApiError>),

    /// The operation needs the caller's own profile; call `fetch_me` first.
    #[error("own profile is not loaded")]
    ProfileNotLoaded,
}

impl ApiError {
    /// Build an `Http` error, filling the reason phrase from the status code.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let reason = ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        ApiError::Http {
            status,
            reason,
            body: body.into(),
        }
    }

    /// HTTP status carried by this error, looking through `LoginFailed`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::LoginFailed(inner) => inner.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status_line() {
        let err = ApiError::http(404, "");
        assert_eq!(err.to_string(), "failed to fetch data: 404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_status_gets_placeholder_reason() {
        let err = ApiError::http(599, "oops");
        assert!(matches!(err, ApiError::Http { status: 599, ref reason, .. } if reason == "Unknown Status"));
    }

    #[test]
    fn login_failed_exposes_inner_status() {
        let err = ApiError::LoginFailed(Box::new(ApiError::http(401, "")));
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().starts_with("login failed: failed to fetch data: 401"));
    }

    #[test]
    fn non_http_errors_have_no_status() {
        assert_eq!(ApiError::Decode("bad".into()).status(), None);
        assert_eq!(ApiError::ProfileNotLoaded.status(), None);
    }
}
