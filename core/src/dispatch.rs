//! Request building and response parsing for the dispatcher.
//!
//! # Design
//! Both halves are pure: `build_request` turns a session plus call
//! arguments into an `HttpRequest`, and `check_status` / `decode_body`
//! interpret an `HttpResponse`. `PrimfeedClient::request_json` and
//! `PrimfeedClient::send` glue them around a `Transport`, which keeps the
//! single I/O chokepoint trivially testable.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Build the request for `method` on `path`.
///
/// `Authorization` and `Content-Type` are always present; `extra_headers`
/// are applied afterwards and replace same-named headers.
pub fn build_request<B>(
    session: &Session,
    method: HttpMethod,
    path: &str,
    body: Option<&B>,
    extra_headers: &[(&str, &str)],
) -> Result<HttpRequest, ApiError>
where
    B: Serialize + ?Sized,
{
    let body = body
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let mut headers = vec![
        (
            AUTHORIZATION.to_string(),
            format!("Bearer {}", session.token().unwrap_or_default()),
        ),
        (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
    ];
    for (name, value) in extra_headers {
        set_header(&mut headers, name, value);
    }

    Ok(HttpRequest {
        method,
        url: session.url(path),
        headers,
        body,
    })
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

/// Map a status outside 200..300 to `ApiError::Http`.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::http(response.status, response.body.clone()))
}

/// Decode a 2xx body. An empty body is success with nothing decoded.
pub fn decode_body<R: DeserializeOwned>(response: &HttpResponse) -> Result<Option<R>, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        let mut session = Session::new("http://localhost:3000");
        session.set_token("0123456789abcdef");
        session
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn body_is_serialized_as_json() {
        let req = build_request(
            &session(),
            HttpMethod::Post,
            "/login",
            Some(&json!({"username": "u"})),
            &[],
        )
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/login");
        assert_eq!(req.body.as_deref(), Some(r#"{"username":"u"}"#));
    }

    #[test]
    fn missing_body_stays_empty() {
        let req = build_request::<()>(&session(), HttpMethod::Get, "/me", None, &[]).unwrap();
        assert!(req.body.is_none());
    }

    #[test]
    fn default_headers_are_always_set() {
        let req = build_request::<()>(&session(), HttpMethod::Get, "/me", None, &[]).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer 0123456789abcdef"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn unauthenticated_session_sends_empty_bearer() {
        let session = Session::new("http://localhost:3000");
        let req = build_request::<()>(&session, HttpMethod::Get, "/me", None, &[]).unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer "));
    }

    #[test]
    fn extra_headers_override_defaults() {
        let req = build_request::<()>(
            &session(),
            HttpMethod::Get,
            "/me",
            None,
            &[("content-type", "text/plain"), ("X-Trace", "abc")],
        )
        .unwrap();
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("x-trace"), Some("abc"));
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn extra_authorization_replaces_bearer() {
        let req = build_request::<()>(
            &session(),
            HttpMethod::Get,
            "/me",
            None,
            &[("AUTHORIZATION", "Bearer other-token")],
        )
        .unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer other-token"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn any_2xx_passes() {
        for status in [200, 201, 204, 299] {
            assert!(check_status(&response(status, "")).is_ok(), "{status}");
        }
    }

    #[test]
    fn non_2xx_fails_regardless_of_body() {
        for status in [199, 300, 301, 401, 404, 500] {
            let err = check_status(&response(status, r#"{"ok":true}"#)).unwrap_err();
            assert!(matches!(err, ApiError::Http { status: s, .. } if s == status));
        }
    }

    #[test]
    fn empty_body_skips_decode() {
        // `u64` cannot decode from an empty string, so a decode attempt would fail.
        let decoded: Option<u64> = decode_body(&response(200, "")).unwrap();
        assert_eq!(decoded, None);
        let decoded: Option<u64> = decode_body(&response(204, "\n")).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        let err = decode_body::<u64>(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn bare_integer_decodes() {
        let count: Option<i64> = decode_body(&response(200, "0")).unwrap();
        assert_eq!(count, Some(0));
    }
}
