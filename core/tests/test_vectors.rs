//! Verify client calls against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request, a simulated
//! response and the expected result or error kind. A recording transport
//! replays the simulated response and captures the request the client
//! built. Bodies are compared as parsed JSON so field order does not matter.

use std::cell::RefCell;

use primfeed_core::{
    ApiError, Follower, HttpMethod, HttpRequest, HttpResponse, LoginResponse, PrimfeedClient,
    Transport,
};

const BASE_URL: &str = "http://localhost:3000";

/// Answers every request with one canned response and keeps the last request.
struct Replay {
    response: HttpResponse,
    seen: RefCell<Option<HttpRequest>>,
}

impl Replay {
    fn from_vector(sim: &serde_json::Value) -> Self {
        Self {
            response: HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: sim["body"].as_str().unwrap().to_string(),
            },
            seen: RefCell::new(None),
        }
    }

    fn request(&self) -> HttpRequest {
        self.seen.borrow().clone().expect("no request was sent")
    }
}

impl Transport for Replay {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        *self.seen.borrow_mut() = Some(request.clone());
        Ok(self.response.clone())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.header("Content-Type"), Some("application/json"), "{name}: content type");
    match expected.get("body") {
        Some(body) => {
            let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_error_kind(name: &str, err: &ApiError, kind: &str) {
    let matched = match kind {
        "Http" => matches!(err, ApiError::Http { .. }),
        "Decode" => matches!(err, ApiError::Decode(_)),
        "Login" => matches!(err, ApiError::Login(_)),
        "LoginFailed" => matches!(err, ApiError::LoginFailed(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {kind}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let raw = include_str!("../../test-vectors/login.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Replay::from_vector(&case["simulated_response"]);
        let mut client = PrimfeedClient::with_transport(BASE_URL, &replay);

        let input = &case["input"];
        let result = client.login(
            input["username"].as_str().unwrap(),
            input["password"].as_str().unwrap(),
            None,
        );
        assert_request(name, &replay.request(), &case["expected_request"]);

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
            assert_eq!(client.token(), None, "{name}: token must stay unset");
        } else {
            let resp = result.unwrap();
            let expected: LoginResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(resp, expected, "{name}: parsed result");
            assert_eq!(client.token(), case["expected_token"].as_str(), "{name}: stored token");
        }
    }
}

// ---------------------------------------------------------------------------
// Followers
// ---------------------------------------------------------------------------

#[test]
fn followers_test_vectors() {
    let raw = include_str!("../../test-vectors/followers.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Replay::from_vector(&case["simulated_response"]);
        let client = PrimfeedClient::with_transport(BASE_URL, &replay);

        let result = client.fetch_followers(case["input_handle"].as_str().unwrap());
        assert_request(name, &replay.request(), &case["expected_request"]);

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: Vec<Follower> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Notification count
// ---------------------------------------------------------------------------

#[test]
fn notification_count_test_vectors() {
    let raw = include_str!("../../test-vectors/notification_count.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Replay::from_vector(&case["simulated_response"]);
        let mut client = PrimfeedClient::with_transport(BASE_URL, &replay);
        client.set_token("0123456789abcdef");

        let result = client.fetch_notification_count();
        let req = replay.request();
        assert_request(name, &req, &case["expected_request"]);
        assert_eq!(req.header("Authorization"), Some("Bearer 0123456789abcdef"), "{name}: bearer");

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_i64().unwrap(), "{name}: count");
        }
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[test]
fn feed_test_vectors() {
    let raw = include_str!("../../test-vectors/feed.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let replay = Replay::from_vector(&case["simulated_response"]);
        let client = PrimfeedClient::with_transport(BASE_URL, &replay);

        let page = case["input_page"].as_u64().unwrap() as u32;
        let resp = client
            .fetch_feed(case["input_id"].as_str().unwrap(), page)
            .unwrap();
        assert_request(name, &replay.request(), &case["expected_request"]);

        let ids: Vec<&str> = resp.feed.iter().map(|item| item.data.id.as_str()).collect();
        let expected_ids: Vec<&str> = case["expected_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_str().unwrap())
            .collect();
        assert_eq!(ids, expected_ids, "{name}: ids");
        assert_eq!(resp.is_end(), case["expected_end"].as_bool().unwrap(), "{name}: end");
    }
}
