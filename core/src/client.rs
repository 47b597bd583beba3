//! The Primfeed client and its request dispatcher.
//!
//! # Design
//! `PrimfeedClient` owns one `Session` and one `Transport`. Every endpoint
//! method funnels through `request_json` or `send`, which build the request
//! from the session, execute it, check the status and decode the body.
//! Endpoint methods live next to their domain (`auth`, `social`, `feed`)
//! as further `impl` blocks on this type.
//!
//! A client is not meant to be shared between threads for mutation; use one
//! client per thread of control or lock it externally.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::{build_request, check_status, decode_body};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse, Transport, UreqTransport};
use crate::session::{Session, SessionState};

#[derive(Debug)]
pub struct PrimfeedClient<T = UreqTransport> {
    session: Session,
    transport: T,
}

impl PrimfeedClient<UreqTransport> {
    /// Client for `base_url`; `https://` is added when no scheme is given.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut client = Self::new(&config.base_url);
        if let Some(token) = &config.token {
            client.set_token(token.clone());
        }
        client
    }
}

impl<T: Transport> PrimfeedClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            session: Session::new(base_url),
            transport,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Dispatch a request and return the status-checked response untouched.
    pub fn send<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = build_request(&self.session, method, path, body, headers)?;
        debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "dispatching request"
        );

        let response = self.transport.execute(&request)?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            bytes = response.body.len(),
            "request completed"
        );

        check_status(&response)?;
        Ok(response)
    }

    /// Dispatch a request and decode its body into `R`.
    ///
    /// Returns `Ok(None)` for an empty 2xx body.
    pub fn request_json<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(method, path, body, headers)?;
        decode_body(&response)
    }

    /// GET `path`, falling back to `R::default()` on an empty body.
    pub(crate) fn get<R>(&self, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Default,
    {
        Ok(self
            .request_json::<(), R>(HttpMethod::Get, path, None, &[])?
            .unwrap_or_default())
    }
}
