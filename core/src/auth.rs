//! Token acquisition: password login, token assignment and one-time-code login.
//!
//! The one-time-code flow is two calls. `request_login_code` returns a
//! `PendingCodeLogin` that carries the request id and username into
//! `login_with_code`, so nothing is stashed on the session in between.

use tracing::{info, warn};

use crate::client::PrimfeedClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::types::{
    LoginCodeRequest, LoginCodeResponse, LoginCodeSubmission, LoginRequest, LoginResponse,
};

const LOGIN_PATH: &str = "/login";
const CODE_REQUEST_PATH: &str = "/login/create-inworld-request";
const CODE_LOGIN_PATH: &str = "/login/inworld-code";
const REDIRECT: &str = "/";
const NO_TOKEN: &str = "no token returned";

/// First half of a one-time-code login, returned by `request_login_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCodeLogin {
    pub request_id: String,
    pub username: String,
}

/// The ways a client can obtain a bearer token.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password {
        username: String,
        password: String,
        company_id: Option<String>,
    },
    /// A token issued earlier; stored without a network call.
    Token(String),
    /// Completes a pending one-time-code login with the code the user received.
    Code {
        pending: PendingCodeLogin,
        otp: String,
        company_id: String,
    },
}

impl<T: Transport> PrimfeedClient<T> {
    /// Use a pre-issued token for all later requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session_mut().set_token(token);
    }

    /// Log in with username and password and store the returned token.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        company_id: Option<String>,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            company_id,
            redirect: REDIRECT.to_string(),
        };
        let response = self.post_login(LOGIN_PATH, &body)?;
        self.accept_login(response)
    }

    /// Start a one-time-code login; the server delivers the code in-world.
    pub fn request_login_code(&self, username: &str) -> Result<PendingCodeLogin, ApiError> {
        let body = LoginCodeRequest {
            username: username.to_string(),
        };
        let response: LoginCodeResponse = self
            .request_json(HttpMethod::Post, CODE_REQUEST_PATH, Some(&body), &[])
            .map_err(|e| ApiError::LoginFailed(Box::new(e)))?
            .unwrap_or_default();

        info!(username, request_id = %response.request_id, "login code requested");
        Ok(PendingCodeLogin {
            request_id: response.request_id,
            username: username.to_string(),
        })
    }

    /// Finish a one-time-code login and store the returned token.
    ///
    /// Surrounding whitespace is stripped from `otp`.
    pub fn login_with_code(
        &mut self,
        pending: &PendingCodeLogin,
        otp: &str,
        company_id: &str,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginCodeSubmission {
            request_id: pending.request_id.clone(),
            username: pending.username.clone(),
            otp: otp.trim().to_string(),
            company_id: company_id.to_string(),
            redirect: REDIRECT.to_string(),
        };
        let response = self.post_login(CODE_LOGIN_PATH, &body)?;
        self.accept_login(response)
    }

    /// Obtain a token through whichever path `credentials` describes.
    ///
    /// Returns the login response for the network paths and `None` for a
    /// directly assigned token.
    pub fn authenticate(
        &mut self,
        credentials: Credentials,
    ) -> Result<Option<LoginResponse>, ApiError> {
        match credentials {
            Credentials::Password {
                username,
                password,
                company_id,
            } => self.login(&username, &password, company_id).map(Some),
            Credentials::Token(token) => {
                self.set_token(token);
                info!("token assigned");
                Ok(None)
            }
            Credentials::Code {
                pending,
                otp,
                company_id,
            } => self.login_with_code(&pending, &otp, &company_id).map(Some),
        }
    }

    fn post_login<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<LoginResponse, ApiError> {
        Ok(self
            .request_json(HttpMethod::Post, path, Some(body), &[])
            .map_err(|e| ApiError::LoginFailed(Box::new(e)))?
            .unwrap_or_default())
    }

    fn accept_login(&mut self, response: LoginResponse) -> Result<LoginResponse, ApiError> {
        if let Some(message) = response.error.as_deref().filter(|m| !m.is_empty()) {
            warn!(error = message, "server rejected login");
            return Err(ApiError::Login(message.to_string()));
        }
        if response.token.is_empty() {
            warn!("login response carried no token");
            return Err(ApiError::Login(NO_TOKEN.to_string()));
        }
        self.set_token(response.token.clone());
        info!(user = %response.user, "logged in");
        Ok(response)
    }
}
