//! Synchronous client for the Primfeed social API.
//!
//! # Overview
//! `PrimfeedClient` wraps one `Session` (base URL, bearer token, cached
//! account data) and a blocking `Transport`. Every endpoint method builds a
//! request, sends it through the single dispatcher and decodes the JSON
//! reply into the types in [`types`].
//!
//! # Design
//! - Request building and response parsing are pure (`dispatch`); only the
//!   `Transport` touches the network, so tests swap in an in-memory one.
//! - Each client owns its session. Independent sessions can coexist in one
//!   process; a single client is not synchronised for concurrent mutation.
//! - No retries, timeouts or background work: every failure returns to the
//!   caller as an `ApiError`.
//!
//! ```no_run
//! use primfeed_core::PrimfeedClient;
//!
//! # fn main() -> Result<(), primfeed_core::ApiError> {
//! let mut client = PrimfeedClient::new("api.primfeed.com");
//! client.login("username", "password", None)?;
//! let me = client.fetch_me()?;
//! println!("{}", me.user.name);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod http;
pub mod session;
pub mod social;
pub mod types;

pub use auth::{Credentials, PendingCodeLogin};
pub use client::PrimfeedClient;
pub use config::{ClientConfig, API_URL, WEB_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use session::{Me, Session, SessionState};
pub use types::{
    FeedItem, FeedResponse, Follower, LoginResponse, Media, MyProfile, Notification,
    NotificationsResponse, Post, Profile, User, UserProfile,
};
