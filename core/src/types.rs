//! Wire types for the Primfeed API.
//!
//! # Design
//! Response types decode leniently: missing fields fall back to their
//! defaults so a sparse payload (for example a follower list carrying only
//! id, name and handle) still decodes. Fields whose shape the API does not
//! pin down are kept as `serde_json::Value` rather than guessed at, and
//! nullable URLs are `Option<String>`. An explicit `null` in a plain field
//! decodes to that field's default, the same as a missing key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Serialized as `null` when absent.
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub redirect: String,
}

/// Body of `POST /login/create-inworld-request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCodeRequest {
    pub username: String,
}

/// Response of `POST /login/create-inworld-request`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginCodeResponse {
    #[serde(deserialize_with = "null_default")]
    pub request_id: String,
}

/// Body of `POST /login/inworld-code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCodeSubmission {
    pub request_id: String,
    pub username: String,
    pub otp: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub redirect: String,
}

/// Response of both login endpoints.
///
/// A 2xx response may still carry `error`; the client turns that into
/// `ApiError::Login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_default")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_default")]
    pub selected_store: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_default")]
    pub token: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_default")]
    pub redirect: String,
    #[serde(
        rename = "profilePictureUuid",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_default"
    )]
    pub profile_picture_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Links a user has attached to their profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Socials {
    pub x_url: Option<String>,
    pub deviant_art_url: Option<String>,
    pub bluesky_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub flickr_url: Option<String>,
    pub personal_url: Option<String>,
}

/// Registration timestamp in the server's native date representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Registered {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub timezone_type: i64,
    #[serde(deserialize_with = "null_default")]
    pub timezone: String,
}

/// An entity: a user or a page-like profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub picture: String,
    pub profile_media: Option<Value>,
    pub banner_media: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub about: String,
    #[serde(deserialize_with = "null_default")]
    pub handle: String,
    #[serde(deserialize_with = "null_default")]
    pub is_user: bool,
    #[serde(deserialize_with = "null_default")]
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub socials: Socials,
    #[serde(deserialize_with = "null_default")]
    pub registered: Registered,
}

/// Public profile returned by `GET /entity/{handle}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(deserialize_with = "null_default")]
    pub show_follow_button: bool,
    #[serde(deserialize_with = "null_default")]
    pub followers: u64,
    #[serde(deserialize_with = "null_default")]
    pub follow: u64,
    #[serde(deserialize_with = "null_default")]
    pub can_follow: bool,
}

/// One entry of a followers or following list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Follower {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub maximum_mb_upload_size: u64,
}

/// The logged-in account, returned by `GET /me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "null_default")]
    pub version: String,
    #[serde(deserialize_with = "null_default")]
    pub available_stores: Vec<Value>,
    #[serde(deserialize_with = "null_default")]
    pub subscription: Subscription,
    pub selected_store: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub selected_entity: User,
    #[serde(deserialize_with = "null_default")]
    pub user: User,
    #[serde(deserialize_with = "null_default")]
    pub token: String,
    pub can_add_products: Option<Value>,
}

/// Editable profile fields sent with `PATCH /entity/{handle}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MyProfile {
    pub about: String,
    #[serde(flatten)]
    pub socials: Socials,
}

/// What the caller may do with a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Perms {
    #[serde(deserialize_with = "null_default")]
    pub can_delete: bool,
    #[serde(deserialize_with = "null_default")]
    pub can_edit: bool,
    #[serde(deserialize_with = "null_default")]
    pub can_report: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Media {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub height: u32,
    #[serde(deserialize_with = "null_default")]
    pub width: u32,
    #[serde(deserialize_with = "null_default")]
    pub version: u32,
}

/// The post carried by a feed item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub owner: User,
    pub quoted_post: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub created_at: i64,
    pub updated_at: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub content: String,
    #[serde(deserialize_with = "null_default")]
    pub rating: String,
    #[serde(deserialize_with = "null_default")]
    pub is_ai: bool,
    #[serde(deserialize_with = "null_default")]
    pub is_render: bool,
    #[serde(deserialize_with = "null_default")]
    pub public_gallery: bool,
    #[serde(deserialize_with = "null_default")]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(deserialize_with = "null_default")]
    pub comments_count: u64,
    #[serde(deserialize_with = "null_default")]
    pub likes: u64,
    #[serde(deserialize_with = "null_default")]
    pub liked: bool,
    #[serde(deserialize_with = "null_default")]
    pub perms: Perms,
    #[serde(deserialize_with = "null_default")]
    pub data: Post,
}

/// One page of `GET /pf/{id}/feed?page={n}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedResponse {
    #[serde(deserialize_with = "null_default")]
    pub feed: Vec<FeedItem>,
}

impl FeedResponse {
    /// An empty page marks the end of the feed.
    pub fn is_end(&self) -> bool {
        self.feed.is_empty()
    }
}

/// The entity that triggered a notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Origin {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub handle: String,
    #[serde(deserialize_with = "null_default")]
    pub picture: String,
    #[serde(deserialize_with = "null_default")]
    pub picture_uuid: String,
    #[serde(deserialize_with = "null_default")]
    pub profile_picture_uuid: String,
    #[serde(deserialize_with = "null_default")]
    pub profile_media: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_default")]
    pub banner_media: String,
    #[serde(deserialize_with = "null_default")]
    pub verified: bool,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub is_user: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SubNotification {
    #[serde(deserialize_with = "null_default")]
    pub origin: Origin,
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub read: bool,
}

/// A group of notifications of one kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_default")]
    pub notifications: Vec<SubNotification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationsResponse {
    #[serde(deserialize_with = "null_default")]
    pub unread_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub notifications: Vec<Notification>,
}
