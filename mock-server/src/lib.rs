//! In-memory stand-in for the Primfeed API.
//!
//! # Design
//! One `MockState` behind a `tokio` `RwLock` holds accounts, issued tokens,
//! pending one-time-code requests, the follow graph, posts and
//! notifications. Wire types are defined here independently of the client
//! crate so integration tests catch schema drift between the two.
//!
//! Login failures are reported the way the real API does: a 200 response
//! whose body carries an `error` field.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Code accepted by `POST /login/inworld-code`.
pub const LOGIN_CODE: &str = "123456";
/// Feed items per page.
pub const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub about: String,
    pub socials: Value,
}

#[derive(Clone, Debug)]
pub struct MockPost {
    pub id: String,
    pub feed_id: String,
    pub owner: String,
    pub content: String,
    pub created_at: i64,
    pub liked_by: BTreeSet<String>,
}

#[derive(Clone, Debug)]
pub struct MockNotification {
    pub id: String,
    pub kind: String,
    pub origin: String,
    pub read: bool,
}

#[derive(Debug, Default)]
pub struct MockState {
    /// Keyed by lower-cased handle.
    pub entities: HashMap<String, Entity>,
    pub passwords: HashMap<String, String>,
    /// Token to handle.
    pub tokens: HashMap<String, String>,
    /// One-time-code request id to handle.
    pub code_requests: HashMap<String, String>,
    /// (follower id, followed id)
    pub follows: BTreeSet<(String, String)>,
    /// In feed order.
    pub posts: Vec<MockPost>,
    /// Keyed by recipient handle.
    pub notifications: HashMap<String, Vec<MockNotification>>,
}

impl MockState {
    /// Three accounts, a small follow graph and three posts in `testuser`'s feed.
    pub fn seeded() -> Self {
        let mut state = MockState::default();
        state.add_account("1", "Test User", "testuser", "password");
        state.add_account("123", "Other Test User", "othertestuser", "secret");
        state.add_account("7", "Carol", "carol", "carol-pass");

        state.follows.insert(("123".to_string(), "1".to_string()));
        state.follows.insert(("1".to_string(), "7".to_string()));

        for (n, content) in ["first light", "sim sunset", "new outfit"].iter().enumerate() {
            state.posts.push(MockPost {
                id: format!("p{}", n + 1),
                feed_id: "1".to_string(),
                owner: "testuser".to_string(),
                content: content.to_string(),
                created_at: 1_700_000_000 + n as i64,
                liked_by: BTreeSet::new(),
            });
        }
        state
    }

    pub fn add_account(&mut self, id: &str, name: &str, handle: &str, password: &str) {
        let key = handle.to_lowercase();
        self.entities.insert(
            key.clone(),
            Entity {
                id: id.to_string(),
                name: name.to_string(),
                handle: handle.to_string(),
                about: String::new(),
                socials: json!({}),
            },
        );
        self.passwords.insert(key, password.to_string());
    }

    fn entity(&self, handle: &str) -> Option<&Entity> {
        self.entities.get(&handle.to_lowercase())
    }

    fn entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.id == id)
    }

    fn issue_token(&mut self, handle: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), handle.to_lowercase());
        token
    }

    fn caller(&self, headers: &HeaderMap) -> Result<Entity, StatusCode> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;
        self.tokens
            .get(token)
            .and_then(|handle| self.entity(handle))
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }

    fn followers_of(&self, id: &str) -> Vec<Value> {
        self.follows
            .iter()
            .filter(|(_, followed)| followed == id)
            .filter_map(|(follower, _)| self.entity_by_id(follower))
            .map(user_json)
            .collect()
    }

    fn followed_by(&self, id: &str) -> Vec<Value> {
        self.follows
            .iter()
            .filter(|(follower, _)| follower == id)
            .filter_map(|(_, followed)| self.entity_by_id(followed))
            .map(user_json)
            .collect()
    }

    fn notify(&mut self, recipient: &str, kind: &str, origin: &str) {
        self.notifications
            .entry(recipient.to_lowercase())
            .or_default()
            .push(MockNotification {
                id: Uuid::new_v4().to_string(),
                kind: kind.to_string(),
                origin: origin.to_string(),
                read: false,
            });
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    app_with(MockState::seeded())
}

pub fn app_with(state: MockState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/login", post(login))
        .route("/login/create-inworld-request", post(create_code_request))
        .route("/login/inworld-code", post(login_with_code))
        .route("/me", get(me))
        .route("/entity/{handle}", get(entity).patch(update_entity))
        .route("/entity/{handle}/followers", get(followers))
        .route("/entity/{handle}/followed", get(followed))
        .route("/follow/{id}", post(follow).delete(unfollow))
        .route("/notifications", get(notifications))
        .route("/notifications/count", get(notification_count))
        .route("/pf/post/{id}/like", post(toggle_like))
        .route("/pf/{id}/feed", get(feed))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn user_json(entity: &Entity) -> Value {
    json!({
        "id": entity.id,
        "picture": "",
        "profileMedia": null,
        "bannerMedia": null,
        "name": entity.name,
        "about": entity.about,
        "handle": entity.handle,
        "isUser": true,
        "verified": false,
        "socials": entity.socials,
        "registered": {"date": "2024-01-01 00:00:00.000000", "timezone_type": 3, "timezone": "UTC"},
    })
}

fn with_fields(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CodeRequestBody {
    pub username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLoginBody {
    pub request_id: String,
    pub username: String,
    pub otp: String,
}

async fn login(State(db): State<Db>, Json(input): Json<LoginBody>) -> Json<Value> {
    let mut state = db.write().await;
    let key = input.username.to_lowercase();
    if state.passwords.get(&key) != Some(&input.password) {
        debug!(username = %input.username, "rejected password login");
        return Json(json!({"error": "Invalid credentials"}));
    }
    let token = state.issue_token(&key);
    info!(username = %input.username, "password login");
    Json(json!({"user": input.username, "token": token, "redirect": "/"}))
}

async fn create_code_request(
    State(db): State<Db>,
    Json(input): Json<CodeRequestBody>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = db.write().await;
    let handle = state
        .entity(&input.username)
        .map(|e| e.handle.clone())
        .ok_or(StatusCode::NOT_FOUND)?;
    let request_id = Uuid::new_v4().to_string();
    state.code_requests.insert(request_id.clone(), handle);
    Ok(Json(json!({"requestId": request_id})))
}

async fn login_with_code(State(db): State<Db>, Json(input): Json<CodeLoginBody>) -> Json<Value> {
    let mut state = db.write().await;
    let matches = state
        .code_requests
        .get(&input.request_id)
        .is_some_and(|handle| handle.eq_ignore_ascii_case(&input.username));
    if !matches || input.otp != LOGIN_CODE {
        return Json(json!({"error": "Invalid code"}));
    }
    state.code_requests.remove(&input.request_id);
    let token = state.issue_token(&input.username);
    Json(json!({"user": input.username, "token": token, "redirect": "/"}))
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    let caller = state.caller(&headers)?;
    let user = user_json(&caller);
    Ok(Json(json!({
        "version": "1.0.0",
        "availableStores": [],
        "subscription": {"type": "free", "maximumMbUploadSize": 10},
        "selectedStore": null,
        "selectedEntity": user,
        "user": user,
        "token": "",
        "canAddProducts": null,
    })))
}

async fn entity(
    State(db): State<Db>,
    Path(handle): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    let entity = state.entity(&handle).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(with_fields(
        user_json(entity),
        json!({
            "showFollowButton": true,
            "followers": state.followers_of(&entity.id).len(),
            "follow": state.followed_by(&entity.id).len(),
            "canFollow": true,
        }),
    )))
}

async fn update_entity(
    State(db): State<Db>,
    Path(handle): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    let caller = state.caller(&headers)?;
    if !caller.handle.eq_ignore_ascii_case(&handle) {
        return Err(StatusCode::FORBIDDEN);
    }
    let entity = state
        .entities
        .get_mut(&handle.to_lowercase())
        .ok_or(StatusCode::NOT_FOUND)?;
    let Value::Object(mut fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    if let Some(about) = fields.remove("about").and_then(|v| v.as_str().map(str::to_string)) {
        entity.about = about;
    }
    entity.socials = Value::Object(fields);
    Ok(StatusCode::NO_CONTENT)
}

async fn followers(
    State(db): State<Db>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let state = db.read().await;
    let entity = state.entity(&handle).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.followers_of(&entity.id)))
}

async fn followed(
    State(db): State<Db>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let state = db.read().await;
    let entity = state.entity(&handle).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.followed_by(&entity.id)))
}

async fn follow(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    let caller = state.caller(&headers)?;
    let target = state
        .entity_by_id(&id)
        .map(|e| e.handle.clone())
        .ok_or(StatusCode::NOT_FOUND)?;
    if state.follows.insert((caller.id.clone(), id)) {
        state.notify(&target, "follow", &caller.handle);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn unfollow(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    let caller = state.caller(&headers)?;
    state.entity_by_id(&id).ok_or(StatusCode::NOT_FOUND)?;
    state.follows.remove(&(caller.id, id));
    Ok(StatusCode::NO_CONTENT)
}

async fn notifications(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut state = db.write().await;
    let caller = state.caller(&headers)?;
    let pending = state
        .notifications
        .get(&caller.handle.to_lowercase())
        .cloned()
        .unwrap_or_default();

    let unread = pending.iter().filter(|n| !n.read).count();
    let groups: Vec<Value> = pending
        .iter()
        .map(|n| {
            let origin = state.entity(&n.origin).cloned().unwrap_or_default();
            json!({
                "type": n.kind,
                "groupId": null,
                "createdAt": "2024-01-01T00:00:00+00:00",
                "notifications": [{
                    "id": n.id,
                    "read": n.read,
                    "origin": {
                        "id": origin.id,
                        "name": origin.name,
                        "handle": origin.handle,
                        "picture": "",
                        "pictureUuid": "",
                        "profilePictureUuid": "",
                        "profileMedia": "",
                        "verified": false,
                        "type": "user",
                        "isUser": true,
                    },
                }],
            })
        })
        .collect();

    if let Some(list) = state.notifications.get_mut(&caller.handle.to_lowercase()) {
        list.iter_mut().for_each(|n| n.read = true);
    }
    Ok(Json(json!({"unreadCount": unread, "notifications": groups})))
}

async fn notification_count(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<usize>, StatusCode> {
    let state = db.read().await;
    let caller = state.caller(&headers)?;
    let unread = state
        .notifications
        .get(&caller.handle.to_lowercase())
        .map_or(0, |list| list.iter().filter(|n| !n.read).count());
    Ok(Json(unread))
}

async fn toggle_like(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut state = db.write().await;
    let caller = state.caller(&headers)?;
    let post = state
        .posts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let liked = if post.liked_by.remove(&caller.id) {
        false
    } else {
        post.liked_by.insert(caller.id.clone())
    };
    let likes = post.liked_by.len();
    let owner = post.owner.clone();
    if liked && !owner.eq_ignore_ascii_case(&caller.handle) {
        state.notify(&owner, "like", &caller.handle);
    }
    Ok(Json(json!({"liked": liked, "likes": likes})))
}

#[derive(Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub page: usize,
}

async fn feed(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<FeedQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    state.entity_by_id(&id).ok_or(StatusCode::NOT_FOUND)?;
    let viewer = state.caller(&headers).ok().map(|e| e.id);

    let items: Vec<Value> = state
        .posts
        .iter()
        .filter(|p| p.feed_id == id)
        .skip(query.page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|p| {
            let owner = state.entity(&p.owner).map(user_json).unwrap_or(Value::Null);
            let liked = viewer.as_ref().is_some_and(|v| p.liked_by.contains(v));
            json!({
                "commentsCount": 0,
                "likes": p.liked_by.len(),
                "liked": liked,
                "perms": {"canDelete": false, "canEdit": false, "canReport": true},
                "data": {
                    "id": p.id,
                    "owner": owner,
                    "quotedPost": null,
                    "createdAt": p.created_at,
                    "updatedAt": null,
                    "content": p.content,
                    "rating": "general",
                    "isAi": false,
                    "isRender": false,
                    "publicGallery": true,
                    "media": [],
                },
            })
        })
        .collect();
    Ok(Json(json!({"feed": items})))
}
