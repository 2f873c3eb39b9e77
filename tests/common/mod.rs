#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use usercenter::api::ApiClient;
use usercenter::config::ApiConfig;
use usercenter::navigation::History;
use usercenter::session::Session;
use usercenter::store::TokenCache;

pub const PASSWORD: &str = "password123";

/// One request as the stub backend saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

impl Seen {
    pub fn param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[derive(Default)]
struct Data {
    users: Vec<Value>,
    seen: Vec<Seen>,
}

/// In-process stand-in for the user-management backend.
#[derive(Clone, Default)]
pub struct Stub {
    data: Arc<Mutex<Data>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<Seen> {
        self.data.lock().unwrap().seen.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Seen> {
        self.requests().into_iter().filter(|s| s.path == path).collect()
    }

    pub fn clear_requests(&self) {
        self.data.lock().unwrap().seen.clear();
    }

    fn user_by_token(&self, headers: &HeaderMap) -> Option<Value> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer token-")?
            .to_string();
        let id: i64 = token.parse().ok()?;
        self.user(id)
    }

    fn user(&self, id: i64) -> Option<Value> {
        self.data
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u["id"] == id)
            .cloned()
    }

    fn update_user(&self, id: i64, patch: &Value) -> Option<Value> {
        let mut data = self.data.lock().unwrap();
        let user = data.users.iter_mut().find(|u| u["id"] == id)?;
        if let (Some(target), Some(patch)) = (user.as_object_mut(), patch.as_object()) {
            for (k, v) in patch {
                target.insert(k.clone(), v.clone());
            }
        }
        Some(user.clone())
    }
}

fn user(id: i64, name: &str, active: bool, verified: bool, admin: bool) -> Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", name),
        "username": name,
        "is_active": active,
        "is_verified": verified,
        "is_admin": admin,
        "avatar": null,
        "bio": null,
        "last_login_at": null,
        "created_at": format!("2024-03-0{}T08:00:00", id),
        "updated_at": format!("2024-03-0{}T08:00:00", id),
    })
}

fn fixture_users() -> Vec<Value> {
    vec![
        user(1, "admin", true, true, true),
        user(2, "mei", true, true, false),
        user(3, "lin", false, false, false),
        user(4, "ops", true, true, true),
        user(5, "zoe", true, false, true),
    ]
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

fn require_user(stub: &Stub, headers: &HeaderMap) -> Result<Value, Response> {
    stub.user_by_token(headers).ok_or_else(unauthorized)
}

fn require_admin(stub: &Stub, headers: &HeaderMap) -> Result<Value, Response> {
    let user = require_user(stub, headers)?;
    if user["is_admin"] == true {
        Ok(user)
    } else {
        Err(detail(StatusCode::FORBIDDEN, "Not enough privileges"))
    }
}

async fn record(State(stub): State<Stub>, req: Request, next: Next) -> Response {
    let seen = Seen {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().unwrap_or_default().to_string(),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        content_type: req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    stub.data.lock().unwrap().seen.push(seen);
    next.run(req).await
}

async fn login(State(stub): State<Stub>, Form(form): Form<HashMap<String, String>>) -> Response {
    let email = form.get("username").cloned().unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();
    if form.get("grant_type").map(String::as_str) != Some("password") {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "grant_type must be password");
    }

    let found = stub
        .data
        .lock()
        .unwrap()
        .users
        .iter()
        .find(|u| u["email"] == email.as_str())
        .cloned();
    match found {
        Some(user) if password == PASSWORD => Json(json!({
            "access_token": format!("token-{}", user["id"]),
            "token_type": "bearer",
            "user": user,
        }))
        .into_response(),
        _ => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

async fn register(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    let mut data = stub.data.lock().unwrap();
    if data.users.iter().any(|u| u["email"] == body["email"]) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    if data.users.iter().any(|u| u["username"] == body["username"]) {
        return detail(StatusCode::BAD_REQUEST, "username already exists");
    }
    let id = data.users.len() as i64 + 1;
    let mut created = user(id, body["username"].as_str().unwrap_or_default(), false, false, false);
    created["email"] = body["email"].clone();
    data.users.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn verify_email(Json(body): Json<Value>) -> Response {
    if body["token"] == "good-token" {
        Json(json!({ "message": "Email verified" })).into_response()
    } else {
        detail(StatusCode::BAD_REQUEST, "Invalid or expired token")
    }
}

async fn accept(Json(_body): Json<Value>) -> Response {
    Json(json!({ "message": "ok" })).into_response()
}

async fn me(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    match require_user(&stub, &headers) {
        Ok(user) => Json(user).into_response(),
        Err(response) => response,
    }
}

async fn update_me(State(stub): State<Stub>, headers: HeaderMap, Json(patch): Json<Value>) -> Response {
    let user = match require_user(&stub, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let id = user["id"].as_i64().unwrap_or_default();
    Json(stub.update_user(id, &patch)).into_response()
}

async fn change_password(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = require_user(&stub, &headers) {
        return response;
    }
    if body["old_password"] != PASSWORD {
        return detail(StatusCode::BAD_REQUEST, "Incorrect password");
    }
    Json(json!({ "message": "Password updated" })).into_response()
}

fn window(params: &HashMap<String, String>) -> (usize, usize) {
    let skip = params.get("skip").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    (skip, limit)
}

fn history(user_id: i64, params: &HashMap<String, String>, activity: bool) -> Vec<Value> {
    let (skip, limit) = window(params);
    (0..12usize)
        .skip(skip)
        .take(limit)
        .map(|i| {
            if activity {
                json!({
                    "id": i + 1,
                    "user_id": user_id,
                    "action": "update_profile",
                    "description": format!("change #{}", i + 1),
                    "created_at": "2024-03-10T09:30:00",
                })
            } else {
                json!({
                    "id": i + 1,
                    "user_id": user_id,
                    "ip_address": "10.0.0.1",
                    "user_agent": "usercenter-tests",
                    "login_time": "2024-03-10T09:30:00Z",
                })
            }
        })
        .collect()
}

async fn my_logins(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match require_user(&stub, &headers) {
        Ok(user) => Json(history(user["id"].as_i64().unwrap_or_default(), &params, false)).into_response(),
        Err(response) => response,
    }
}

async fn my_activity(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match require_user(&stub, &headers) {
        Ok(user) => Json(history(user["id"].as_i64().unwrap_or_default(), &params, true)).into_response(),
        Err(response) => response,
    }
}

async fn list_users(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = require_admin(&stub, &headers) {
        return response;
    }
    let users = stub.data.lock().unwrap().users.clone();
    let matching: Vec<Value> = users
        .into_iter()
        .filter(|u| {
            ["is_active", "is_verified", "is_admin"].iter().all(|flag| match params.get(*flag) {
                Some(v) => u[*flag].as_bool().map(|b| b.to_string()).as_deref() == Some(v.as_str()),
                None => true,
            })
        })
        .filter(|u| match params.get("search") {
            Some(term) => {
                u["username"].as_str().unwrap_or_default().contains(term.as_str())
                    || u["email"].as_str().unwrap_or_default().contains(term.as_str())
            }
            None => true,
        })
        .collect();

    let (skip, limit) = window(&params);
    let total = matching.len();
    let page: Vec<Value> = matching.into_iter().skip(skip).take(limit).collect();
    Json(json!({ "users": page, "total": total })).into_response()
}

async fn admin_user(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(response) = require_admin(&stub, &headers) {
        return response;
    }
    match stub.user(id) {
        Some(user) => Json(user).into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn admin_patch(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    if let Err(response) = require_admin(&stub, &headers) {
        return response;
    }
    match stub.update_user(id, &patch) {
        Some(user) => Json(user).into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn admin_logins(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match require_admin(&stub, &headers) {
        Ok(_) => Json(history(id, &params, false)).into_response(),
        Err(response) => response,
    }
}

async fn admin_activity(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match require_admin(&stub, &headers) {
        Ok(_) => Json(history(id, &params, true)).into_response(),
        Err(response) => response,
    }
}

fn note(i: usize) -> Value {
    json!({
        "note_id": format!("note-{}", i),
        "note_url": format!("https://notes.example.com/{}", i),
        "note_cover_url_default": null,
        "note_display_title": format!("Coffee diary {}", i),
        "note_liked_count": i * 10,
        "comment_count": i,
        "share_count": 1,
        "collected_count": 2,
        "author_id": "author-1",
        "author_nick_name": "Mei",
        "author_avatar": null,
        "note_create_time": "2024-02-01T10:00:00",
        "note_last_update_time": "2024-02-02T10:00:00",
    })
}

async fn list_notes(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = require_user(&stub, &headers) {
        return response;
    }
    let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let page_size: usize = params.get("page_size").and_then(|v| v.parse().ok()).unwrap_or(20);
    let min_likes: usize = params.get("min_likes").and_then(|v| v.parse().ok()).unwrap_or(0);

    let matching: Vec<Value> = (1..=45usize)
        .filter(|i| i * 10 >= min_likes)
        .map(note)
        .collect();
    let total = matching.len();
    let items: Vec<Value> = matching
        .into_iter()
        .skip((page.max(1) - 1) * page_size)
        .take(page_size)
        .collect();

    Json(json!({ "items": items, "total": total, "page": page, "page_size": page_size })).into_response()
}

async fn note_section(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path((note_id, section)): Path<(String, String)>,
) -> Response {
    if let Err(response) = require_user(&stub, &headers) {
        return response;
    }
    if note_id != "note-1" {
        return detail(StatusCode::NOT_FOUND, "Note not found");
    }
    let body = match section.as_str() {
        "basic" => json!({
            "note_id": "note-1",
            "note_url": "https://notes.example.com/1",
            "note_display_title": "Coffee diary 1",
            "note_liked_count": 10,
            "comment_count": 2,
            "note_desc": "Pour-over at home",
            "note_tags": ["coffee", "home"],
            "auther_user_id": "author-1",
            "auther_nick_name": "Mei",
            "auther_avatar": null,
            "auther_home_page_url": "https://notes.example.com/u/author-1",
        }),
        "author" => json!({
            "user_id": "author-1",
            "nick_name": "Mei",
            "fans": "1.2k",
            "ip_location": "Shanghai",
        }),
        "keyword-groups" => json!([
            { "retrieved_at": "2024-02-03T00:00:00", "keyword_group": { "group_id": 1, "group_name": "coffee", "keywords": ["pour-over"] } }
        ]),
        "comments" => json!([
            { "comment_id": "c1", "content": "Looks great" },
            { "comment_id": "c2", "content": "Which beans?" }
        ]),
        "llm-diagnoses" | "tag-comparisons" | "comment-analyses" => json!([]),
        _ => return detail(StatusCode::NOT_FOUND, "Unknown section"),
    };
    Json(body).into_response()
}

fn router(stub: Stub) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-email", post(verify_email))
        .route("/api/auth/forgot-password", post(accept))
        .route("/api/auth/reset-password", post(accept))
        .route("/api/auth/resend-verification", post(accept))
        .route("/api/users/me", get(me).put(update_me))
        .route("/api/users/me/password", put(change_password))
        .route("/api/users/me/login-history", get(my_logins))
        .route("/api/users/me/activity-history", get(my_activity))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id", get(admin_user).put(admin_patch))
        .route("/api/admin/users/:id/status", put(admin_patch))
        .route("/api/admin/users/:id/role", put(admin_patch))
        .route("/api/admin/users/:id/login-history", get(admin_logins))
        .route("/api/admin/users/:id/activity-history", get(admin_activity))
        .route("/api/v1/xhs/notes/", get(list_notes))
        .route("/api/v1/xhs/notes/:note_id/:section", get(note_section))
        .layer(middleware::from_fn_with_state(stub.clone(), record))
        .with_state(stub)
}

/// A stub backend plus a session wired to it through an in-memory cache.
pub struct Harness {
    pub base_url: String,
    pub stub: Stub,
    pub session: Session,
    pub history: Arc<History>,
}

impl Harness {
    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    pub async fn login_as(&self, name: &str) -> Result<()> {
        self.session
            .login(&format!("{}@example.com", name), PASSWORD)
            .await?;
        self.history.take();
        self.stub.clear_requests();
        Ok(())
    }
}

pub async fn harness() -> Result<Harness> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let stub = Stub::default();
    stub.data.lock().unwrap().users = fixture_users();

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind stub backend")?;
    let app = router(stub.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let history = Arc::new(History::new());
    let api = ApiConfig {
        base_url: base_url.clone(),
        timeout_ms: 5_000,
    };
    let client = ApiClient::new(&api, TokenCache::in_memory(), history.clone())?;

    Ok(Harness {
        base_url,
        stub,
        session: Session::new(client),
        history,
    })
}
