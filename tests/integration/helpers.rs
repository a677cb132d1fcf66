//! Shared test helpers: an in-process stub of the employee portal plus
//! preassembled client stacks pointed at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use staffhub_client::dto::LoginRequest;
use staffhub_client::{ApiClient, AuthFlow, UserDirectory};
use staffhub_entity::user::User;
use staffhub_session::backend::MemoryBackend;
use staffhub_session::{AccessGuard, SessionManager, SessionStore};

/// Password every seeded portal account accepts.
pub const PASSWORD: &str = "letmein";

/// Message the stub portal sends for requests without a bearer token.
pub const FORBIDDEN_MESSAGE: &str = "You need to login to access this page";

/// Message the stub portal sends for bad credentials.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Username / password incorrect. Please try again";

const SIGNING_SECRET: &[u8] = b"integration-test-secret";

/// One request observed by the stub portal.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including any query string.
    pub path: String,
    /// Whether an `Authorization: Bearer` header was present.
    pub has_bearer: bool,
}

#[derive(Default)]
struct PortalInner {
    users: Vec<Value>,
    requests: Vec<RecordedRequest>,
    base_url: String,
    /// When set, login responses omit the `Jwt-Token` header.
    omit_token_header: bool,
    /// One-shot failure for the next list request: status and JSON body.
    list_failure: Option<(StatusCode, Value)>,
    last_add_form: HashMap<String, String>,
    last_update_form: HashMap<String, String>,
    /// Username and byte count of the last avatar upload.
    last_avatar: Option<(String, usize)>,
}

/// Shared state behind the stub portal router.
#[derive(Clone, Default)]
struct PortalState {
    inner: Arc<Mutex<PortalInner>>,
}

/// In-process portal double listening on a loopback port.
pub struct TestPortal {
    pub base_url: String,
    state: PortalState,
}

impl TestPortal {
    /// Binds a portal on an ephemeral port and serves it in the
    /// background for the rest of the test.
    pub async fn spawn() -> Self {
        let state = PortalState::default();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub portal");
        let addr = listener.local_addr().expect("stub portal address");
        let base_url = format!("http://{addr}");
        state.inner.lock().unwrap().base_url = base_url.clone();

        let router = portal_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("serve stub portal");
        });

        Self { base_url, state }
    }

    /// Adds an account that authenticates with [`PASSWORD`].
    pub fn seed_user(&self, first: &str, last: &str, username: &str, role: &str) -> Value {
        let user = portal_user(first, last, username, role);
        self.state.inner.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn user_count(&self) -> usize {
        self.state.inner.lock().unwrap().users.len()
    }

    /// The portal's stored record for `username`, if any.
    pub fn stored_user(&self, username: &str) -> Option<Value> {
        self.state
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u["username"] == username)
            .cloned()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.inner.lock().unwrap().requests.clone()
    }

    /// First recorded request matching a method and path prefix.
    pub fn request_for(&self, method: &str, path_prefix: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .find(|r| r.method == method && r.path.starts_with(path_prefix))
    }

    pub fn list_fetch_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == "GET" && r.path == "/user/list")
            .count()
    }

    /// Makes login responses omit the token header.
    pub fn omit_token_header(&self) {
        self.state.inner.lock().unwrap().omit_token_header = true;
    }

    /// Makes the next list request fail with the given status and body.
    pub fn fail_next_list(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.state.inner.lock().unwrap().list_failure = Some((status, body));
    }

    pub fn last_add_form(&self) -> HashMap<String, String> {
        self.state.inner.lock().unwrap().last_add_form.clone()
    }

    pub fn last_update_form(&self) -> HashMap<String, String> {
        self.state.inner.lock().unwrap().last_update_form.clone()
    }

    /// Username and byte count captured by the last avatar upload.
    pub fn last_avatar(&self) -> Option<(String, usize)> {
        self.state.inner.lock().unwrap().last_avatar.clone()
    }
}

/// Client stack wired against a stub portal over its own session store.
pub struct TestClient {
    pub store: SessionStore,
    pub manager: SessionManager,
    pub guard: AccessGuard,
    pub auth: AuthFlow,
    pub directory: UserDirectory,
}

/// Builds a client stack over a fresh in-memory session.
pub fn client_for(portal: &TestPortal) -> TestClient {
    client_with_store(portal, SessionStore::new(Arc::new(MemoryBackend::new())))
}

/// Builds a client stack over an existing session store.
pub fn client_with_store(portal: &TestPortal, store: SessionStore) -> TestClient {
    let manager = SessionManager::new(store.clone());
    let api = ApiClient::with_base_url(portal.base_url.clone(), store.clone())
        .expect("build portal client");
    TestClient {
        store,
        guard: AccessGuard::new(manager.clone()),
        auth: AuthFlow::new(api.clone(), manager.clone()),
        directory: UserDirectory::new(api, manager.clone()),
        manager,
    }
}

/// Logs `username` in with the shared test password.
pub async fn login_as(client: &TestClient, username: &str) -> User {
    client
        .auth
        .login(&LoginRequest {
            username: username.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("login against stub portal")
}

/// Mints a portal-style token for `username`, expiring in one hour.
pub fn mint_token(username: &str) -> String {
    token_with_expiry(username, Utc::now().timestamp() + 3600)
}

/// Mints a token whose expiry is already in the past.
pub fn mint_expired_token(username: &str) -> String {
    token_with_expiry(username, Utc::now().timestamp() - 60)
}

fn token_with_expiry(username: &str, exp: i64) -> String {
    let claims = json!({
        "iss": "StaffHub Portal",
        "sub": username,
        "iat": Utc::now().timestamp(),
        "exp": exp,
        "authorities": ["user:read"],
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SIGNING_SECRET),
    )
    .expect("mint token")
}

/// Builds a portal-side user record with default flags.
pub fn portal_user(first: &str, last: &str, username: &str, role: &str) -> Value {
    json!({
        "userId": Uuid::new_v4().simple().to_string(),
        "firstName": first,
        "lastName": last,
        "username": username,
        "email": format!("{username}@staffhub.test"),
        "profileImageUrl": Value::Null,
        "lastLoginDate": Value::Null,
        "lastLoginDateDisplay": Value::Null,
        "joinDate": Utc::now().to_rfc3339(),
        "role": role,
        "authorities": authorities_for(role),
        "active": true,
        "notLocked": true,
    })
}

fn authorities_for(role: &str) -> Vec<&'static str> {
    match role {
        "ROLE_SUPER_ADMIN" => vec!["user:read", "user:update", "user:create", "user:delete"],
        "ROLE_ADMIN" => vec!["user:read", "user:update", "user:create"],
        "ROLE_MANAGER" | "ROLE_HR" => vec!["user:read", "user:update"],
        _ => vec!["user:read"],
    }
}

fn avatar_url(base_url: &str, username: &str) -> String {
    format!("{base_url}/user/image/{username}/{username}.jpg")
}

fn portal_router(state: PortalState) -> Router {
    Router::new()
        .route("/user/login", post(login))
        .route("/user/register", post(register))
        .route("/user/list", get(list_users))
        .route("/user/add", post(add_user))
        .route("/user/update", put(update_user))
        .route("/user/update-profile-image", put(update_avatar))
        .route("/user/reset-password/{email}", get(reset_password))
        .route("/user/delete/{username}", delete(delete_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            record_request,
        ))
        .with_state(state)
}

async fn record_request(
    State(state): State<PortalState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path,
        has_bearer: has_bearer(request.headers()),
    };
    state.inner.lock().unwrap().requests.push(recorded);
    next.run(request).await
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer ") && value.len() > "Bearer ".len())
}

/// Response in the portal's error body shape.
fn portal_response(status: StatusCode, message: &str) -> Response {
    let reason = status.canonical_reason().unwrap_or_default();
    let body = json!({
        "httpStatusCode": status.as_u16(),
        "httpStatus": reason.to_uppercase().replace(' ', "_"),
        "reason": reason.to_uppercase(),
        "message": message,
    });
    (status, Json(body)).into_response()
}

/// Collects text fields and the byte length of any file part.
async fn read_form(multipart: &mut Multipart) -> (HashMap<String, String>, usize) {
    let mut fields = HashMap::new();
    let mut image_len = 0;
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        if name == "profileImage" {
            image_len = field.bytes().await.expect("read image part").len();
        } else {
            fields.insert(name, field.text().await.expect("read text field"));
        }
    }
    (fields, image_len)
}

async fn login(State(state): State<PortalState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    if password != PASSWORD {
        return portal_response(StatusCode::BAD_REQUEST, BAD_CREDENTIALS_MESSAGE);
    }

    let mut inner = state.inner.lock().unwrap();
    let omit = inner.omit_token_header;
    let user = {
        let Some(user) = inner
            .users
            .iter_mut()
            .find(|u| u["username"] == username.as_str())
        else {
            return portal_response(StatusCode::BAD_REQUEST, BAD_CREDENTIALS_MESSAGE);
        };
        let previous = user["lastLoginDate"].take();
        user["lastLoginDateDisplay"] = previous;
        user["lastLoginDate"] = json!(Utc::now().to_rfc3339());
        user.clone()
    };
    drop(inner);

    let mut response = Json(user).into_response();
    if !omit {
        let value = HeaderValue::from_str(&mint_token(&username)).expect("token header value");
        response
            .headers_mut()
            .insert(HeaderName::from_static("jwt-token"), value);
    }
    response
}

async fn register(State(state): State<PortalState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let mut inner = state.inner.lock().unwrap();
    if inner.users.iter().any(|u| u["username"] == username.as_str()) {
        return portal_response(StatusCode::BAD_REQUEST, "Username already exists");
    }
    let mut user = portal_user(
        body["firstName"].as_str().unwrap_or_default(),
        body["lastName"].as_str().unwrap_or_default(),
        &username,
        "ROLE_USER",
    );
    user["email"] = body["email"].clone();
    inner.users.push(user.clone());
    Json(user).into_response()
}

async fn list_users(State(state): State<PortalState>, headers: HeaderMap) -> Response {
    let failure = state.inner.lock().unwrap().list_failure.take();
    if let Some((status, body)) = failure {
        return (status, Json(body)).into_response();
    }
    if !has_bearer(&headers) {
        return portal_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE);
    }
    let users = state.inner.lock().unwrap().users.clone();
    Json(Value::Array(users)).into_response()
}

async fn add_user(
    State(state): State<PortalState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !has_bearer(&headers) {
        return portal_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE);
    }
    let (fields, image_len) = read_form(&mut multipart).await;
    let username = fields.get("username").cloned().unwrap_or_default();

    let mut inner = state.inner.lock().unwrap();
    if inner.users.iter().any(|u| u["username"] == username.as_str()) {
        return portal_response(StatusCode::BAD_REQUEST, "Username already exists");
    }
    let mut user = portal_user(
        fields.get("firstName").map(String::as_str).unwrap_or_default(),
        fields.get("lastName").map(String::as_str).unwrap_or_default(),
        &username,
        fields.get("role").map(String::as_str).unwrap_or("ROLE_USER"),
    );
    user["email"] = json!(fields.get("email").cloned().unwrap_or_default());
    user["active"] = json!(fields.get("isActive").map(|v| v == "true").unwrap_or(true));
    user["notLocked"] = json!(fields.get("isNotLocked").map(|v| v == "true").unwrap_or(true));
    if image_len > 0 {
        let base_url = inner.base_url.clone();
        user["profileImageUrl"] = json!(avatar_url(&base_url, &username));
    }
    inner.users.push(user.clone());
    inner.last_add_form = fields;
    Json(user).into_response()
}

async fn update_user(
    State(state): State<PortalState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !has_bearer(&headers) {
        return portal_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE);
    }
    let (fields, image_len) = read_form(&mut multipart).await;
    let current = fields.get("currentUsername").cloned().unwrap_or_default();

    let mut inner = state.inner.lock().unwrap();
    let base_url = inner.base_url.clone();
    let updated = {
        let Some(user) = inner
            .users
            .iter_mut()
            .find(|u| u["username"] == current.as_str())
        else {
            return portal_response(
                StatusCode::BAD_REQUEST,
                &format!("User not found with username: {current}"),
            );
        };
        for key in ["firstName", "lastName", "username", "email"] {
            if let Some(value) = fields.get(key) {
                user[key] = json!(value);
            }
        }
        if let Some(role) = fields.get("role") {
            user["role"] = json!(role);
            user["authorities"] = json!(authorities_for(role));
        }
        if let Some(active) = fields.get("isActive") {
            user["active"] = json!(active == "true");
        }
        if let Some(not_locked) = fields.get("isNotLocked") {
            user["notLocked"] = json!(not_locked == "true");
        }
        if image_len > 0 {
            let username = user["username"].as_str().unwrap_or_default().to_string();
            user["profileImageUrl"] = json!(avatar_url(&base_url, &username));
        }
        user.clone()
    };
    inner.last_update_form = fields;
    Json(updated).into_response()
}

async fn update_avatar(
    State(state): State<PortalState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !has_bearer(&headers) {
        return portal_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE);
    }
    let mut username = String::new();
    let mut image_len = 0usize;
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => username = field.text().await.expect("read username field"),
            "profileImage" => image_len = field.bytes().await.expect("read image part").len(),
            _ => {}
        }
    }

    let mut inner = state.inner.lock().unwrap();
    let base_url = inner.base_url.clone();
    let updated = {
        let Some(user) = inner
            .users
            .iter_mut()
            .find(|u| u["username"] == username.as_str())
        else {
            return portal_response(
                StatusCode::BAD_REQUEST,
                &format!("User not found with username: {username}"),
            );
        };
        user["profileImageUrl"] = json!(avatar_url(&base_url, &username));
        user.clone()
    };
    inner.last_avatar = Some((username, image_len));
    Json(updated).into_response()
}

async fn reset_password(State(state): State<PortalState>, Path(email): Path<String>) -> Response {
    let known = state
        .inner
        .lock()
        .unwrap()
        .users
        .iter()
        .any(|u| u["email"] == email.as_str());
    if !known {
        return portal_response(
            StatusCode::BAD_REQUEST,
            &format!("No user found for email: {email}"),
        );
    }
    portal_response(
        StatusCode::OK,
        &format!("An email with a new password was sent to: {email}"),
    )
}

async fn delete_user(
    State(state): State<PortalState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    if !has_bearer(&headers) {
        return portal_response(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE);
    }
    let mut inner = state.inner.lock().unwrap();
    let before = inner.users.len();
    inner.users.retain(|u| u["username"] != username.as_str());
    if inner.users.len() == before {
        return portal_response(
            StatusCode::NOT_FOUND,
            &format!("User not found with username: {username}"),
        );
    }
    portal_response(StatusCode::OK, "User deleted successfully")
}
