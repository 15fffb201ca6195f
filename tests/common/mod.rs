//! In-process mock of the DigiNotes backend.
//!
//! Each test spawns its own server on a free port so state never leaks
//! between tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use diginotes_admin::api::ApiClient;
use diginotes_admin::app::Admin;
use diginotes_admin::config::ClientConfig;
use diginotes_admin::notify::NoticeBuffer;

pub const ADMIN_EMAIL: &str = "admin@diginotes.test";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const RESET_CODE: &str = "123456";

const SESSION_COOKIE: &str = "token=valid-session";

/// What the mock saw of a multipart upload
#[derive(Debug, Clone, Default)]
pub struct UploadRecord {
    pub fields: Vec<(String, String)>,
    /// (field, file name, content type, length)
    pub files: Vec<(String, String, String, usize)>,
}

#[derive(Default)]
pub struct MockState {
    pub requests: Vec<String>,
    pub users: Vec<Value>,
    pub documents: Vec<Value>,
    pub reviews: Vec<Value>,
    pub uploads: Vec<UploadRecord>,
    pub password: String,
    next_id: u32,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub port: u16,
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let state: Shared = Arc::new(Mutex::new(seed()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, state };
        server.wait_ready(Duration::from_secs(5)).await?;
        server.state.lock().unwrap().requests.clear();
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("mock backend did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Requests seen so far as `"METHOD /path?query"`
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn client(&self) -> Arc<ApiClient> {
        Arc::new(ApiClient::new(&self.base_url).expect("mock base url parses"))
    }

    /// Client whose base URL carries a path prefix
    pub fn client_under(&self, prefix: &str) -> Arc<ApiClient> {
        let base = format!("{}{}", self.base_url, prefix);
        Arc::new(ApiClient::new(&base).expect("prefixed base url parses"))
    }

    /// Application wired to this backend with zero debounce
    pub fn admin(&self) -> (Admin, Arc<ApiClient>, Arc<NoticeBuffer>) {
        let mut config = ClientConfig::for_base_url(self.base_url.clone());
        config.search.document_debounce_ms = 0;
        let client = self.client();
        let notices = Arc::new(NoticeBuffer::new());
        let admin = Admin::new(client.clone(), &config, notices.clone());
        (admin, client, notices)
    }
}

fn seed() -> MockState {
    MockState {
        users: vec![
            json!({"_id": "u1", "name": "Asha Patel", "email": "asha@example.com", "regdNo": "2101001",
                   "dob": "2003-04-17T00:00:00.000Z", "gender": "Female", "branch": "CSE", "sem": 5, "block": false}),
            json!({"_id": "u2", "name": "Ravi Kumar", "email": "ravi@example.com", "regdNo": "2101002",
                   "dob": "2002-11-02", "branch": "EE", "sem": "7", "block": true}),
        ],
        documents: vec![
            json!({"_id": "d1", "name": "Operating Systems", "semester": 4, "branch": "CSE",
                   "size": 1048576, "driveViewLink": "https://drive.test/d1"}),
            json!({"_id": "d2", "name": "Data Structures", "semester": 3, "branch": "CSE", "size": "820 KB"}),
            json!({"_id": "d3", "name": "Engineering Maths I", "semester": 1, "branch": "All"}),
        ],
        reviews: vec![
            json!({"_id": "r1", "user": {"name": "Asha Patel"}, "content": "Great notes", "rating": 5, "isVisible": true}),
            json!({"_id": "r2", "user": {"name": "Ravi Kumar"}, "content": "Missing unit 3", "rating": 2, "isVisible": false}),
        ],
        password: ADMIN_PASSWORD.to_string(),
        next_id: 10,
        ..Default::default()
    }
}

fn router(state: Shared) -> Router {
    let routes = api_routes();
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_request))
        .with_state(state)
}

/// Backend routes, served both at the root and under `/api`
fn api_routes() -> Router<Shared> {
    Router::new()
        .route("/auth/verify", get(verify))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/send-resetcode", post(send_reset_code))
        .route("/auth/codeverify", post(code_verify))
        .route("/auth/resetpassword", patch(reset_password))
        .route("/users/allusers", get(all_users))
        .route("/users/search", get(search_users))
        .route("/users/details/:id", get(user_details))
        .route("/users/:id/toggle-block", patch(toggle_block))
        .route("/documents/alldocuments", get(all_documents))
        .route("/documents/search", get(search_documents))
        .route("/documents/upload", post(upload_document))
        .route("/documents/edit/:id", patch(edit_document))
        .route("/documents/delete/:id", delete(delete_document))
        .route("/documents/:semester", get(documents_by_semester))
        .route("/reviews/allreviews", get(all_reviews))
        .route("/reviews/:id", get(reviews_by_rating))
        .route("/reviews/:id/toggleshowhide", patch(toggle_review))
        .route("/reviews/delete/:id", delete(delete_review))
}

async fn log_request(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let line = match req.uri().query() {
        Some(q) => format!("{} {}?{}", req.method(), req.uri().path(), q),
        None => format!("{} {}", req.method(), req.uri().path()),
    };
    if req.uri().path() != "/health" {
        state.lock().unwrap().requests.push(line);
    }
    next.run(req).await
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

macro_rules! require_session {
    ($headers:expr) => {
        if !has_session(&$headers) {
            return message(StatusCode::UNAUTHORIZED, "Unauthorized: please login");
        }
    };
}

fn matches_text(value: &Value, key: &str, needle: &str) -> bool {
    value[key]
        .as_str()
        .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
}

// ---- auth

async fn verify(headers: HeaderMap) -> Response {
    require_session!(headers);
    message(StatusCode::OK, "Authenticated")
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let ok = body["email"] == ADMIN_EMAIL && body["password"] == state.lock().unwrap().password.as_str();
    if !ok {
        return message(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    (
        [(header::SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION_COOKIE))],
        Json(json!({ "message": "Login successful" })),
    )
        .into_response()
}

async fn logout() -> Response {
    (
        [(header::SET_COOKIE, "token=; Path=/; Max-Age=0".to_string())],
        Json(json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}

async fn send_reset_code() -> Response {
    message(StatusCode::OK, "Verification code sent")
}

async fn code_verify(Json(body): Json<Value>) -> Response {
    if body["code"] == RESET_CODE {
        message(StatusCode::OK, "Code verified")
    } else {
        message(StatusCode::BAD_REQUEST, "Invalid verification code")
    }
}

async fn reset_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let (Some(password), Some(confirm)) = (body["password"].as_str(), body["cpassword"].as_str()) else {
        return message(StatusCode::BAD_REQUEST, "Password is required");
    };
    if password != confirm {
        return message(StatusCode::BAD_REQUEST, "Passwords do not match");
    }
    state.lock().unwrap().password = password.to_string();
    message(StatusCode::OK, "Password updated")
}

// ---- users

async fn all_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_session!(headers);
    Json(state.lock().unwrap().users.clone()).into_response()
}

async fn search_users(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Response {
    require_session!(headers);
    let needle = params.get("query").cloned().unwrap_or_default();
    let found: Vec<Value> = state
        .lock()
        .unwrap()
        .users
        .iter()
        .filter(|u| matches_text(u, "name", &needle) || matches_text(u, "regdNo", &needle))
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn user_details(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    require_session!(headers);
    match state.lock().unwrap().users.iter().find(|u| u["_id"] == id.as_str()) {
        Some(user) => Json(user.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn toggle_block(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    require_session!(headers);
    let mut state = state.lock().unwrap();
    let Some(user) = state.users.iter_mut().find(|u| u["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    let block = !user["block"].as_bool().unwrap_or(false);
    user["block"] = json!(block);
    Json(json!({
        "message": if block { "User has been blocked" } else { "User has been unblocked" },
        "user": { "_id": id, "block": block }
    }))
    .into_response()
}

// ---- documents

async fn all_documents(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_session!(headers);
    Json(state.lock().unwrap().documents.clone()).into_response()
}

async fn search_documents(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Response {
    require_session!(headers);
    let needle = params.get("q").cloned().unwrap_or_default();
    let found: Vec<Value> = state
        .lock()
        .unwrap()
        .documents
        .iter()
        .filter(|d| matches_text(d, "name", &needle))
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn documents_by_semester(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(semester): Path<String>,
) -> Response {
    require_session!(headers);
    let found: Vec<Value> = state
        .lock()
        .unwrap()
        .documents
        .iter()
        .filter(|d| d["semester"].to_string().trim_matches('"') == semester)
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn read_multipart(mut multipart: Multipart) -> Result<UploadRecord, Response> {
    let mut record = UploadRecord::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| message(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| message(StatusCode::BAD_REQUEST, &e.to_string()))?;
                record.files.push((name, file_name, content_type, bytes.len()));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| message(StatusCode::BAD_REQUEST, &e.to_string()))?;
                record.fields.push((name, text));
            }
        }
    }
    Ok(record)
}

async fn upload_document(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    require_session!(headers);
    let record = match read_multipart(multipart).await {
        Ok(record) => record,
        Err(resp) => return resp,
    };
    let field = |key: &str| {
        record
            .fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    let Some(file) = record.files.iter().find(|f| f.0 == "file") else {
        return message(StatusCode::BAD_REQUEST, "Document file is required");
    };

    let mut state = state.lock().unwrap();
    let id = format!("d{}", state.next_id);
    state.next_id += 1;
    // Form fields come back as text, the way the real backend echoes them.
    let doc = json!({
        "_id": id,
        "name": field("name").unwrap_or_default(),
        "semester": field("semester").unwrap_or_default(),
        "branch": field("branch").unwrap_or_default(),
        "size": file.3,
        "driveViewLink": format!("https://drive.test/{}", id),
    });
    state.documents.push(doc.clone());
    state.uploads.push(record.clone());
    Json(doc).into_response()
}

async fn edit_document(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    require_session!(headers);
    let record = match read_multipart(multipart).await {
        Ok(record) => record,
        Err(resp) => return resp,
    };

    let mut state = state.lock().unwrap();
    let Some(doc) = state.documents.iter_mut().find(|d| d["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Document not found");
    };
    for (key, value) in &record.fields {
        doc[key.as_str()] = json!(value);
    }
    let doc = doc.clone();
    state.uploads.push(record);
    Json(doc).into_response()
}

async fn delete_document(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    require_session!(headers);
    let mut state = state.lock().unwrap();
    let before = state.documents.len();
    state.documents.retain(|d| d["_id"] != id.as_str());
    if state.documents.len() == before {
        return message(StatusCode::NOT_FOUND, "Document not found");
    }
    message(StatusCode::OK, "Document deleted")
}

// ---- reviews

async fn all_reviews(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().reviews.clone()).into_response()
}

async fn reviews_by_rating(State(state): State<Shared>, headers: HeaderMap, Path(rating): Path<String>) -> Response {
    require_session!(headers);
    let found: Vec<Value> = state
        .lock()
        .unwrap()
        .reviews
        .iter()
        .filter(|r| r["rating"].to_string() == rating)
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn toggle_review(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    require_session!(headers);
    let mut state = state.lock().unwrap();
    let Some(review) = state.reviews.iter_mut().find(|r| r["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Review not found");
    };
    let visible = !review["isVisible"].as_bool().unwrap_or(false);
    review["isVisible"] = json!(visible);
    Json(json!({ "message": "Visibility updated", "review": review.clone() })).into_response()
}

async fn delete_review(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    require_session!(headers);
    let mut state = state.lock().unwrap();
    let before = state.reviews.len();
    state.reviews.retain(|r| r["_id"] != id.as_str());
    if state.reviews.len() == before {
        return message(StatusCode::NOT_FOUND, "Review not found");
    }
    message(StatusCode::OK, "Review deleted")
}
