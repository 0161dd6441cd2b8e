//! In-process stand-in for the fitness API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use fitvoice::auth::{AuthClient, SessionManager};
use fitvoice::storage::{CredentialStore, MemorySecureStore, SecureStore};

pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";
pub const PROFILE: &str = "profile";

#[derive(Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
    /// Never answer.
    Hang,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<Mutex<HashMap<&'static str, Reply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockApi {
    pub base_url: String,
    state: MockState,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/api/auth", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/{id}", get(profile))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api stopped");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn reply(&self, endpoint: &'static str, reply: Reply) {
        self.state.replies.lock().unwrap().insert(endpoint, reply);
    }

    pub fn reply_json(&self, endpoint: &'static str, status: StatusCode, body: Value) {
        self.reply(endpoint, Reply::Json(status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn login(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    answer(&state, LOGIN, "/api/auth".to_string(), &headers, &body).await
}

async fn register(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    answer(&state, REGISTER, "/api/auth/register".to_string(), &headers, &body).await
}

async fn profile(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    answer(&state, PROFILE, format!("/api/auth/{}", id), &headers, "").await
}

async fn answer(
    state: &MockState,
    endpoint: &'static str,
    path: String,
    headers: &HeaderMap,
    body: &str,
) -> Response {
    state.requests.lock().unwrap().push(Recorded {
        path,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(body).ok(),
    });

    let reply = state.replies.lock().unwrap().get(endpoint).cloned();
    match reply {
        Some(Reply::Json(status, value)) => (status, Json(value)).into_response(),
        Some(Reply::Text(status, text)) => (status, text).into_response(),
        Some(Reply::Hang) => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no reply configured", "data": null, "error": true, "status": "404" })),
        )
            .into_response(),
    }
}

/// Address nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("loopback address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn envelope(message: &str, data: Value, error: bool, status: &str) -> Value {
    json!({ "message": message, "data": data, "error": error, "status": status })
}

pub fn login_ok(token: &str, role: &str, id_user: i64) -> Value {
    envelope(
        "ok",
        json!({ "token": token, "role": role, "idUser": id_user }),
        false,
        "200",
    )
}

pub fn sessions_with(
    base_url: &str,
    timeout: Duration,
    store: Arc<dyn SecureStore>,
) -> SessionManager {
    // Loopback traffic must not be routed through an ambient proxy.
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build http client");
    SessionManager::new(
        AuthClient::with_client(base_url, timeout, http),
        CredentialStore::new(store),
    )
}

pub fn sessions(base_url: &str) -> (SessionManager, Arc<MemorySecureStore>) {
    let store = Arc::new(MemorySecureStore::new());
    (
        sessions_with(base_url, Duration::from_secs(10), store.clone()),
        store,
    )
}
