// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shifty_web::config::Config;
use shifty_web::routes::create_router;
use shifty_web::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the Shifty auth API.
///
/// Tokens: `tok-1` is valid, `tok-bad-email` and `tok-no-sub` return
/// malformed identities, anything else is rejected with 401.
///
/// Login refusals for `blank@b.com` and `listed@b.com` carry an empty and a
/// list-valued `message`; registering `quiet@b.com` returns `error: true`
/// with an empty message.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockAuth {
    pub identity_calls: AtomicUsize,
    pub submissions: AtomicUsize,
    pub last_register: Mutex<Option<Value>>,
}

#[allow(dead_code)]
impl MockAuth {
    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

async fn identity(State(mock): State<Arc<MockAuth>>, headers: HeaderMap) -> Response {
    mock.identity_calls.fetch_add(1, Ordering::SeqCst);

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some("tok-1") => {
            Json(json!({"id": "u1", "email": "a@b.com", "subscriptionId": "sub-1"}))
                .into_response()
        }
        Some("tok-bad-email") => {
            Json(json!({"id": "u2", "email": "not-an-email", "subscriptionId": "sub-2"}))
                .into_response()
        }
        Some("tok-no-sub") => Json(json!({"id": "u3", "email": "c@d.com"})).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid token"})),
        )
            .into_response(),
    }
}

async fn login(State(mock): State<Arc<MockAuth>>, Json(body): Json<Value>) -> Response {
    mock.submissions.fetch_add(1, Ordering::SeqCst);

    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("a@b.com"), Some("secret123")) => {
            Json(json!({"access_token": "tok-1"})).into_response()
        }
        (Some("tokenless@b.com"), _) => Json(json!({})).into_response(),
        (Some("blank@b.com"), _) => {
            (StatusCode::BAD_REQUEST, Json(json!({"message": ""}))).into_response()
        }
        (Some("listed@b.com"), _) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": ["email must be verified", "account is locked"]})),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "bad credentials"})),
        )
            .into_response(),
    }
}

async fn register(State(mock): State<Arc<MockAuth>>, Json(body): Json<Value>) -> Response {
    mock.submissions.fetch_add(1, Ordering::SeqCst);
    *mock.last_register.lock().unwrap() = Some(body.clone());

    if body["email"] == "taken@b.com" {
        Json(json!({"error": true, "message": "Email already registered"})).into_response()
    } else if body["email"] == "quiet@b.com" {
        Json(json!({"error": true, "message": ""})).into_response()
    } else if body["email"] == "broken@b.com" {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
    } else {
        Json(json!({"access_token": "tok-1"})).into_response()
    }
}

/// Start the mock auth API on an ephemeral port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_auth() -> (String, Arc<MockAuth>) {
    let mock = Arc::new(MockAuth::default());
    let app = Router::new()
        .route("/auth", get(identity))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock auth API");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

/// Create a test app talking to `auth_api_url`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(auth_api_url: &str) -> (Router, Arc<AppState>) {
    create_test_app_with(Config {
        auth_api_url: auth_api_url.to_string(),
        ..Config::default()
    })
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Mock auth API plus an app wired to it.
#[allow(dead_code)]
pub async fn create_test_app_with_mock() -> (Router, Arc<AppState>, Arc<MockAuth>) {
    let (url, mock) = spawn_mock_auth().await;
    let (app, state) = create_test_app(&url);
    (app, state, mock)
}

/// `Cookie` request header carrying a session that holds `token`.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, token: &str) -> HeaderValue {
    let set_cookie = state
        .sessions
        .set_token(&HeaderMap::new(), token)
        .expect("Failed to mint session cookie");
    cookie_from_set_cookie(&set_cookie)
}

/// The `name=value` part of a `Set-Cookie` value, as a browser would send it.
#[allow(dead_code)]
pub fn cookie_from_set_cookie(set_cookie: &HeaderValue) -> HeaderValue {
    let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
    HeaderValue::from_str(pair).unwrap()
}

/// Token stored in the session a `Set-Cookie` value would create.
#[allow(dead_code)]
pub fn token_in(state: &AppState, set_cookie: &HeaderValue) -> Option<String> {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, cookie_from_set_cookie(set_cookie));
    state.sessions.get_token(&headers)
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
