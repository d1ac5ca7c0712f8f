//! End-to-end session flows against an in-process mock of the movie API.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;

use watchlog_core::config::{ApiConfig, Config, PathsConfig};
use watchlog_core::normalize::IdField;
use watchlog_core::notify::{Notice, Notifier};
use watchlog_core::types::{Movie, MovieEnvelope};
use watchlog_core::{Error, Method, SessionManager};

// ─────────────────────────────────────────────────────────────────────────────
// Mock API
// ─────────────────────────────────────────────────────────────────────────────

/// Last Authorization header seen by the movies endpoint.
type SeenAuth = Arc<Mutex<Option<String>>>;

async fn spawn_mock() -> (SocketAddr, SeenAuth) {
    let seen_auth: SeenAuth = Arc::new(Mutex::new(None));

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/movies", get(list_movies).post(create_movie))
        .route("/api/movies/{id}", patch(update_movie).delete(delete_movie))
        .route("/api/session-check", get(always_expired))
        .route("/api/teapot", get(teapot))
        .with_state(seen_auth.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().expect("Missing local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server died");
    });

    (addr, seen_auth)
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "broken@b.com" {
        // Token but no user record
        return Json(json!({"token": "T9"})).into_response();
    }
    if body["email"] == "a@b.com" && body["password"] == "pw" {
        Json(json!({
            "token": "T1",
            "user": {"id": 1, "name": "A", "email": "a@b.com"},
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "taken@b.com" {
        (
            StatusCode::CONFLICT,
            Json(json!({"message": "Email already registered"})),
        )
            .into_response()
    } else {
        (
            StatusCode::CREATED,
            Json(json!({"message": "Account created"})),
        )
            .into_response()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_movies(State(seen): State<SeenAuth>, headers: HeaderMap) -> impl IntoResponse {
    let auth = bearer(&headers);
    *seen.lock().expect("lock") = auth.clone();

    if auth.as_deref() != Some("Bearer T1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "expired"})),
        )
            .into_response();
    }
    Json(json!([
        {"_id": "m1", "title": "Dune", "year": 2021, "rating": 9},
        {"_id": "m2", "title": "Heat", "year": 1995},
    ]))
    .into_response()
}

async fn create_movie(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some("Bearer T1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "expired"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "created",
            "movie": {"_id": "m3", "title": body["title"]},
        })),
    )
        .into_response()
}

async fn update_movie(Path(id): Path<String>) -> impl IntoResponse {
    Json(json!({
        "message": "updated",
        "movie": {"_id": id, "title": "Dune Part Two"},
    }))
}

async fn delete_movie(Path(_id): Path<String>) -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn always_expired() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "expired"})),
    )
}

async fn teapot() -> impl IntoResponse {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({"message": "short and stout"})),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<(Notice, String)>>);

impl RecordingNotifier {
    fn messages(&self) -> Vec<(Notice, String)> {
        self.0.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Notice, message: &str) {
        self.0.lock().expect("lock").push((level, message.to_string()));
    }
}

fn test_config(addr: SocketAddr, dir: &TempDir, id_field: IdField) -> Config {
    Config {
        api: ApiConfig {
            url: format!("http://{addr}/api"),
            id_field,
        },
        paths: PathsConfig {
            data_dir: dir.path().to_path_buf(),
        },
    }
}

fn manager(addr: SocketAddr, dir: &TempDir, id_field: IdField) -> SessionManager {
    SessionManager::new(&test_config(addr, dir, id_field)).expect("Failed to build session")
}

async fn logged_in(addr: SocketAddr, dir: &TempDir) -> SessionManager {
    let session = manager(addr, dir, IdField::Mongo);
    session.restore();
    session
        .login("a@b.com", "pw")
        .await
        .expect("Login should succeed");
    session
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_establishes_session_and_attaches_bearer() {
    let (addr, seen_auth) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = manager(addr, &dir, IdField::Mongo);
    session.restore();
    assert!(!session.is_authenticated());

    session
        .login("a@b.com", "pw")
        .await
        .expect("Login should succeed");

    let snapshot = session.snapshot();
    assert!(snapshot.authenticated);
    assert_eq!(
        snapshot.user.as_ref().map(|u| u.email.as_str()),
        Some("a@b.com")
    );

    // Storage holds the matching pair
    let token = std::fs::read_to_string(dir.path().join("token")).expect("token file");
    assert_eq!(token, "T1");
    assert!(dir.path().join("user.json").exists());

    // Subsequent passthrough carries the token
    let movies: Vec<Movie> = session
        .request(Method::GET, "/movies", None)
        .await
        .expect("Expected a movie list");
    assert_eq!(movies.len(), 2);
    assert_eq!(
        seen_auth.lock().expect("lock").as_deref(),
        Some("Bearer T1")
    );
}

#[tokio::test]
async fn login_rejected_leaves_state_and_storage_unchanged() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = manager(addr, &dir, IdField::Canonical);
    session.restore();

    let err = session
        .login("a@b.com", "wrong")
        .await
        .expect_err("Login should fail");
    match err {
        Error::Authentication(msg) => assert!(msg.contains("Invalid credentials")),
        other => panic!("Expected Authentication error, got {other:?}"),
    }

    assert!(!session.is_authenticated());
    assert!(!dir.path().join("token").exists());
    assert!(!dir.path().join("user.json").exists());
}

#[tokio::test]
async fn login_malformed_response_is_an_authentication_error() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = manager(addr, &dir, IdField::Canonical);
    session.restore();

    let err = session
        .login("broken@b.com", "pw")
        .await
        .expect_err("Login should fail");
    assert!(matches!(err, Error::Authentication(_)));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn restore_recovers_persisted_session() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    logged_in(addr, &dir).await;

    // A fresh manager over the same data dir picks the session up
    let session = manager(addr, &dir, IdField::Mongo);
    assert!(session.initializing());
    session.restore();
    assert!(!session.initializing());
    assert!(session.is_authenticated());
    assert_eq!(
        session.user().map(|u| u.email),
        Some("a@b.com".to_string())
    );
}

#[tokio::test]
async fn restore_with_partial_storage_stays_anonymous() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    // Token without a user record
    std::fs::write(dir.path().join("token"), "T1").expect("write token");

    let session = manager(addr, &dir, IdField::Mongo);
    session.restore();
    assert!(!session.initializing());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn restore_runs_only_once() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = logged_in(addr, &dir).await;

    // The store is now out of sync with nothing; a second restore must not
    // re-read it or touch the live session.
    std::fs::remove_file(dir.path().join("token")).expect("remove token");
    session.restore();
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn expiry_clears_session_and_storage() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let recorder = Arc::new(RecordingNotifier::default());
    let session = SessionManager::with_notifier(
        &test_config(addr, &dir, IdField::Mongo),
        recorder.clone(),
    )
    .expect("Failed to build session");
    session.restore();
    session.login("a@b.com", "pw").await.expect("login");

    let result: Option<Value> = session.request(Method::GET, "/session-check", None).await;
    assert!(result.is_none());

    assert!(!session.is_authenticated());
    assert!(!dir.path().join("token").exists());
    assert!(!dir.path().join("user.json").exists());

    let notices = recorder.messages();
    assert!(
        notices
            .iter()
            .any(|(level, msg)| *level == Notice::Warning && msg.contains("Session expired")),
        "expected a session-expired notice, got {notices:?}"
    );
}

#[tokio::test]
async fn no_content_returns_none_without_notice() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let recorder = Arc::new(RecordingNotifier::default());
    let session = SessionManager::with_notifier(
        &test_config(addr, &dir, IdField::Mongo),
        recorder.clone(),
    )
    .expect("Failed to build session");
    session.restore();
    session.login("a@b.com", "pw").await.expect("login");

    let result: Option<Value> = session.request(Method::DELETE, "/movies/m1", None).await;
    assert!(result.is_none());
    assert!(recorder.messages().is_empty());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn api_errors_are_notified_and_swallowed() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let recorder = Arc::new(RecordingNotifier::default());
    let session = SessionManager::with_notifier(
        &test_config(addr, &dir, IdField::Mongo),
        recorder.clone(),
    )
    .expect("Failed to build session");
    session.restore();

    let result: Option<Value> = session.request(Method::GET, "/teapot", None).await;
    assert!(result.is_none());

    let notices = recorder.messages();
    assert!(
        notices
            .iter()
            .any(|(level, msg)| *level == Notice::Error && msg.contains("short and stout")),
        "expected the server message to surface, got {notices:?}"
    );
}

#[tokio::test]
async fn normalization_applies_to_lists_and_envelopes() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = logged_in(addr, &dir).await;

    let movies: Vec<Movie> = session
        .request(Method::GET, "/movies", None)
        .await
        .expect("Expected a movie list");
    assert_eq!(movies[0].id, json!("m1"));
    assert_eq!(movies[0].title, "Dune");

    let envelope: MovieEnvelope = session
        .request(
            Method::PATCH,
            "/movies/m7",
            Some(json!({"title": "Dune Part Two"})),
        )
        .await
        .expect("Expected an envelope");
    assert_eq!(envelope.movie.id, json!("m7"));
    assert_eq!(envelope.movie.title, "Dune Part Two");
}

#[tokio::test]
async fn create_envelope_round_trip() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = logged_in(addr, &dir).await;

    let envelope: MovieEnvelope = session
        .request(Method::POST, "/movies", Some(json!({"title": "Alien"})))
        .await
        .expect("Expected an envelope");
    assert_eq!(envelope.movie.id, json!("m3"));
    assert_eq!(envelope.movie.title, "Alien");
    assert_eq!(envelope.message.as_deref(), Some("created"));
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = logged_in(addr, &dir).await;
    assert!(session.is_authenticated());

    session.logout();
    let first = session.snapshot();
    session.logout();
    let second = session.snapshot();

    assert_eq!(first, second);
    assert!(!second.authenticated);
    assert!(second.user.is_none());
    assert!(!dir.path().join("token").exists());
}

#[tokio::test]
async fn register_success_establishes_no_session() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = manager(addr, &dir, IdField::Canonical);
    session.restore();

    session
        .register("B", "b@b.com", "pw123456")
        .await
        .expect("Registration should succeed");
    assert!(!session.is_authenticated());
    assert!(!dir.path().join("token").exists());
}

#[tokio::test]
async fn register_conflict_propagates_server_message() {
    let (addr, _) = spawn_mock().await;
    let dir = TempDir::new().expect("tempdir");

    let session = manager(addr, &dir, IdField::Canonical);
    session.restore();

    let err = session
        .register("B", "taken@b.com", "pw123456")
        .await
        .expect_err("Registration should fail");
    match err {
        Error::Registration(msg) => assert!(msg.contains("already registered")),
        other => panic!("Expected Registration error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_swallowed_on_passthrough() {
    // Unroutable port: connection refused
    let dir = TempDir::new().expect("tempdir");
    let addr: SocketAddr = "127.0.0.1:1".parse().expect("addr");

    let recorder = Arc::new(RecordingNotifier::default());
    let session = SessionManager::with_notifier(
        &test_config(addr, &dir, IdField::Canonical),
        recorder.clone(),
    )
    .expect("Failed to build session");
    session.restore();

    let result: Option<Value> = session.request(Method::GET, "/movies", None).await;
    assert!(result.is_none());
    assert!(
        recorder
            .messages()
            .iter()
            .any(|(level, _)| *level == Notice::Error)
    );
}

#[tokio::test]
async fn transport_failure_propagates_from_login() {
    let dir = TempDir::new().expect("tempdir");
    let addr: SocketAddr = "127.0.0.1:1".parse().expect("addr");

    let session = manager(addr, &dir, IdField::Canonical);
    session.restore();

    let err = session
        .login("a@b.com", "pw")
        .await
        .expect_err("Login should fail without a server");
    assert!(matches!(err, Error::Transport(_)));
}
