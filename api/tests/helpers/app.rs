use std::sync::Once;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use db::test_utils::setup_paired_test_db;
use util::config::AppConfig;
use util::state::AppState;

static INIT: Once = Once::new();

/// Sets the environment variables required by `AppConfig` exactly once per
/// test binary, before any config access.
pub fn init_test_env() {
    INIT.call_once(|| {
        // SAFETY: runs once before any test has spawned threads reading env.
        unsafe {
            std::env::set_var("APP_ENV", "test");
            std::env::set_var("DATABASE_PATH", "ignored-in-tests.db");
            std::env::set_var("JWT_SECRET", "test-secret");
            std::env::set_var("JWT_DURATION_MINUTES", "60");
        }
        AppConfig::reset();
    });
}

/// A fully wired application over a file-backed temp database, with the
/// selfie storage root pointed into the same temp dir.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _dir: tempfile::TempDir,
}

pub async fn make_test_app() -> TestApp {
    init_test_env();

    let (db, audit_db, dir) = setup_paired_test_db().await;
    AppConfig::set_selfie_storage_root(dir.path().join("selfies").display().to_string());

    let state = AppState::new(db, audit_db);
    let app = api::routes::routes(state.clone());

    TestApp {
        app,
        state,
        _dir: dir,
    }
}

/// Creates an admin row and returns a bearer token for it.
pub async fn admin_token(state: &AppState) -> String {
    let admin = db::models::admin_user::Model::create(state.db(), "admin", "hunter2!")
        .await
        .expect("failed to create admin");
    let (token, _) = api::auth::generate_jwt(admin.id, true);
    token
}

/// A syntactically valid token whose claims carry `admin: false`.
pub fn non_admin_token() -> String {
    init_test_env();
    let (token, _) = api::auth::generate_jwt(999, false);
    token
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Builds a `multipart/form-data` body from text fields plus an optional
/// `(field_name, content_type, bytes)` file part.
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((name, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"selfie.jpg\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
