// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use vidshare::config::Config;
use vidshare::routes::create_router;
use vidshare::AppState;

pub const BOUNDARY: &str = "vidshare-test-boundary";

/// Create a test app whose data, uploads and pages live in a fresh temp dir.
/// Returns the router, the shared state and the directory guard.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>, TempDir) {
    create_test_app_with(|_| {}).await
}

/// Like [`create_test_app`], with a hook to adjust the config first.
#[allow(dead_code)]
pub async fn create_test_app_with(
    adjust: impl FnOnce(&mut Config),
) -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::test_default(dir.path());
    adjust(&mut config);

    std::fs::create_dir_all(&config.public_dir).unwrap();
    std::fs::write(
        config.public_dir.join("upload.html"),
        "<html><body>upload form</body></html>",
    )
    .unwrap();
    std::fs::write(
        config.public_dir.join("auth.html"),
        "<html><body>login form</body></html>",
    )
    .unwrap();

    let state = Arc::new(
        AppState::initialize(config)
            .await
            .expect("Failed to initialize state"),
    );
    (create_router(state.clone()), state, dir)
}

/// Send a request through a clone of the router.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Build a JSON request, optionally carrying a cookie header.
#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a request with an arbitrary body and content type.
#[allow(dead_code)]
pub fn raw_request(method: Method, uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&bytes)))
}

/// Collect a response body as text.
#[allow(dead_code)]
pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` pair from the response's session Set-Cookie header.
#[allow(dead_code)]
pub fn session_cookie_pair(response: &Response, cookie_name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{cookie_name}=")))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Register and log in, returning the cookie header value for the session.
#[allow(dead_code)]
pub async fn register_and_login(
    app: &Router,
    state: &AppState,
    email: &str,
    nickname: &str,
    password: &str,
) -> String {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/register",
            serde_json::json!({"email": email, "nickname": nickname, "password": password}),
            None,
        ),
    )
    .await;
    assert!(response.status().is_success(), "register failed");

    let response = send(
        app,
        json_request(
            Method::POST,
            "/login",
            serde_json::json!({"email": email, "password": password}),
            None,
        ),
    )
    .await;
    assert!(response.status().is_success(), "login failed");

    session_cookie_pair(&response, &state.config.session_cookie_name).expect("missing session cookie")
}

/// One part of a multipart body.
#[allow(dead_code)]
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
}

/// Encode parts as `multipart/form-data` using [`BOUNDARY`].
#[allow(dead_code)]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(ct) = content_type {
                    body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a `POST /upload` request.
#[allow(dead_code)]
pub fn upload_request(parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

/// Names of the files in a directory.
#[allow(dead_code)]
pub fn list_dir(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
