// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod comments;
pub mod upload;
pub mod videos;
pub mod votes;

use crate::error::AppError;
use crate::services::media::PUBLIC_PREFIX;
use crate::AppState;
use axum::extract::OriginalUri;
use axum::handler::HandlerWithoutStateExt;
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// `{success, message}` body shared by the account endpoints.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// JSON 404 for anything no route, method or static file matched.
async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Accept a JSON string or number as a collection key.
///
/// Browsers address videos by path or by list position, so both forms
/// reach the API; numbers are keyed by their decimal text.
pub(crate) fn deserialize_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.media.root())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());
    let pages = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(upload::routes(&state.config))
        .merge(videos::routes())
        .merge(votes::routes())
        .merge(comments::routes())
        .method_not_allowed_fallback(not_found)
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback_service(pages)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
