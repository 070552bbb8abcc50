// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video listing.

use crate::models::Video;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/videos", get(list_videos))
}

async fn list_videos(State(state): State<Arc<AppState>>) -> Json<Vec<Video>> {
    Json(state.catalog.list_videos().await)
}
