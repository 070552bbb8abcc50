// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment routes.

use crate::error::{require_field, AppError, Result};
use crate::models::Comment;
use crate::routes::deserialize_key;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/comments", get(list_comments).post(add_comment))
}

#[derive(Deserialize)]
struct CommentsQuery {
    video: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[serde(default, deserialize_with = "deserialize_key")]
    video: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key")]
    user_id: Option<String>,
    username: Option<String>,
    comment: Option<String>,
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(params), _): WithRejection<Query<CommentsQuery>, AppError>,
) -> Result<Json<Vec<Comment>>> {
    let video = require_field(params.video, "video")?;
    Ok(Json(state.comments.list_comments(&video).await?))
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<AddCommentRequest>, AppError>,
) -> Result<Json<Vec<Comment>>> {
    let video = require_field(req.video, "video")?;
    let user_id = require_field(req.user_id, "userId")?;
    let username = require_field(req.username, "username")?;
    let comment = require_field(req.comment, "comment")?;

    let comments = state
        .comments
        .add_comment(&video, &user_id, &username, &comment)
        .await?;
    Ok(Json(comments))
}
