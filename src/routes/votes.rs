// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Like/dislike routes.

use crate::error::{require_field, AppError, Result};
use crate::models::{UserVoteView, VoteKind, VoteTally};
use crate::routes::deserialize_key;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/votes", get(get_votes))
        .route("/like", post(like))
        .route("/dislike", post(dislike))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VotesQuery {
    video: Option<String>,
    user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default, deserialize_with = "deserialize_key")]
    video: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key")]
    user_id: Option<String>,
}

/// Aggregate counts plus whether `userId` liked or disliked the video.
async fn get_votes(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(params), _): WithRejection<Query<VotesQuery>, AppError>,
) -> Result<Json<UserVoteView>> {
    let video = require_field(params.video, "video")?;
    let view = state
        .voting
        .get_votes(&video, params.user_id.as_deref())
        .await?;
    Ok(Json(view))
}

async fn like(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<VoteRequest>, AppError>,
) -> Result<Json<VoteTally>> {
    cast(&state, req, VoteKind::Like).await
}

async fn dislike(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<VoteRequest>, AppError>,
) -> Result<Json<VoteTally>> {
    cast(&state, req, VoteKind::Dislike).await
}

async fn cast(state: &AppState, req: VoteRequest, kind: VoteKind) -> Result<Json<VoteTally>> {
    let video = require_field(req.video, "video")?;
    let user_id = require_field(req.user_id, "userId")?;
    let tally = state.voting.cast(&video, &user_id, kind).await?;
    Ok(Json(tally))
}
