// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upload page and multipart video upload.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{RequireSession, SessionIdentity};
use crate::models::Video;
use crate::services::StoredFile;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Html,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use std::sync::Arc;

/// Page served to logged-in users at `GET /upload`.
pub const UPLOAD_PAGE: &str = "upload.html";

/// Allowance for the title field, part headers and boundaries.
pub const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Whole-request cap: two files at the per-file limit plus form overhead.
/// The per-file limit itself is enforced while streaming each file.
pub fn body_limit(max_file_bytes: u64) -> usize {
    let limit = max_file_bytes
        .saturating_mul(2)
        .saturating_add(FORM_OVERHEAD_BYTES);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    let limit = body_limit(config.max_upload_bytes);

    Router::new().route(
        "/upload",
        get(upload_page)
            .post(upload)
            .layer(DefaultBodyLimit::max(limit)),
    )
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub video: Video,
}

/// Fields collected from the multipart body.
#[derive(Default)]
struct UploadParts {
    title: Option<String>,
    video: Option<StoredFile>,
    thumbnail: Option<StoredFile>,
}

impl UploadParts {
    fn stored_files(&mut self) -> Vec<StoredFile> {
        self.video.take().into_iter().chain(self.thumbnail.take()).collect()
    }
}

async fn upload_page(
    State(state): State<Arc<AppState>>,
    RequireSession(nickname): RequireSession,
) -> Result<Html<String>> {
    let path = state.config.public_dir.join(UPLOAD_PAGE);
    tracing::debug!(nickname = %nickname, "Serving upload page");

    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound(format!("/{UPLOAD_PAGE}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Store a video/thumbnail pair and append it to the catalog.
///
/// The author is the session's nickname; anonymous uploads are accepted
/// and recorded without an author.
async fn upload(
    State(state): State<Arc<AppState>>,
    identity: SessionIdentity,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<UploadResponse>> {
    let mut parts = UploadParts::default();

    if let Err(e) = read_parts(&state, &mut multipart, &mut parts).await {
        state.media.discard(&parts.stored_files()).await;
        return Err(e);
    }

    let (video, thumbnail) = match (parts.video.take(), parts.thumbnail.take()) {
        (Some(video), Some(thumbnail)) => (video, thumbnail),
        (video, thumbnail) => {
            let partial: Vec<StoredFile> = video.into_iter().chain(thumbnail).collect();
            state.media.discard(&partial).await;
            tracing::info!(received = partial.len(), "Upload rejected: missing files");
            return Err(AppError::MissingFiles);
        }
    };

    let record = Video {
        title: parts.title,
        author: identity.nickname().map(str::to_string),
        video: video.public_url.clone(),
        thumbnail: thumbnail.public_url.clone(),
    };

    if let Err(e) = state.catalog.publish(record.clone()).await {
        state.media.discard(&[video, thumbnail]).await;
        return Err(e);
    }

    Ok(Json(UploadResponse {
        success: true,
        video: record,
    }))
}

/// Walk the multipart body, streaming file fields to disk as they arrive.
///
/// Only the first `video` and `thumbnail` files are kept; other fields are skipped.
async fn read_parts(
    state: &AppState,
    multipart: &mut Multipart,
    parts: &mut UploadParts,
) -> Result<()> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => parts.title = Some(field.text().await?),
            Some("video") if parts.video.is_none() => {
                parts.video = Some(state.media.store_field(field).await?);
            }
            Some("thumbnail") if parts.thumbnail.is_none() => {
                parts.thumbnail = Some(state.media.store_field(field).await?);
            }
            other => {
                tracing::debug!(field = ?other, "Skipping multipart field");
            }
        }
    }
    Ok(())
}
