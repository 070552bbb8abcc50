// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video catalog.

use crate::db::JsonDb;
use crate::error::AppError;
use crate::models::Video;

#[derive(Clone)]
pub struct VideoCatalog {
    db: JsonDb,
}

impl VideoCatalog {
    pub fn new(db: JsonDb) -> Self {
        Self { db }
    }

    /// Every video, in upload order.
    pub async fn list_videos(&self) -> Vec<Video> {
        self.db.get_videos().await
    }

    /// Append a freshly uploaded video.
    pub async fn publish(&self, video: Video) -> Result<(), AppError> {
        self.db.append_video(video.clone()).await?;
        tracing::info!(
            title = ?video.title,
            author = ?video.author,
            video = %video.video,
            thumbnail = %video.thumbnail,
            "Video published"
        );
        Ok(())
    }
}
