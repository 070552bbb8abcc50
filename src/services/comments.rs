// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-video comment lists.

use crate::db::JsonDb;
use crate::error::AppError;
use crate::models::Comment;

#[derive(Clone)]
pub struct CommentService {
    db: JsonDb,
}

impl CommentService {
    pub fn new(db: JsonDb) -> Self {
        Self { db }
    }

    /// Comments for a video in posting order.
    ///
    /// An empty list is created (and persisted) on first access.
    pub async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, AppError> {
        if self.db.ensure_comments(video_id).await? {
            tracing::debug!(video = video_id, "Initialized comment list");
        }
        Ok(self.db.get_comments(video_id).await)
    }

    /// Append a comment and return the video's updated list.
    pub async fn add_comment(
        &self,
        video_id: &str,
        user_id: &str,
        username: &str,
        text: &str,
    ) -> Result<Vec<Comment>, AppError> {
        let comment = Comment {
            user_id: user_id.to_string(),
            username: username.trim().to_string(),
            comment: text.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        let comments = self.db.append_comment(video_id, comment).await?;
        tracing::debug!(
            video = video_id,
            user = user_id,
            count = comments.len(),
            "Comment added"
        );
        Ok(comments)
    }
}
