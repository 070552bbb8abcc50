// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Like/dislike voting.

use crate::db::JsonDb;
use crate::error::AppError;
use crate::models::{UserVoteView, VoteKind, VoteTally};

/// Service applying toggle-style votes per `(video, user)` pair.
#[derive(Clone)]
pub struct VotingService {
    db: JsonDb,
}

impl VotingService {
    pub fn new(db: JsonDb) -> Self {
        Self { db }
    }

    /// Apply a like or dislike and return the new aggregate.
    pub async fn cast(
        &self,
        video_id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<VoteTally, AppError> {
        let (record, transition) = self.db.apply_vote(video_id, user_id, kind).await?;

        tracing::debug!(
            video = video_id,
            user = user_id,
            ?kind,
            ?transition,
            likes = record.likes,
            dislikes = record.dislikes,
            "Vote applied"
        );

        Ok(record.tally())
    }

    /// Aggregate for a video plus the given user's vote.
    ///
    /// The video's record is created (and persisted) on first access.
    pub async fn get_votes(
        &self,
        video_id: &str,
        user_id: Option<&str>,
    ) -> Result<UserVoteView, AppError> {
        if self.db.ensure_votes(video_id).await? {
            tracing::debug!(video = video_id, "Initialized vote record");
        }

        let record = self.db.get_votes(video_id).await.unwrap_or_default();
        Ok(record.view_for(user_id))
    }
}
