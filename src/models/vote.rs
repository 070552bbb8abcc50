// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Like/dislike aggregates per video.
//!
//! Each `(video, user)` pair is in one of three states: no vote, liked or
//! disliked. Repeating the current vote clears it; voting the other way
//! switches it. The `likes`/`dislikes` counters always equal the number of
//! users holding the respective vote.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single user's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

/// What a call to [`VoteRecord::apply`] did to the user's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// none → kind
    Added,
    /// kind → none
    Removed,
    /// other kind → kind
    Switched,
}

/// Vote state for one video, stored in `votes.json` keyed by video id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    /// User id → current vote
    #[serde(default)]
    pub users: BTreeMap<String, VoteKind>,
}

impl VoteRecord {
    /// Apply a like or dislike from `user_id` using toggle semantics.
    pub fn apply(&mut self, user_id: &str, kind: VoteKind) -> VoteTransition {
        match self.users.get(user_id).copied() {
            Some(current) if current == kind => {
                *self.counter_mut(kind) = self.counter(kind).saturating_sub(1);
                self.users.remove(user_id);
                VoteTransition::Removed
            }
            Some(other) => {
                *self.counter_mut(other) = self.counter(other).saturating_sub(1);
                *self.counter_mut(kind) += 1;
                self.users.insert(user_id.to_string(), kind);
                VoteTransition::Switched
            }
            None => {
                *self.counter_mut(kind) += 1;
                self.users.insert(user_id.to_string(), kind);
                VoteTransition::Added
            }
        }
    }

    /// Aggregate counts without per-user state.
    pub fn tally(&self) -> VoteTally {
        VoteTally {
            likes: self.likes,
            dislikes: self.dislikes,
        }
    }

    /// Aggregate counts plus the given user's own vote.
    pub fn view_for(&self, user_id: Option<&str>) -> UserVoteView {
        let vote = user_id.and_then(|id| self.users.get(id)).copied();
        UserVoteView {
            likes: self.likes,
            dislikes: self.dislikes,
            user_liked: vote == Some(VoteKind::Like),
            user_disliked: vote == Some(VoteKind::Dislike),
        }
    }

    fn counter(&self, kind: VoteKind) -> u64 {
        match kind {
            VoteKind::Like => self.likes,
            VoteKind::Dislike => self.dislikes,
        }
    }

    fn counter_mut(&mut self, kind: VoteKind) -> &mut u64 {
        match kind {
            VoteKind::Like => &mut self.likes,
            VoteKind::Dislike => &mut self.dislikes,
        }
    }
}

/// Response to a like/dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
pub struct VoteTally {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub likes: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub dislikes: u64,
}

/// Response to `GET /votes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserVoteView {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub likes: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub dislikes: u64,
    pub user_liked: bool,
    pub user_disliked: bool,
}
