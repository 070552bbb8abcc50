// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod comment;
pub mod user;
pub mod video;
pub mod vote;

pub use comment::Comment;
pub use user::User;
pub use video::Video;
pub use vote::{UserVoteView, VoteKind, VoteRecord, VoteTally, VoteTransition};
