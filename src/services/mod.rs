// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod comments;
pub mod identity;
pub mod media;
pub mod session;
pub mod voting;

pub use catalog::VideoCatalog;
pub use comments::CommentService;
pub use identity::IdentityService;
pub use media::{MediaKind, MediaStorage, StoredFile};
pub use session::SessionStore;
pub use voting::VotingService;
