// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage.

use serde::{Deserialize, Serialize};

/// Registered user stored in `users.json`.
///
/// Nicknames double as session identities and as vote/comment authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Email address (unique)
    pub email: String,
    /// Display name (unique)
    pub nickname: String,
    /// Password, stored as submitted
    pub password: String,
    /// Registration time (epoch millis)
    pub created_at: i64,
}
