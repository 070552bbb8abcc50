// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single comment on a video, stored in insertion order per video id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: String,
    /// Display name, trimmed of surrounding whitespace
    pub username: String,
    pub comment: String,
    /// Epoch millis
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
}
