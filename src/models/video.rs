// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video catalog entry.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Uploaded video as stored in `videos.json`.
///
/// Records have no id; clients address them by position or by media path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "public/generated/")
)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Nickname of the uploader, absent for anonymous uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Public URL of the video file
    pub video: String,
    /// Public URL of the thumbnail image
    pub thumbnail: String,
}
