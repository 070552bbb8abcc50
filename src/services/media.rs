// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk storage for uploaded videos and thumbnails.
//!
//! Files are routed by their declared media type: `image/*` goes to the
//! thumbnail directory, everything else (including no type at all) to the
//! video directory. Each file is renamed to `<epoch millis><.ext>`.

use crate::error::AppError;
use axum::extract::multipart::Field;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Public URL prefix under which the upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Upper bound on name-clash retries for a single file.
const MAX_NAME_ATTEMPTS: i64 = 1000;

/// Which directory a file belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl MediaKind {
    /// Classify a file by its declared content type.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image") => MediaKind::Thumbnail,
            _ => MediaKind::Video,
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::Thumbnail => "thumbnails",
        }
    }
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub kind: MediaKind,
    pub path: PathBuf,
    /// URL under which the static file server exposes this file
    pub public_url: String,
    pub size: u64,
}

/// Manages the video and thumbnail directories.
#[derive(Clone)]
pub struct MediaStorage {
    root: PathBuf,
    /// Per-file size cap
    max_file_bytes: u64,
}

impl MediaStorage {
    /// Create the storage, making sure both media directories exist.
    pub async fn new(root: impl Into<PathBuf>, max_file_bytes: u64) -> Result<Self, AppError> {
        let storage = Self {
            root: root.into(),
            max_file_bytes,
        };
        for kind in [MediaKind::Video, MediaKind::Thumbnail] {
            fs::create_dir_all(storage.dir(kind)).await?;
        }
        tracing::info!(
            root = %storage.root.display(),
            max_file_bytes,
            "Media storage ready"
        );
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Directory for a media kind.
    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Create a new empty file for `original_name`, never overwriting an existing one.
    pub async fn create(
        &self,
        kind: MediaKind,
        original_name: Option<&str>,
    ) -> Result<(fs::File, StoredFile), AppError> {
        let ext = extension_of(original_name);
        let dir = self.dir(kind);
        let base = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}{}", base + attempt, ext);
            let path = dir.join(&file_name);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    let stored = StoredFile {
                        kind,
                        path,
                        public_url: format!("{}/{}/{}", PUBLIC_PREFIX, kind.dir_name(), file_name),
                        size: 0,
                    };
                    return Ok((file, stored));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Storage(format!(
            "No free file name in {} after {} attempts",
            dir.display(),
            MAX_NAME_ATTEMPTS
        )))
    }

    /// Stream a multipart file field to disk.
    ///
    /// Each file may hold at most `max_file_bytes`. A partially written file
    /// is removed if the stream or the write fails or the cap is exceeded.
    pub async fn store_field(&self, mut field: Field<'_>) -> Result<StoredFile, AppError> {
        let kind = MediaKind::from_content_type(field.content_type());
        let original_name = field.file_name().map(str::to_string);
        let (mut file, mut stored) = self.create(kind, original_name.as_deref()).await?;

        let result = async {
            let mut size = 0u64;
            while let Some(chunk) = field.chunk().await? {
                size += chunk.len() as u64;
                if size > self.max_file_bytes {
                    return Err(AppError::FileTooLarge(self.max_file_bytes));
                }
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok::<u64, AppError>(size)
        }
        .await;

        match result {
            Ok(size) => {
                stored.size = size;
                tracing::debug!(
                    path = %stored.path.display(),
                    size,
                    kind = kind.dir_name(),
                    "Stored uploaded file"
                );
                Ok(stored)
            }
            Err(e) => {
                drop(file);
                self.discard(std::slice::from_ref(&stored)).await;
                Err(e)
            }
        }
    }

    /// Best-effort removal of files written for a failed request.
    pub async fn discard(&self, files: &[StoredFile]) {
        for stored in files {
            match fs::remove_file(&stored.path).await {
                Ok(()) => tracing::debug!(path = %stored.path.display(), "Discarded upload"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %stored.path.display(), error = %e, "Failed to discard upload")
                }
            }
        }
    }
}

/// `.ext` of a client-supplied file name, or an empty string.
fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
