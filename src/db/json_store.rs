// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON document store with typed operations.
//!
//! Each collection is a single JSON document on disk, cached in memory and
//! guarded by its own lock. Mutations run on a working copy; the copy is
//! written to a temporary file and renamed over the document before it
//! replaces the cached value, so a failed write leaves both untouched.
//!
//! Provides high-level operations for:
//! - Users (registration records)
//! - Videos (catalog entries)
//! - Votes (per-video like/dislike aggregates)
//! - Comments (per-video comment lists)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Comment, User, Video, VoteKind, VoteRecord, VoteTransition};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Votes keyed by video id.
pub type VoteBook = BTreeMap<String, VoteRecord>;
/// Comment lists keyed by video id.
pub type CommentBook = BTreeMap<String, Vec<Comment>>;

/// One JSON document plus its cached, lock-protected value.
pub struct JsonCollection<T> {
    path: PathBuf,
    state: Mutex<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Open a document, creating it with the default value if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let value = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("Corrupt document {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let value = T::default();
                write_atomic(&path, &value).await?;
                tracing::info!(path = %path.display(), "Initialized empty document");
                value
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            state: Mutex::new(value),
        })
    }

    /// Snapshot of the whole collection.
    pub async fn load(&self) -> T {
        self.state.lock().await.clone()
    }

    /// Run a read-only closure against the current value.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.state.lock().await;
        f(&guard)
    }

    /// Read-modify-write under the collection lock.
    ///
    /// `f` returns its result and whether it changed the value; unchanged
    /// values are not written back.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut T) -> Result<(R, bool), AppError>,
    ) -> Result<R, AppError> {
        let mut guard = self.state.lock().await;
        let mut working = guard.clone();
        let (result, changed) = f(&mut working)?;
        if changed {
            write_atomic(&self.path, &working).await?;
            *guard = working;
        }
        Ok(result)
    }
}

/// Serialize `value` as indented JSON and move it into place with a rename.
async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| AppError::Storage(format!("Failed to serialize {}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let mut file = tokio::fs::File::create(&tmp_path).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// The four application collections.
#[derive(Clone)]
pub struct JsonDb {
    users: Arc<JsonCollection<Vec<User>>>,
    videos: Arc<JsonCollection<Vec<Video>>>,
    votes: Arc<JsonCollection<VoteBook>>,
    comments: Arc<JsonCollection<CommentBook>>,
}

impl JsonDb {
    /// Open (or create) all collections under `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db = Self {
            users: Arc::new(JsonCollection::open(data_dir.join(collections::USERS)).await?),
            videos: Arc::new(JsonCollection::open(data_dir.join(collections::VIDEOS)).await?),
            votes: Arc::new(JsonCollection::open(data_dir.join(collections::VOTES)).await?),
            comments: Arc::new(JsonCollection::open(data_dir.join(collections::COMMENTS)).await?),
        };

        tracing::info!(data_dir = %data_dir.display(), "Opened JSON store");
        Ok(db)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// All registered users.
    pub async fn get_users(&self) -> Vec<User> {
        self.users.load().await
    }

    /// First user satisfying `matches`.
    pub async fn find_user(&self, matches: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .read(|users| users.iter().find(|u| matches(u)).cloned())
            .await
    }

    /// Append a user, rejecting duplicate nicknames first, then duplicate emails.
    pub async fn insert_user(&self, user: User) -> Result<(), AppError> {
        self.users
            .update(|users| {
                if users.iter().any(|u| u.nickname == user.nickname) {
                    return Err(AppError::DuplicateNickname);
                }
                if users.iter().any(|u| u.email == user.email) {
                    return Err(AppError::DuplicateEmail);
                }
                users.push(user);
                Ok(((), true))
            })
            .await
    }

    // ─── Video Operations ────────────────────────────────────────

    /// All videos in insertion order.
    pub async fn get_videos(&self) -> Vec<Video> {
        self.videos.load().await
    }

    /// Append a video record.
    pub async fn append_video(&self, video: Video) -> Result<(), AppError> {
        self.videos
            .update(|videos| {
                videos.push(video);
                Ok(((), true))
            })
            .await
    }

    // ─── Vote Operations ─────────────────────────────────────────

    /// Create an empty vote record for `video_id` if none exists.
    /// Returns true when a record was created.
    pub async fn ensure_votes(&self, video_id: &str) -> Result<bool, AppError> {
        self.votes
            .update(|votes| {
                if votes.contains_key(video_id) {
                    return Ok((false, false));
                }
                votes.insert(video_id.to_string(), VoteRecord::default());
                Ok((true, true))
            })
            .await
    }

    /// Current vote record for `video_id`, if any.
    pub async fn get_votes(&self, video_id: &str) -> Option<VoteRecord> {
        self.votes.read(|votes| votes.get(video_id).cloned()).await
    }

    /// Apply a vote, creating the record first if needed.
    pub async fn apply_vote(
        &self,
        video_id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<(VoteRecord, VoteTransition), AppError> {
        self.votes
            .update(|votes| {
                let record = votes.entry(video_id.to_string()).or_default();
                let transition = record.apply(user_id, kind);
                Ok(((record.clone(), transition), true))
            })
            .await
    }

    // ─── Comment Operations ──────────────────────────────────────

    /// Create an empty comment list for `video_id` if none exists.
    /// Returns true when a list was created.
    pub async fn ensure_comments(&self, video_id: &str) -> Result<bool, AppError> {
        self.comments
            .update(|comments| {
                if comments.contains_key(video_id) {
                    return Ok((false, false));
                }
                comments.insert(video_id.to_string(), Vec::new());
                Ok((true, true))
            })
            .await
    }

    /// Comments for `video_id` in insertion order (empty if none).
    pub async fn get_comments(&self, video_id: &str) -> Vec<Comment> {
        self.comments
            .read(|comments| comments.get(video_id).cloned().unwrap_or_default())
            .await
    }

    /// Append a comment and return the video's full list.
    pub async fn append_comment(
        &self,
        video_id: &str,
        comment: Comment,
    ) -> Result<Vec<Comment>, AppError> {
        self.comments
            .update(|comments| {
                let list = comments.entry(video_id.to_string()).or_default();
                list.push(comment);
                Ok((list.clone(), true))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.json");

        let collection: JsonCollection<Vec<String>> = JsonCollection::open(&path).await.unwrap();

        assert!(collection.load().await.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_update_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let collection: JsonCollection<Vec<String>> = JsonCollection::open(&path).await.unwrap();
        collection
            .update(|items| {
                items.push("first".to_string());
                Ok(((), true))
            })
            .await
            .unwrap();

        let reopened: JsonCollection<Vec<String>> = JsonCollection::open(&path).await.unwrap();
        assert_eq!(reopened.load().await, vec!["first".to_string()]);
        assert!(!dir.path().join(".items.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let collection: JsonCollection<Vec<String>> = JsonCollection::open(&path).await.unwrap();

        let result: Result<(), AppError> = collection
            .update(|items| {
                items.push("partial".to_string());
                Err(AppError::MissingField("name".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(collection.load().await.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = JsonCollection::<Vec<String>>::open(&path).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonDb::open(dir.path()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.apply_vote("v1", &format!("user{i}"), VoteKind::Like)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = db.get_votes("v1").await.unwrap();
        assert_eq!(record.likes, 20);
        assert_eq!(record.users.len(), 20);

        let reopened = JsonDb::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get_votes("v1").await.unwrap().likes, 20);
    }

    #[tokio::test]
    async fn test_insert_user_checks_nickname_before_email() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonDb::open(dir.path()).await.unwrap();
        let user = User {
            email: "a@x.com".to_string(),
            nickname: "alice".to_string(),
            password: "pw".to_string(),
            created_at: 1,
        };
        db.insert_user(user.clone()).await.unwrap();

        // Both fields collide: nickname wins.
        let err = db.insert_user(user.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateNickname));

        let err = db
            .insert_user(User {
                nickname: "alice2".to_string(),
                ..user
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(db.get_users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonDb::open(dir.path()).await.unwrap();

        assert!(db.ensure_comments("v1").await.unwrap());
        assert!(!db.ensure_comments("v1").await.unwrap());
        assert!(db.ensure_votes("v1").await.unwrap());
        assert!(!db.ensure_votes("v1").await.unwrap());

        let raw = std::fs::read_to_string(dir.path().join(collections::COMMENTS)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!({"v1": []}));
    }
}
