// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Vidshare: a small video-sharing backend.
//!
//! Users register and log in, upload videos with thumbnails, vote on them
//! and leave comments. All state is kept in flat JSON documents on disk.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::JsonDb;
use error::AppError;
use services::{
    CommentService, IdentityService, MediaStorage, SessionStore, VideoCatalog, VotingService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: JsonDb,
    pub sessions: SessionStore,
    pub identity: IdentityService,
    pub media: MediaStorage,
    pub catalog: VideoCatalog,
    pub voting: VotingService,
    pub comments: CommentService,
}

impl AppState {
    /// Open the data and upload directories described by `config`.
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = JsonDb::open(&config.data_dir).await?;
        let media = MediaStorage::new(&config.upload_dir, config.max_upload_bytes).await?;

        Ok(Self {
            identity: IdentityService::new(db.clone()),
            catalog: VideoCatalog::new(db.clone()),
            voting: VotingService::new(db.clone()),
            comments: CommentService::new(db.clone()),
            sessions: SessionStore::new(),
            media,
            db,
            config,
        })
    }
}
