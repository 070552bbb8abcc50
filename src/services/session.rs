// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side session store.
//!
//! Maps opaque session ids (sent to the browser as a cookie) to the
//! nickname that logged in. Sessions live for the lifetime of the process.

use crate::error::AppError;
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;

const SESSION_ID_BYTES: usize = 32;

/// In-memory session table shared across requests.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, String>>,
    rng: SystemRandom,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            rng: SystemRandom::new(),
        }
    }

    /// Start a session for `nickname` and return its id.
    pub fn create(&self, nickname: &str) -> Result<String, AppError> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        self.rng.fill(&mut bytes).map_err(|_| {
            AppError::Internal(anyhow::anyhow!("Failed to generate session id"))
        })?;
        let id = hex::encode(bytes);

        self.sessions.insert(id.clone(), nickname.to_string());
        Ok(id)
    }

    /// Nickname bound to a session id.
    pub fn resolve(&self, session_id: &str) -> Option<String> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// End a session, returning the nickname it belonged to.
    pub fn remove(&self, session_id: &str) -> Option<String> {
        self.sessions.remove(session_id).map(|(_, nickname)| nickname)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
