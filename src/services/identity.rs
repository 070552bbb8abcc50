// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login against the user collection.

use crate::db::JsonDb;
use crate::error::AppError;
use crate::models::User;
use subtle::ConstantTimeEq;

/// Service for registering users and checking credentials.
#[derive(Clone)]
pub struct IdentityService {
    db: JsonDb,
}

impl IdentityService {
    pub fn new(db: JsonDb) -> Self {
        Self { db }
    }

    /// Register a new user.
    ///
    /// Fails with `DuplicateNickname` or `DuplicateEmail`, checked in that order.
    pub async fn register(
        &self,
        email: &str,
        nickname: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let user = User {
            email: email.to_string(),
            nickname: nickname.to_string(),
            password: password.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        self.db.insert_user(user.clone()).await?;
        tracing::info!(nickname = %user.nickname, "User registered");
        Ok(user)
    }

    /// Find the user with exactly this email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .db
            .find_user(|u| {
                u.email == email && bool::from(u.password.as_bytes().ct_eq(password.as_bytes()))
            })
            .await;

        match user {
            Some(user) => {
                tracing::info!(nickname = %user.nickname, "Login succeeded");
                Ok(user)
            }
            None => {
                tracing::info!("Login rejected: invalid credentials");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> (IdentityService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonDb::open(dir.path()).await.unwrap();
        (IdentityService::new(db), dir)
    }

    #[tokio::test]
    async fn test_register_twice_with_same_nickname() {
        let (identity, _dir) = service().await;

        identity.register("a@x.com", "alice", "pw").await.unwrap();
        let err = identity
            .register("other@x.com", "alice", "pw2")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateNickname));
    }

    #[tokio::test]
    async fn test_register_sets_created_at() {
        let (identity, _dir) = service().await;
        let before = chrono::Utc::now().timestamp_millis();

        let user = identity.register("a@x.com", "alice", "pw").await.unwrap();

        assert!(user.created_at >= before);
    }

    #[tokio::test]
    async fn test_login_requires_exact_match() {
        let (identity, _dir) = service().await;
        identity.register("a@x.com", "alice", "pw").await.unwrap();

        let user = identity.login("a@x.com", "pw").await.unwrap();
        assert_eq!(user.nickname, "alice");

        for (email, password) in [("a@x.com", "PW"), ("A@x.com", "pw"), ("a@x.com", "pw "), ("", "")] {
            let err = identity.login(email, password).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials), "{email}/{password}");
        }
    }
}
