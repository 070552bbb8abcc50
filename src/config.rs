// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default upper bound for a single upload request (10 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// Default name of the session cookie.
pub const DEFAULT_SESSION_COOKIE: &str = "vidshare_sid";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Directory holding the JSON documents (users, videos, votes, comments)
    pub data_dir: PathBuf,
    /// Directory holding uploaded media, served under `/uploads`
    pub upload_dir: PathBuf,
    /// Directory holding the static HTML pages
    pub public_dir: PathBuf,
    /// Maximum accepted request body size for uploads
    pub max_upload_bytes: u64,
    /// Name of the cookie carrying the session id
    pub session_cookie_name: String,
    /// Whether session cookies are marked `Secure`
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES", raw))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            max_upload_bytes,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
        })
    }

    /// Config for tests, rooted at the given directory.
    pub fn test_default(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            port: 3000,
            data_dir: root.join("data"),
            upload_dir: root.join("uploads"),
            public_dir: root.join("public"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_secure: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "4100");
        env::set_var("DATA_DIR", "/tmp/vidshare-data");
        env::set_var("MAX_UPLOAD_BYTES", "2048");
        env::set_var("COOKIE_SECURE", "true");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 4100);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vidshare-data"));
        assert_eq!(config.max_upload_bytes, 2048);
        assert!(config.cookie_secure);

        env::set_var("MAX_UPLOAD_BYTES", "lots");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("MAX_UPLOAD_BYTES", _)));

        for var in ["PORT", "DATA_DIR", "MAX_UPLOAD_BYTES", "COOKIE_SECURE"] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_upload_limit_is_ten_gib() {
        let config = Config::test_default("/tmp/root");
        assert_eq!(config.max_upload_bytes, 10_737_418_240);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/root/uploads"));
    }
}
