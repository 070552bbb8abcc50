// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling.

use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use std::sync::Arc;

/// Page unauthenticated visitors are sent to.
pub const LOGIN_PAGE: &str = "/auth.html";

/// Nickname of the logged-in user, if the request carries a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity(pub Option<String>);

impl SessionIdentity {
    pub fn nickname(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<Arc<AppState>> for SessionIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionIdentity(current_nickname(parts, state)))
    }
}

/// Nickname of the logged-in user; visitors without a session are redirected to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireSession(pub String);

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match current_nickname(parts, state) {
            Some(nickname) => Ok(RequireSession(nickname)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "No session, redirecting to login");
                Err(Redirect::to(LOGIN_PAGE))
            }
        }
    }
}

/// Resolve the session cookie, if any, to a nickname.
fn current_nickname(parts: &Parts, state: &AppState) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(&state.config.session_cookie_name)
        .and_then(|cookie| state.sessions.resolve(cookie.value()))
}

/// Cookie carrying a freshly created session id.
pub fn session_cookie(state: &AppState, session_id: String) -> Cookie<'static> {
    Cookie::build((state.config.session_cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .build()
}

/// Cookie matching [`session_cookie`]'s attributes, for removal.
pub fn removal_cookie(state: &AppState) -> Cookie<'static> {
    Cookie::build(state.config.session_cookie_name.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .build()
}
