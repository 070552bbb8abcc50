// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and logout.

use crate::error::{require_field, AppError, Result};
use crate::middleware::session::{removal_cookie, session_cookie};
use crate::routes::MessageResponse;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    email: Option<String>,
    nickname: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<Json<MessageResponse>> {
    let email = require_field(req.email, "email")?;
    let nickname = require_field(req.nickname, "nickname")?;
    let password = require_field(req.password, "password")?;

    state.identity.register(&email, &nickname, &password).await?;

    Ok(MessageResponse::ok("Registration successful"))
}

/// Check credentials and start a cookie-backed session for the user's nickname.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    let email = require_field(req.email, "email")?;
    let password = require_field(req.password, "password")?;

    let user = state.identity.login(&email, &password).await?;
    let session_id = state.sessions.create(&user.nickname)?;

    Ok((
        jar.add(session_cookie(&state, session_id)),
        MessageResponse::ok("Login successful"),
    ))
}

/// Drop the server-side session and expire the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(&state.config.session_cookie_name) {
        if let Some(nickname) = state.sessions.remove(cookie.value()) {
            tracing::info!(nickname = %nickname, "Logged out");
        }
    }

    (
        jar.remove(removal_cookie(&state)),
        MessageResponse::ok("Logged out"),
    )
}
