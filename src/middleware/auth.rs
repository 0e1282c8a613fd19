// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-to-user resolution.
//!
//! A request either has no session (anonymous), a session whose token the
//! auth API accepts, or a session that must be wiped. The last case never
//! reaches a page handler: the caller is sent home with the session cleared.

use crate::models::User;
use crate::services::{AuthApi, SessionStore};
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use validator::Validate;

/// Outcome of resolving a request's session.
#[derive(Debug)]
pub enum Resolution {
    Resolved(User),
    Anonymous,
    ForceLogout(SessionRedirect),
}

/// Redirect that also replaces the session cookie.
#[derive(Debug, Clone)]
pub struct SessionRedirect {
    pub location: String,
    pub set_cookie: HeaderValue,
}

impl SessionRedirect {
    /// Redirect to the home page.
    pub fn home(set_cookie: HeaderValue) -> Self {
        Self {
            location: "/".to_string(),
            set_cookie,
        }
    }
}

impl IntoResponse for SessionRedirect {
    fn into_response(self) -> Response {
        (
            [(header::SET_COOKIE, self.set_cookie)],
            Redirect::to(&self.location),
        )
            .into_response()
    }
}

/// Resolve the caller from the session cookie.
///
/// No token means anonymous and no remote call. Any failure to turn a token
/// into a valid user clears the session.
pub async fn resolve_optional_user<A: AuthApi>(
    sessions: &SessionStore,
    api: &A,
    headers: &HeaderMap,
) -> Resolution {
    let Some(token) = sessions.get_token(headers) else {
        return Resolution::Anonymous;
    };

    let failure = match api.validate_token(&token).await {
        Ok(user) => match user.validate() {
            Ok(()) => return Resolution::Resolved(user),
            Err(errors) => errors.to_string(),
        },
        Err(err) => err.to_string(),
    };

    tracing::warn!(reason = %failure, "Session token rejected, forcing logout");
    Resolution::ForceLogout(SessionRedirect::home(sessions.clear()))
}

/// The signed-in user, if any.
///
/// Rejects with a home redirect that clears the session when the stored
/// token no longer resolves.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = SessionRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve_optional_user(&state.sessions, &state.auth_api, &parts.headers).await {
            Resolution::Resolved(user) => {
                tracing::debug!(user_id = %user.id, "Resolved session user");
                Ok(CurrentUser(Some(user)))
            }
            Resolution::Anonymous => Ok(CurrentUser(None)),
            Resolution::ForceLogout(redirect) => Err(redirect),
        }
    }
}
