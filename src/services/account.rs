// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and registration submissions.
//!
//! Forms are validated locally first; only valid forms reach the auth API.
//! A token in a successful reply is written to the session.

use crate::models::{field_errors, FieldErrors, LoginForm, RegisterForm};
use crate::services::auth_api::{AuthApi, AuthApiError, TokenReply};
use crate::services::session::SessionStore;
use axum::http::{HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use validator::Validate;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration request failed";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Result of a login or registration submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The auth API refused, or answered with something unusable.
    Failed { message: String },
    /// Signed in; send `set_cookie` and go home.
    Authenticated { set_cookie: HeaderValue },
}

/// Handle a login form.
pub async fn login<A: AuthApi>(
    sessions: &SessionStore,
    api: &A,
    headers: &HeaderMap,
    fields: &BTreeMap<String, String>,
) -> SubmissionOutcome {
    let form = LoginForm::from_fields(fields);
    if let Err(errors) = form.validate() {
        return SubmissionOutcome::Invalid(field_errors(&errors));
    }

    let reply = api.login(&form).await;
    finish(sessions, headers, reply, LOGIN_FAILED_MESSAGE)
}

/// Handle a registration form. Every submitted field is forwarded once the
/// email and password pass.
pub async fn register<A: AuthApi>(
    sessions: &SessionStore,
    api: &A,
    headers: &HeaderMap,
    fields: &BTreeMap<String, String>,
) -> SubmissionOutcome {
    if let Err(errors) = RegisterForm::from_fields(fields).validate() {
        return SubmissionOutcome::Invalid(field_errors(&errors));
    }

    let reply = api.register(fields).await;
    finish(sessions, headers, reply, REGISTER_FAILED_MESSAGE)
}

fn finish(
    sessions: &SessionStore,
    headers: &HeaderMap,
    reply: Result<TokenReply, AuthApiError>,
    rejected_message: &str,
) -> SubmissionOutcome {
    let reply = match reply {
        Ok(reply) => reply,
        Err(AuthApiError::Rejected { status, message }) => {
            tracing::info!(status, "Auth API refused submission");
            return SubmissionOutcome::Failed {
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| rejected_message.to_string()),
            };
        }
        Err(err) => {
            tracing::warn!(error = %err, "Auth API submission failed");
            return unexpected();
        }
    };

    if reply.error {
        return SubmissionOutcome::Failed {
            message: reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| rejected_message.to_string()),
        };
    }

    let Some(token) = reply.access_token.filter(|t| !t.is_empty()) else {
        tracing::warn!("Auth API reply carried no access token");
        return unexpected();
    };

    match sessions.set_token(headers, &token) {
        Ok(set_cookie) => SubmissionOutcome::Authenticated { set_cookie },
        Err(err) => {
            tracing::error!(error = %err, "Failed to write session cookie");
            unexpected()
        }
    }
}

fn unexpected() -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        message: UNEXPECTED_ERROR_MESSAGE.to_string(),
    }
}
