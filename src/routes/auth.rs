// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration and logout routes.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{CurrentUser, SessionRedirect};
use crate::models::ActionData;
use crate::services::account::{self, SubmissionOutcome};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(guest_page).post(login_action))
        .route("/register", get(guest_page).post(register_action))
        .route("/logout", post(logout))
}

type FormFields = std::result::Result<Form<BTreeMap<String, String>>, FormRejection>;

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        match self {
            SubmissionOutcome::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ActionData::invalid(errors)),
            )
                .into_response(),
            SubmissionOutcome::Failed { message } => {
                (StatusCode::BAD_REQUEST, Json(ActionData::failed(message))).into_response()
            }
            SubmissionOutcome::Authenticated { set_cookie } => {
                SessionRedirect::home(set_cookie).into_response()
            }
        }
    }
}

/// Login and registration pages: signed-in users are sent home.
async fn guest_page(CurrentUser(user): CurrentUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    Json(serde_json::json!({})).into_response()
}

/// Login form submission.
pub(super) async fn login_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: FormFields,
) -> Result<SubmissionOutcome> {
    let Form(fields) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let outcome = account::login(&state.sessions, &state.auth_api, &headers, &fields).await;
    log_outcome("login", &outcome);
    Ok(outcome)
}

/// Registration form submission.
async fn register_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: FormFields,
) -> Result<SubmissionOutcome> {
    let Form(fields) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let outcome = account::register(&state.sessions, &state.auth_api, &headers, &fields).await;
    log_outcome("register", &outcome);
    Ok(outcome)
}

/// Logout - drop the session and go home.
async fn logout(State(state): State<Arc<AppState>>) -> SessionRedirect {
    tracing::info!("Session cleared on logout");
    SessionRedirect::home(state.sessions.clear())
}

fn log_outcome(action: &'static str, outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Invalid(errors) => tracing::debug!(
            action,
            fields = ?errors.keys().collect::<Vec<_>>(),
            "Form failed validation"
        ),
        SubmissionOutcome::Failed { message } => {
            tracing::info!(action, message = %message, "Submission refused")
        }
        SubmissionOutcome::Authenticated { .. } => {
            tracing::info!(action, "Session established")
        }
    }
}
