// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page data for the home page.

use crate::middleware::auth::CurrentUser;
use crate::models::User;
use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    // The home page carries the same sign-in form as /login.
    Router::new().route("/", get(index).post(super::auth::login_action))
}

/// Home page data.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IndexData {
    pub user: Option<User>,
}

async fn index(CurrentUser(user): CurrentUser) -> Json<IndexData> {
    Json(IndexData { user })
}
