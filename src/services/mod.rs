// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session and auth API logic.

pub mod account;
pub mod auth_api;
pub mod session;

pub use account::SubmissionOutcome;
pub use auth_api::{AuthApi, AuthApiClient, AuthApiError, TokenReply};
pub use session::{SessionError, SessionStore};
