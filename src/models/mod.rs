// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod forms;
pub mod user;

pub use forms::{field_errors, ActionData, FieldErrors, LoginForm, RegisterForm};
pub use user::User;
