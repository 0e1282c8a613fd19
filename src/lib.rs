// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shifty web: session and sign-in layer for the Shifty scheduling site
//!
//! This crate serves the page data of the Shifty site, keeps the caller's
//! bearer token in a signed session cookie, and resolves that token to a
//! user through the remote Shifty auth API.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{AuthApiClient, SessionStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub auth_api: AuthApiClient,
}

impl AppState {
    /// Build the state from configuration.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let sessions = SessionStore::new(config.session.clone())?;
        let auth_api = AuthApiClient::new(&config)?;

        Ok(Self {
            config,
            sessions,
            auth_api,
        })
    }
}
