// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. The session settings are handed to
//! [`crate::services::SessionStore`] explicitly rather than read from the
//! environment at cookie time.

use std::env;
use std::time::Duration;

/// Default cookie name for the session.
pub const DEFAULT_SESSION_COOKIE: &str = "__session";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Base URL of the Shifty auth API (no trailing slash)
    pub auth_api_url: String,
    /// Timeout applied to every auth API call
    pub auth_api_timeout: Duration,
    /// Session cookie settings
    pub session: SessionConfig,
}

/// Settings for the signed session cookie.
#[derive(Clone)]
pub struct SessionConfig {
    /// Cookie name
    pub cookie_name: String,
    /// Signing secrets, newest first. The first one signs new cookies;
    /// any of them verifies an incoming cookie.
    pub secrets: Vec<String>,
    /// Set the `Secure` attribute (production only)
    pub secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("secrets", &format_args!("[{} redacted]", self.secrets.len()))
            .field("secure", &self.secure)
            .finish()
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            auth_api_url: "http://localhost:3000".to_string(),
            auth_api_timeout: Duration::from_secs(5),
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                secrets: vec!["test_session_secret".to_string()],
                secure: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let production = env::var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let secrets = parse_secrets(
            &env::var("SESSION_SECRETS").map_err(|_| ConfigError::Missing("SESSION_SECRETS"))?,
        );
        if secrets.is_empty() {
            return Err(ConfigError::Invalid {
                name: "SESSION_SECRETS",
                reason: "at least one non-empty secret is required".to_string(),
            });
        }

        let timeout_secs = match env::var("AUTH_API_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => 10,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            auth_api_url: env::var("AUTH_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            auth_api_timeout: Duration::from_secs(timeout_secs),
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .map(|v| v.trim().to_string())
                    .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
                secrets,
                secure: production,
            },
        })
    }
}

/// Split a comma-separated secret list, dropping blanks.
fn parse_secrets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Auth API timeout in whole seconds. Zero would fail every request.
fn parse_timeout_secs(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "AUTH_API_TIMEOUT_SECS",
        reason,
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be at least 1 second".to_string())),
        Ok(secs) => Ok(secs),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
