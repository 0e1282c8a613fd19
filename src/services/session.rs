// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed cookie session holding the caller's bearer token.
//!
//! The cookie value is `base64url(json) "." base64url(hmac_sha256(payload))`.
//! There is no server-side session state: every read decodes the request's
//! cookie and every write produces a complete `Set-Cookie` value.

use crate::config::SessionConfig;
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Session field holding the bearer token.
pub const TOKEN_FIELD: &str = "userToken";

type SessionData = Map<String, Value>;

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("At least one session secret is required")]
    NoSecrets,

    #[error("Invalid session cookie name: {0:?}")]
    InvalidCookieName(String),

    #[error("Invalid session signing key")]
    Key,

    #[error("Session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Session cookie is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Reads and writes the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    config: SessionConfig,
    cleared: HeaderValue,
}

impl SessionStore {
    /// Create a store, rejecting configurations that could never produce a
    /// usable cookie.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        if config.secrets.iter().all(|s| s.is_empty()) {
            return Err(SessionError::NoSecrets);
        }
        if !is_cookie_name(&config.cookie_name) {
            return Err(SessionError::InvalidCookieName(config.cookie_name));
        }

        let removal = Cookie::build((config.cookie_name.clone(), ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(config.secure)
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build();
        let cleared = HeaderValue::from_str(&removal.to_string())?;

        Ok(Self { config, cleared })
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Token stored in the request's session, if any.
    ///
    /// A missing, malformed or badly signed cookie reads as an empty session.
    pub fn get_token(&self, headers: &HeaderMap) -> Option<String> {
        self.load(headers)
            .get(TOKEN_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Store `token` in the session and return the `Set-Cookie` value to
    /// send back. Other fields of a valid incoming session are kept.
    pub fn set_token(&self, headers: &HeaderMap, token: &str) -> Result<HeaderValue, SessionError> {
        let mut session = self.load(headers);
        session.insert(TOKEN_FIELD.to_string(), Value::String(token.to_string()));

        let value = self.sign(&serde_json::to_vec(&session)?)?;
        let cookie = Cookie::build((self.config.cookie_name.clone(), value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.config.secure)
            .build();

        Ok(HeaderValue::from_str(&cookie.to_string())?)
    }

    /// `Set-Cookie` value that removes the session.
    pub fn clear(&self) -> HeaderValue {
        self.cleared.clone()
    }

    fn load(&self, headers: &HeaderMap) -> SessionData {
        let jar = CookieJar::from_headers(headers);
        jar.get(&self.config.cookie_name)
            .and_then(|cookie| self.unsign(cookie.value()))
            .unwrap_or_default()
    }

    fn sign(&self, json: &[u8]) -> Result<String, SessionError> {
        let secret = self
            .config
            .secrets
            .iter()
            .find(|s| !s.is_empty())
            .ok_or(SessionError::NoSecrets)?;

        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SessionError::Key)?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    fn unsign(&self, value: &str) -> Option<SessionData> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let verified = self
            .config
            .secrets
            .iter()
            .filter(|s| !s.is_empty())
            .any(|secret| {
                HmacSha256::new_from_slice(secret.as_bytes())
                    .map(|mut mac| {
                        mac.update(payload.as_bytes());
                        mac.verify_slice(&signature).is_ok()
                    })
                    .unwrap_or(false)
            });

        if !verified {
            tracing::debug!(
                cookie = %self.config.cookie_name,
                "Session cookie signature mismatch, ignoring cookie"
            );
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// RFC 6265 cookie-name token: visible ASCII minus separators.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}
