// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the remote Shifty auth API.
//!
//! Handles:
//! - Token validation (`GET /auth`)
//! - Sign-in (`POST /auth/login`)
//! - Registration (`POST /auth/register`)
//!
//! Calls are never retried. A failed call is reported to the caller, which
//! decides whether it means "log out" or "show an error on the form".

use crate::config::Config;
use crate::models::{LoginForm, User};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;

/// Auth API errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthApiError {
    #[error("Auth API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Auth API returned HTTP {status}")]
    Rejected {
        status: u16,
        /// `message` field of the error body, when there was one
        message: Option<String>,
    },

    #[error("Unexpected auth API response: {0}")]
    MalformedResponse(String),
}

/// Reply to a login or registration request.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenReply {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: bool,
}

/// Error body of a non-success reply.
///
/// `message` is usually a string, but validation failures may carry a list
/// of strings instead.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let text = match self.message? {
            Value::String(s) => s,
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => return None,
        };
        Some(text).filter(|t| !t.is_empty())
    }
}

/// Operations offered by the remote auth service.
pub trait AuthApi {
    /// Resolve a bearer token to its user. The returned user has not been
    /// validated yet.
    fn validate_token(&self, token: &str)
        -> impl Future<Output = Result<User, AuthApiError>> + Send;

    /// Exchange credentials for a token.
    fn login(
        &self,
        form: &LoginForm,
    ) -> impl Future<Output = Result<TokenReply, AuthApiError>> + Send;

    /// Create an account from every submitted field.
    fn register(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<TokenReply, AuthApiError>> + Send;
}

/// HTTP implementation of [`AuthApi`].
#[derive(Clone)]
pub struct AuthApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthApiClient {
    /// Create a client for the configured auth API.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.auth_api_timeout)
            .build()
            .context("failed building auth API HTTP client")?;

        tracing::info!(
            base_url = %config.auth_api_url,
            timeout_secs = config.auth_api_timeout.as_secs(),
            "Initialized auth API client"
        );

        Ok(Self {
            http,
            base_url: config.auth_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST a JSON body and parse the token reply.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<TokenReply, AuthApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        let response = check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| AuthApiError::MalformedResponse(e.to_string()))
    }
}

impl AuthApi for AuthApiClient {
    async fn validate_token(&self, token: &str) -> Result<User, AuthApiError> {
        let url = format!("{}/auth", self.base_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let response = check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| AuthApiError::MalformedResponse(e.to_string()))
    }

    async fn login(&self, form: &LoginForm) -> Result<TokenReply, AuthApiError> {
        self.submit("/auth/login", form).await
    }

    async fn register(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> Result<TokenReply, AuthApiError> {
        self.submit("/auth/register", fields).await
    }
}

/// Pass successful responses through, turn the rest into `Rejected`.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AuthApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message);

    tracing::debug!(status = status.as_u16(), "Auth API rejected request");

    Err(AuthApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
