// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in and registration forms with their local validation rules.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors};

/// Characters that satisfy the registration "special character" rule.
pub const PASSWORD_SPECIAL_CHARS: &str = "@$+/!%*?&";

/// Field name to every message that field failed with.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Login form as submitted.
#[derive(Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    /// Pick the login fields out of a submitted form. Missing fields are
    /// empty so validation reports them.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        Self {
            email: field(fields, "email"),
            password: field(fields, "password"),
        }
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form as submitted.
#[derive(Clone, Validate)]
pub struct RegisterForm {
    #[validate(
        length(min = 1, message = "Your email address is required"),
        email(message = "Your email address is invalid")
    )]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "has_uppercase"),
        custom(function = "has_lowercase"),
        custom(function = "has_digit"),
        custom(function = "has_special_char")
    )]
    pub password: String,
}

impl RegisterForm {
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        Self {
            email: field(fields, "email"),
            password: field(fields, "password"),
        }
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn field(fields: &BTreeMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn rule(
    value: &str,
    code: &'static str,
    message: &'static str,
    pred: impl Fn(char) -> bool,
) -> Result<(), ValidationError> {
    if value.chars().any(pred) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    Err(err)
}

fn has_uppercase(value: &str) -> Result<(), ValidationError> {
    rule(
        value,
        "uppercase",
        "Password must contain at least one uppercase letter",
        |c| c.is_ascii_uppercase(),
    )
}

fn has_lowercase(value: &str) -> Result<(), ValidationError> {
    rule(
        value,
        "lowercase",
        "Password must contain at least one lowercase letter",
        |c| c.is_ascii_lowercase(),
    )
}

fn has_digit(value: &str) -> Result<(), ValidationError> {
    rule(
        value,
        "digit",
        "Password must contain at least one digit",
        |c| c.is_ascii_digit(),
    )
}

fn has_special_char(value: &str) -> Result<(), ValidationError> {
    rule(
        value,
        "special",
        "Password must contain at least one special character",
        |c| PASSWORD_SPECIAL_CHARS.contains(c),
    )
}

/// Flatten validator output into field -> messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(name, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (name.to_string(), messages)
        })
        .collect()
}

/// JSON body returned by a form action that did not sign the user in.
#[derive(Debug, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionData {
    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("email".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ])
    }

    #[test]
    fn test_register_password_missing_uppercase_and_special() {
        let errors = RegisterForm::from_fields(&form("a@b.com", "abc12345"))
            .validate()
            .unwrap_err();
        let errors = field_errors(&errors);

        let password = &errors["password"];
        assert_eq!(password.len(), 2, "got {password:?}");
        assert!(password.iter().any(|m| m.contains("uppercase")));
        assert!(password.iter().any(|m| m.contains("special character")));
        assert!(!errors.contains_key("email"));
    }

    #[test]
    fn test_register_strong_password_passes() {
        assert!(RegisterForm::from_fields(&form("a@b.com", "Abc123$5"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_register_reports_every_failing_rule() {
        let errors = RegisterForm::from_fields(&form("", "")).validate().unwrap_err();
        let errors = field_errors(&errors);

        // Length plus the four character-class rules.
        assert_eq!(errors["password"].len(), 5);
        assert!(errors["email"]
            .iter()
            .any(|m| m == "Your email address is required"));
    }

    #[test]
    fn test_login_requires_valid_email_and_password() {
        let errors = LoginForm::from_fields(&BTreeMap::new())
            .validate()
            .unwrap_err();
        let errors = field_errors(&errors);
        assert_eq!(errors["email"], vec!["Invalid email address"]);
        assert_eq!(errors["password"], vec!["Password is required"]);

        assert!(LoginForm::from_fields(&form("a@b.com", "secret123"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let login = LoginForm::from_fields(&form("a@b.com", "secret123"));
        assert!(!format!("{login:?}").contains("secret123"));
    }

    #[test]
    fn test_action_data_shape() {
        let failed = serde_json::to_value(ActionData::failed("bad credentials")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"error": true, "message": "bad credentials"})
        );

        let invalid = serde_json::to_value(ActionData::invalid(FieldErrors::from([(
            "email".to_string(),
            vec!["Invalid email address".to_string()],
        )])))
        .unwrap();
        assert_eq!(
            invalid,
            serde_json::json!({"errors": {"email": ["Invalid email address"]}})
        );
    }
}
