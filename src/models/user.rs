//! Identity returned by the auth API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// User resolved from a session token.
///
/// Lives for a single request; never stored by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Auth service user ID
    #[validate(length(min = 1, message = "User id is required"))]
    pub id: String,
    /// Account email
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Current subscription
    #[validate(length(min = 1, message = "Subscription id is required"))]
    pub subscription_id: String,
}
