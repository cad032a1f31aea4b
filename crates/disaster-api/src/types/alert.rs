//! Alert dispatch request.

use serde::{Deserialize, Serialize};

use super::user::Recipient;

/// Body of `POST /admin/send-alert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    /// Serialized rich-text body.
    pub html_content: String,
    /// Email subject line.
    pub subject: String,
    /// Full recipient objects, not just ids.
    pub users: Vec<Recipient>,
}

impl AlertRequest {
    /// Create a new alert request.
    pub fn new(
        subject: impl Into<String>,
        html_content: impl Into<String>,
        users: Vec<Recipient>,
    ) -> Self {
        Self {
            html_content: html_content.into(),
            subject: subject.into(),
            users,
        }
    }
}
