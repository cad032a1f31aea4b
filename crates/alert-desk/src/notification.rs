//! User-visible notifications (toasts).

use serde::Serialize;

/// Shown when the roster fetch fails.
pub const FETCH_USERS_FAILED: &str = "Failed to fetch users";
/// Shown when the backend accepts an alert.
pub const EMAIL_SENT: &str = "Email sent successfully";
/// Shown when an alert send fails.
pub const EMAIL_FAILED: &str = "Failed to send email";
/// Shown when the backend rejects a login.
pub const LOGIN_FAILED: &str = "Login failed";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    /// Success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    /// Error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// Whether this is an error toast.
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}
