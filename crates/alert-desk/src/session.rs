//! Session context injected into the view at startup.

use serde::Serialize;

/// Whether the operator has logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub is_authenticated: bool,
}

impl SessionContext {
    /// Logged-out context.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logged-in context.
    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
        }
    }
}
