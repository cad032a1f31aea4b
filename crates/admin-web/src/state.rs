//! Application state shared across handlers.

use std::sync::Arc;

use alert_desk::{Composer, Dispatcher, MarkupError, Notification, RosterStore, SessionContext};
use disaster_api::{AlertApi, AlertClient, ApiConfig};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;

/// The single composition session this console serves.
///
/// Guarded by a mutex that is never held across a backend call.
#[derive(Debug)]
pub struct Console {
    /// Login state, injected at startup and flipped by login/logout.
    pub session: SessionContext,
    /// Roster and selection.
    pub store: RosterStore,
    /// Alert draft.
    pub composer: Composer,
    /// Whether the compose modal is open.
    pub modal_open: bool,
    /// Toasts waiting for the next render.
    pub toasts: Vec<Notification>,
}

impl Console {
    /// Fresh console with the default draft.
    pub fn new(subject: &str, session: SessionContext) -> std::result::Result<Self, MarkupError> {
        Ok(Self {
            session,
            store: RosterStore::new(),
            composer: Composer::new(subject)?,
            modal_open: false,
            toasts: Vec::new(),
        })
    }

    /// Drop roster, selection and edits; keep the subject line.
    pub fn reset(&mut self) -> std::result::Result<(), MarkupError> {
        self.store.clear();
        self.composer.reset()?;
        self.modal_open = false;
        self.toasts.clear();
        Ok(())
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Disaster-alert backend.
    pub api: Arc<dyn AlertApi>,
    /// Console session.
    pub console: Arc<Mutex<Console>>,
    /// Single-flight alert sender.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state.
    pub fn new(api: Arc<dyn AlertApi>, subject: &str, session: SessionContext) -> Result<Self> {
        Ok(Self {
            api,
            console: Arc::new(Mutex::new(Console::new(subject, session)?)),
            dispatcher: Dispatcher::new(),
        })
    }

    /// Build state with an HTTP backend client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_config = ApiConfig::new(config.api_url.as_str()).with_timeout(config.api_timeout);
        let client = AlertClient::new(api_config)?;
        let session = if config.assume_logged_in {
            SessionContext::authenticated()
        } else {
            SessionContext::anonymous()
        };
        Self::new(Arc::new(client), &config.subject, session)
    }
}
