//! Alert dispatch.
//!
//! Turns the current selection and draft into one [`AlertRequest`] and sends
//! it. Sends are single-flight per dispatcher: while a [`FlightGuard`] is
//! alive, further attempts fail with [`DispatchError::InFlight`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use disaster_api::{AlertApi, AlertRequest};
use tracing::{info, warn};

use crate::composer::AlertDraft;
use crate::error::DispatchError;
use crate::notification::{Notification, EMAIL_FAILED, EMAIL_SENT};
use crate::roster::RosterStore;

/// What the view should do after a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Toast to show.
    pub notification: Notification,
    /// Close the composition surface. Only set on success.
    pub close_modal: bool,
}

impl SendOutcome {
    fn sent() -> Self {
        Self {
            notification: Notification::success(EMAIL_SENT),
            close_modal: true,
        }
    }

    fn failed() -> Self {
        Self {
            notification: Notification::error(EMAIL_FAILED),
            close_modal: false,
        }
    }

    /// Whether the backend accepted the alert.
    pub fn is_success(&self) -> bool {
        !self.notification.is_error()
    }
}

/// Clears the in-flight flag when dropped.
#[derive(Debug)]
pub struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// A built request holding the send slot.
#[derive(Debug)]
pub struct PreparedSend {
    request: AlertRequest,
    _guard: FlightGuard,
}

impl PreparedSend {
    /// The request that will be sent.
    pub fn request(&self) -> &AlertRequest {
        &self.request
    }

    /// Perform the one backend call and release the send slot.
    ///
    /// Failures are reported through the outcome; there is no retry.
    pub async fn dispatch(self, api: &dyn AlertApi) -> SendOutcome {
        let recipient_count = self.request.users.len();
        info!(recipient_count, subject = %self.request.subject, "Sending alert");

        match api.send_alert(&self.request).await {
            Ok(()) => {
                info!(recipient_count, "Alert sent");
                SendOutcome::sent()
            }
            Err(err) => {
                warn!(error = %err, recipient_count, "Alert send failed");
                SendOutcome::failed()
            }
        }
    }
}

/// Builds and sends alert requests.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    in_flight: Arc<AtomicBool>,
}

impl Dispatcher {
    /// New dispatcher with no send in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a send is in flight. The send trigger is disabled while true.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Claim the send slot.
    pub fn try_begin(&self) -> Option<FlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| FlightGuard {
                flag: Arc::clone(&self.in_flight),
            })
    }

    /// Build the request for the current selection and draft.
    ///
    /// Does not touch the store or the draft. Fails if nothing is selected
    /// or another send holds the slot.
    pub fn prepare(
        &self,
        store: &RosterStore,
        draft: &AlertDraft,
    ) -> Result<PreparedSend, DispatchError> {
        let users = store.selected_recipients();
        if users.is_empty() {
            return Err(DispatchError::EmptySelection);
        }
        let guard = self.try_begin().ok_or(DispatchError::InFlight)?;

        Ok(PreparedSend {
            request: AlertRequest::new(draft.subject.clone(), draft.serialize(), users),
            _guard: guard,
        })
    }

    /// Prepare and dispatch in one step.
    pub async fn send(
        &self,
        api: &dyn AlertApi,
        store: &RosterStore,
        draft: &AlertDraft,
    ) -> Result<SendOutcome, DispatchError> {
        let prepared = self.prepare(store, draft)?;
        Ok(prepared.dispatch(api).await)
    }
}
