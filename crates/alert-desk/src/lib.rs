//! Alert composition for the disaster-alert admin console.
//!
//! This crate holds the state behind the "send alert" screen:
//!
//! - [`RosterStore`]: loaded recipients plus the current [`Selection`]
//! - [`Composer`]: the [`AlertDraft`] with its rich-text [`Document`]
//! - [`Dispatcher`]: builds one [`disaster_api::AlertRequest`] and sends it
//!
//! # Example
//!
//! ```no_run
//! use alert_desk::{Composer, Dispatcher, RosterStore, DEFAULT_SUBJECT};
//! use disaster_api::{AlertClient, ApiConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = AlertClient::new(ApiConfig::default())?;
//! let mut store = RosterStore::new();
//! store.load(&api).await;
//! store.toggle_all();
//!
//! let composer = Composer::new(DEFAULT_SUBJECT)?;
//! let outcome = Dispatcher::new().send(&api, &store, composer.draft()).await?;
//! println!("{}", outcome.notification.message);
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod notification;
pub mod roster;
pub mod selection;
pub mod session;

pub use composer::{AlertDraft, Composer, Edit, DEFAULT_SUBJECT, DEFAULT_TEMPLATE};
pub use dispatcher::{Dispatcher, FlightGuard, PreparedSend, SendOutcome};
pub use document::{Block, BlockKind, Document, Mark, Marks, MarkupError, Run};
pub use error::{DispatchError, EditError};
pub use notification::{Level, Notification};
pub use roster::{LoadOutcome, LoadTicket, RosterStore};
pub use selection::Selection;
pub use session::SessionContext;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
