//! Error types for alert-desk.

use thiserror::Error;

use crate::document::MarkupError;

/// Errors from a composer edit. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Block index past the end of the document.
    #[error("block {index} out of range (document has {len} blocks)")]
    OutOfRange { index: usize, len: usize },

    /// Replacement markup or block was not well formed.
    #[error("invalid markup: {0}")]
    Markup(#[from] MarkupError),
}

/// Reasons a send could not start. Backend failures are reported through
/// [`SendOutcome`](crate::dispatcher::SendOutcome).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Nothing selected. The send trigger must be disabled in this state.
    #[error("no recipients selected")]
    EmptySelection,

    /// A send from this session is already in flight.
    #[error("a send is already in progress")]
    InFlight,
}
