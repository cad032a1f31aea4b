//! Roster store: the loaded recipients and the current selection.
//!
//! Loading is split into [`RosterStore::begin_load`] and
//! [`RosterStore::finish_load`] so callers can release their lock across the
//! network call. Each load gets a generation number; a response for a
//! generation older than the latest issued one is discarded.

use std::sync::Arc;

use disaster_api::{AlertApi, ApiError, Recipient, RecipientId};
use tracing::{debug, info, warn};

use crate::notification::{Notification, FETCH_USERS_FAILED};
use crate::selection::Selection;

/// Handle for one in-flight roster load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket to finish_load"]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of applying a load response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Roster replaced.
    Loaded { count: usize },
    /// Fetch failed; roster unchanged.
    Failed(Notification),
    /// A newer load was issued; response ignored.
    Stale,
}

/// Owns the recipient list and the selection.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    roster: Arc<Vec<Recipient>>,
    selection: Selection,
    generation: u64,
    loading: bool,
}

impl RosterStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current roster snapshot, in server order.
    pub fn roster(&self) -> Arc<Vec<Recipient>> {
        Arc::clone(&self.roster)
    }

    /// Current selection snapshot.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// True strictly between the latest load start and its completion.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Start a load and invalidate any earlier one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        debug!(generation = self.generation, "Roster load started");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the response for `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Recipient>, ApiError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale roster response"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(users) => {
                let count = users.len();
                self.roster = Arc::new(users);
                self.selection.retain_roster(&self.roster);
                info!(count, "Roster loaded");
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch users");
                LoadOutcome::Failed(Notification::error(FETCH_USERS_FAILED))
            }
        }
    }

    /// Empty the roster and selection.
    ///
    /// The generation keeps counting, so a load issued before the clear can
    /// never be mistaken for one issued after it.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.roster = Arc::new(Vec::new());
        self.selection = Selection::new();
        debug!(generation = self.generation, "Roster cleared");
    }

    /// Fetch the roster from `api` and apply it.
    ///
    /// Holds `&mut self` across the request. Callers that share the store
    /// behind a lock should use `begin_load`/`finish_load` instead.
    pub async fn load(&mut self, api: &dyn AlertApi) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = api.list_users().await;
        self.finish_load(ticket, result)
    }

    /// Flip selection of one recipient. No-op for unknown ids.
    pub fn toggle(&mut self, id: &RecipientId) -> bool {
        self.selection.toggle(&self.roster, id)
    }

    /// Select everyone, or clear if everyone is already selected.
    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.roster);
    }

    /// Derived: every roster entry selected and roster non-empty.
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.roster)
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &RecipientId) -> bool {
        self.selection.contains(id)
    }

    /// Selected recipient objects, in roster order.
    pub fn selected_recipients(&self) -> Vec<Recipient> {
        self.selection.recipients(&self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<Recipient> {
        vec![
            Recipient::new("1", "Alice", "a@x.com"),
            Recipient::new("2", "Bob", "b@x.com"),
        ]
    }

    fn failure() -> ApiError {
        ApiError::Config("unreachable".to_string())
    }

    #[test]
    fn test_loading_flag_brackets_load() {
        let mut store = RosterStore::new();
        assert!(!store.loading());
        let ticket = store.begin_load();
        assert!(store.loading());
        store.finish_load(ticket, Ok(users()));
        assert!(!store.loading());
    }

    #[test]
    fn test_failure_keeps_roster_and_notifies() {
        let mut store = RosterStore::new();
        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(users()));

        let ticket = store.begin_load();
        let outcome = store.finish_load(ticket, Err(failure()));
        assert_eq!(
            outcome,
            LoadOutcome::Failed(Notification::error("Failed to fetch users"))
        );
        assert_eq!(store.roster().len(), 2);
        assert!(!store.loading());
    }

    #[test]
    fn test_reload_prunes_selection() {
        let mut store = RosterStore::new();
        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(users()));
        store.toggle_all();

        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(vec![Recipient::new("2", "Bob", "b@x.com")]));
        assert!(!store.is_selected(&RecipientId::new("1")));
        assert!(store.is_selected(&RecipientId::new("2")));
        assert!(store.all_selected());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut store = RosterStore::new();
        let first = store.begin_load();
        let second = store.begin_load();

        let newest = vec![Recipient::new("3", "Carol", "c@x.com")];
        assert_eq!(
            store.finish_load(second, Ok(newest.clone())),
            LoadOutcome::Loaded { count: 1 }
        );
        assert_eq!(store.finish_load(first, Ok(users())), LoadOutcome::Stale);
        assert_eq!(*store.roster(), newest);
    }

    #[test]
    fn test_stale_failure_does_not_clear_loading() {
        let mut store = RosterStore::new();
        let first = store.begin_load();
        let _second = store.begin_load();
        assert_eq!(store.finish_load(first, Err(failure())), LoadOutcome::Stale);
        assert!(store.loading());
    }

    #[test]
    fn test_clear_invalidates_pending_load() {
        let mut store = RosterStore::new();
        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(users()));
        store.toggle_all();

        let before_clear = store.begin_load();
        store.clear();
        assert!(store.roster().is_empty());
        assert!(store.selection().is_empty());
        assert!(!store.loading());

        let after_clear = store.begin_load();
        assert_ne!(before_clear, after_clear);
        let bob = vec![Recipient::new("2", "Bob", "b@x.com")];
        assert_eq!(
            store.finish_load(after_clear, Ok(bob.clone())),
            LoadOutcome::Loaded { count: 1 }
        );
        assert_eq!(store.finish_load(before_clear, Ok(users())), LoadOutcome::Stale);
        assert_eq!(*store.roster(), bob);
    }

    #[test]
    fn test_roster_snapshot_is_replaced_not_mutated() {
        let mut store = RosterStore::new();
        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(users()));
        let snapshot = store.roster();

        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(Vec::new()));
        assert_eq!(snapshot.len(), 2);
        assert!(store.roster().is_empty());
    }
}
