//! Recipient selection.
//!
//! A [`Selection`] is a set of recipient ids that is always a subset of the
//! roster it is used with. Every mutation builds a new set and swaps it in,
//! so a cloned snapshot never observes a half-applied change.

use std::collections::BTreeSet;
use std::sync::Arc;

use disaster_api::{Recipient, RecipientId};

/// Ids of the recipients chosen as alert targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Arc<BTreeSet<RecipientId>>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &RecipientId) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &RecipientId> {
        self.ids.iter()
    }

    /// True when every roster entry is selected and the roster is not empty.
    ///
    /// Always computed from the current sets, never cached.
    pub fn all_selected(&self, roster: &[Recipient]) -> bool {
        !roster.is_empty() && self.ids.len() == roster.len()
    }

    /// Flip membership of `id`.
    ///
    /// Returns false without changing anything if `id` is not on the roster.
    pub fn toggle(&mut self, roster: &[Recipient], id: &RecipientId) -> bool {
        if !roster.iter().any(|r| &r.id == id) {
            return false;
        }

        let mut next = (*self.ids).clone();
        if !next.remove(id) {
            next.insert(id.clone());
        }
        self.ids = Arc::new(next);
        true
    }

    /// Clear when everything is selected, otherwise select the whole roster.
    pub fn toggle_all(&mut self, roster: &[Recipient]) {
        self.ids = if self.all_selected(roster) {
            Arc::default()
        } else {
            Arc::new(roster.iter().map(|r| r.id.clone()).collect())
        };
    }

    /// Drop ids that are not on `roster`.
    pub fn retain_roster(&mut self, roster: &[Recipient]) {
        if self.ids.iter().all(|id| roster.iter().any(|r| &r.id == id)) {
            return;
        }
        let next = self
            .ids
            .iter()
            .filter(|id| roster.iter().any(|r| &r.id == *id))
            .cloned()
            .collect();
        self.ids = Arc::new(next);
    }

    /// Recipient objects for the selection, in roster order.
    pub fn recipients(&self, roster: &[Recipient]) -> Vec<Recipient> {
        roster
            .iter()
            .filter(|r| self.ids.contains(&r.id))
            .cloned()
            .collect()
    }
}
