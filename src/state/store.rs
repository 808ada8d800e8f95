use crate::error::FlowError;
use crate::models::{Bookmark, SyncEvent};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ListPhase {
    #[default]
    Loading,
    Ready,
    /// Blocking: the view shows the message instead of the list.
    Failed(String),
}

/// Where an optimistic delete stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeletePhase {
    /// Removed locally, backend call in flight.
    Speculative,
    /// Backend refused; an authoritative reload is pending.
    Reconciling,
}

/// Identifies one `load()` round trip. Responses carrying an older ticket
/// than the latest issued are stale and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LoadTicket(u64);

/// Per-tab view-model of the user's bookmarks.
///
/// Invariants: ids are unique, and entries are ordered by `created_at`
/// newest first, after every mutation.
#[derive(Clone, Debug, Default)]
pub(crate) struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
    phase: ListPhase,
    notice: Option<String>,
    pending_deletes: HashMap<String, DeletePhase>,
    load_generation: u64,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.id == id)
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// Inline, non-blocking message (e.g. a failed delete).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    #[cfg(test)]
    pub fn delete_phase(&self, id: &str) -> Option<DeletePhase> {
        self.pending_deletes.get(id).copied()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation = self.load_generation.saturating_add(1);
        LoadTicket(self.load_generation)
    }

    /// Applies a load result. Returns false when the ticket was superseded.
    ///
    /// On success the list is replaced wholesale; on failure the previous
    /// list is kept but hidden behind the error phase.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Bookmark>, FlowError>,
    ) -> bool {
        if ticket.0 != self.load_generation {
            return false;
        }

        match result {
            Ok(list) => {
                self.pending_deletes
                    .retain(|_, phase| *phase == DeletePhase::Speculative);
                // Deletes still in flight stay hidden until the backend answers.
                let in_flight = &self.pending_deletes;
                let list: Vec<Bookmark> = list
                    .into_iter()
                    .filter(|b| !in_flight.contains_key(&b.id))
                    .collect();
                self.replace(list);
                self.phase = ListPhase::Ready;
            }
            Err(e) => {
                self.phase = ListPhase::Failed(e.to_string());
            }
        }
        true
    }

    fn replace(&mut self, list: Vec<Bookmark>) {
        let mut seen = HashSet::with_capacity(list.len());
        let mut list: Vec<Bookmark> = list
            .into_iter()
            .filter(|b| seen.insert(b.id.clone()))
            .collect();
        // Stable: equal timestamps keep backend order.
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.bookmarks = list;
    }

    /// Inserts at the sorted position unless the id is already present or
    /// this tab is deleting it.
    pub fn apply_insert(&mut self, bookmark: Bookmark) -> bool {
        if self.contains(&bookmark.id)
            || self.pending_deletes.get(&bookmark.id) == Some(&DeletePhase::Speculative)
        {
            return false;
        }
        let at = self
            .bookmarks
            .partition_point(|b| b.created_at > bookmark.created_at);
        self.bookmarks.insert(at, bookmark);
        true
    }

    /// Removes the entry if present.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        self.bookmarks.len() != before
    }

    pub fn apply(&mut self, event: SyncEvent) -> bool {
        match event {
            SyncEvent::Insert { bookmark } => self.apply_insert(bookmark),
            SyncEvent::Delete { id } => self.apply_delete(&id),
        }
    }

    /// Phase one of a delete: drop the entry before the backend confirms.
    /// Returns false when there is nothing to delete or a delete is in flight.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        if self.pending_deletes.get(id) == Some(&DeletePhase::Speculative) {
            return false;
        }
        if !self.apply_delete(id) {
            return false;
        }
        self.pending_deletes
            .insert(id.to_string(), DeletePhase::Speculative);
        true
    }

    /// Backend agreed. Returns the event to tell the other tabs.
    pub fn confirm_delete(&mut self, id: &str) -> SyncEvent {
        self.pending_deletes.remove(id);
        self.apply_delete(id);
        SyncEvent::Delete { id: id.to_string() }
    }

    /// Backend refused: surface the error and hand back a ticket for the
    /// authoritative reload that overrides the speculative removal.
    pub fn reject_delete(&mut self, id: &str, error: &FlowError) -> LoadTicket {
        self.pending_deletes
            .insert(id.to_string(), DeletePhase::Reconciling);
        self.notice = Some(error.to_string());
        self.begin_load()
    }
}
