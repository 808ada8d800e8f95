use crate::api::BookmarkBackend;
use crate::error::FlowError;
use crate::models::{Bookmark, NewBookmark, SyncEvent};
use crate::state::store::{BookmarkStore, LoadTicket};
use crate::sync::SyncPublisher;
use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Somewhere a `BookmarkStore` lives: a reactive signal in the app, a plain
/// cell in tests. `None` means the owner is gone (view unmounted).
pub(crate) trait StoreHandle {
    fn with_store<R>(&self, f: impl FnOnce(&mut BookmarkStore) -> R) -> Option<R>;
}

impl StoreHandle for RwSignal<BookmarkStore> {
    fn with_store<R>(&self, f: impl FnOnce(&mut BookmarkStore) -> R) -> Option<R> {
        self.try_update(f)
    }
}

impl StoreHandle for Rc<RefCell<BookmarkStore>> {
    fn with_store<R>(&self, f: impl FnOnce(&mut BookmarkStore) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Prepends `https://` unless the input already names http(s).
pub(crate) fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// What the user typed into the add form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BookmarkDraft {
    pub title: String,
    pub url: String,
}

impl BookmarkDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Trimmed title and normalized URL.
    pub fn validate(&self) -> Result<(String, String), FlowError> {
        let title = self.title.trim();
        let url = self.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(FlowError::Validation);
        }
        Ok((title.to_string(), normalize_url(url)))
    }
}

/// Full fetch of the user's list; replaces the store's contents on success.
pub(crate) async fn load<B: BookmarkBackend, S: StoreHandle>(
    backend: &B,
    store: &S,
    user_id: &str,
) -> Result<(), FlowError> {
    let Some(ticket) = store.with_store(|s| s.begin_load()) else {
        return Ok(());
    };
    fetch_into(backend, store, user_id, ticket).await
}

async fn fetch_into<B: BookmarkBackend, S: StoreHandle>(
    backend: &B,
    store: &S,
    user_id: &str,
    ticket: LoadTicket,
) -> Result<(), FlowError> {
    let result = backend
        .list_bookmarks(user_id)
        .await
        .map_err(FlowError::load);

    let outcome = match &result {
        Ok(list) => {
            log::debug!("loaded {} bookmarks", list.len());
            Ok(())
        }
        Err(e) => {
            log::warn!("bookmark load failed: {}", e.detail().unwrap_or_default());
            Err(e.clone())
        }
    };

    store.with_store(|s| s.finish_load(ticket, result));
    outcome
}

/// Validates, inserts, applies locally, then tells the other tabs.
///
/// On error the draft is left for the caller to keep on screen.
pub(crate) async fn add_bookmark<B: BookmarkBackend, S: StoreHandle>(
    backend: &B,
    store: &S,
    channel: &impl SyncPublisher,
    draft: &BookmarkDraft,
) -> Result<Bookmark, FlowError> {
    let (title, url) = draft.validate()?;

    let user = match backend.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(FlowError::Unauthenticated),
        Err(e) => {
            log::warn!("session lookup failed before insert: {e}");
            return Err(FlowError::Unauthenticated);
        }
    };

    let record = NewBookmark {
        title,
        url,
        user_id: user.id,
    };
    let bookmark = backend.insert_bookmark(&record).await.map_err(|e| {
        log::warn!("bookmark insert failed: {e}");
        FlowError::insert(e)
    })?;

    // Our own tab may also hear this insert from a sibling channel instance;
    // the store ignores the duplicate.
    store.with_store(|s| s.apply_insert(bookmark.clone()));
    channel.publish_event(&SyncEvent::Insert {
        bookmark: bookmark.clone(),
    });

    Ok(bookmark)
}

/// Optimistic delete. A backend refusal triggers an authoritative reload.
pub(crate) async fn delete_bookmark<B: BookmarkBackend, S: StoreHandle>(
    backend: &B,
    store: &S,
    channel: &impl SyncPublisher,
    user_id: &str,
    id: &str,
) -> Result<(), FlowError> {
    if !store.with_store(|s| s.begin_delete(id)).unwrap_or(false) {
        return Ok(());
    }

    match backend.delete_bookmark(id).await {
        Ok(()) => {
            let event = store
                .with_store(|s| s.confirm_delete(id))
                .unwrap_or_else(|| SyncEvent::Delete { id: id.to_string() });
            channel.publish_event(&event);
            Ok(())
        }
        Err(e) => {
            log::warn!("bookmark delete failed, reloading: {e}");
            let err = FlowError::delete(e);
            if let Some(ticket) = store.with_store(|s| s.reject_delete(id, &err)) {
                if let Err(reload) = fetch_into(backend, store, user_id, ticket).await {
                    // The store already shows this as its error phase.
                    log::debug!("reconciling reload failed: {reload}");
                }
            }
            Err(err)
        }
    }
}
