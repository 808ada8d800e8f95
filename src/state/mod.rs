pub(crate) mod flows;
pub(crate) mod session;
pub(crate) mod store;

#[cfg(test)]
pub(crate) mod testing;

use crate::api::SupabaseClient;
use crate::config::EnvConfig;
use leptos::prelude::*;

pub(crate) use flows::{add_bookmark, delete_bookmark, load, BookmarkDraft};
pub(crate) use session::{SessionEvent, SessionState};
pub(crate) use store::{BookmarkStore, ListPhase};

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub backend: RwSignal<SupabaseClient>,

    /// Re-resolved on every entry to a gated view.
    pub session: RwSignal<SessionState>,
}

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::new();
        let backend = SupabaseClient::load_from_storage(&config);

        Self {
            config,
            backend: RwSignal::new(backend),
            session: RwSignal::new(SessionState::Resolving),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
