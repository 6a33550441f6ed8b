use crate::api::ApiClient;
use crate::notes::NotesStore;
use crate::session::SessionStore;
use crate::storage::load_dark_mode;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub session: SessionStore,
    pub api: ApiClient,
    pub notes: NotesStore,

    /// Theme preference; persisted separately from the session.
    pub dark_mode: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let session = SessionStore::load_from_storage();
        let api = ApiClient::from_env(session);
        let notes = NotesStore::new(api.clone());

        Self {
            session,
            api,
            notes,
            dark_mode: RwSignal::new(load_dark_mode()),
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
