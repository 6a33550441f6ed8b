use crate::api::{ApiClient, ApiErrorKind, ApiResult};
use crate::models::{Note, NoteDraft};
use leptos::prelude::*;

/// Owner of the in-memory note collection.
///
/// Every mutation goes through one of the reconciliation functions below,
/// driven by the resolution of this store's own operations. Concurrent
/// operations are not serialized against each other and responses are not
/// matched to issue order: whichever response resolves last determines the
/// collection. Nothing de-duplicates two rapid submissions of the same
/// draft, and an unmounted view does not cancel its in-flight request.
#[derive(Clone)]
pub(crate) struct NotesStore {
    api: ApiClient,
    pub notes: RwSignal<Vec<Note>>,
    pub loading: RwSignal<bool>,

    /// Edit staging: target id + a mutable copy of the note's fields.
    pub editing_id: RwSignal<Option<String>>,
    pub draft_title: RwSignal<String>,
    pub draft_content: RwSignal<String>,
    pub draft_is_public: RwSignal<bool>,
}

impl NotesStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            notes: RwSignal::new(vec![]),
            loading: RwSignal::new(false),
            editing_id: RwSignal::new(None),
            draft_title: RwSignal::new(String::new()),
            draft_content: RwSignal::new(String::new()),
            draft_is_public: RwSignal::new(false),
        }
    }

    /// GET the full collection and replace local state with the answer
    /// (no merge). A 401 propagates (the session is already cleared by the
    /// transport layer); any other failure keeps the last good collection
    /// and only logs — the list view degrades silently.
    pub async fn fetch_all(&self) -> ApiResult<()> {
        self.loading.set(true);
        let result = self.api.list_notes().await;
        self.loading.set(false);

        match result {
            Ok(incoming) => {
                self.notes.update(|notes| replace_all(notes, incoming));
                Ok(())
            }
            Err(e) => {
                if e.kind != ApiErrorKind::Unauthorized {
                    leptos::logging::warn!("notes fetch failed, keeping previous list: {e}");
                }
                Err(e)
            }
        }
    }

    /// POST the draft; on success the server-assigned note (with its id)
    /// is appended to the collection.
    pub async fn create(&self, draft: &NoteDraft) -> ApiResult<Note> {
        let note = self.api.create_note(draft).await?;
        self.notes.update(|notes| apply_created(notes, note.clone()));
        Ok(note)
    }

    /// Same as [`Self::create`] but through the alternate route the backend
    /// also serves (see `api::NOTES_QUICK_CREATE_PATH`).
    pub async fn create_quick(&self, draft: &NoteDraft) -> ApiResult<Note> {
        let note = self.api.create_note_quick(draft).await?;
        self.notes.update(|notes| apply_created(notes, note.clone()));
        Ok(note)
    }

    /// PUT the draft to the note's path; the entry is replaced with the
    /// server's returned value, not the local draft, so server-side
    /// normalization is respected.
    pub async fn update(&self, id: &str, draft: &NoteDraft) -> ApiResult<Note> {
        let note = self.api.update_note(id, draft).await?;
        self.notes.update(|notes| apply_updated(notes, note.clone()));
        Ok(note)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.api.delete_note(id).await?;
        self.notes.update(|notes| apply_deleted(notes, id));
        Ok(())
    }

    /// Copy a note's fields into the draft and record the target id.
    pub fn start_edit(&self, note: &Note) {
        self.editing_id.set(Some(note.id.clone()));
        self.draft_title.set(note.title.clone());
        self.draft_content.set(note.content.clone());
        self.draft_is_public.set(note.is_public);
    }

    /// Discard the draft and the target id (submit and cancel both end here;
    /// navigating away simply never reads the draft again).
    pub fn clear_draft(&self) {
        self.editing_id.set(None);
        self.draft_title.set(String::new());
        self.draft_content.set(String::new());
        self.draft_is_public.set(false);
    }

    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.draft_title.get_untracked(),
            content: self.draft_content.get_untracked(),
            is_public: self.draft_is_public.get_untracked(),
        }
    }
}

/// Wholesale replacement after a successful fetch.
pub(crate) fn replace_all(notes: &mut Vec<Note>, incoming: Vec<Note>) {
    *notes = incoming;
}

/// Append the server-created note. Should the server ever hand back an id
/// that is already present, the existing entry is replaced instead — the
/// collection never holds two entries with one id.
pub(crate) fn apply_created(notes: &mut Vec<Note>, note: Note) {
    if let Some(existing) = notes.iter_mut().find(|n| n.id == note.id) {
        *existing = note;
    } else {
        notes.push(note);
    }
}

/// Replace the entry whose id matches; a miss is a no-op. Never changes the
/// collection size.
pub(crate) fn apply_updated(notes: &mut Vec<Note>, note: Note) {
    if let Some(existing) = notes.iter_mut().find(|n| n.id == note.id) {
        *existing = note;
    }
}

pub(crate) fn apply_deleted(notes: &mut Vec<Note>, id: &str) {
    notes.retain(|n| n.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            is_public: false,
        }
    }

    #[test]
    fn replace_all_discards_the_previous_collection() {
        let mut notes = vec![note("1", "old"), note("2", "stale")];
        replace_all(&mut notes, vec![note("3", "fresh")]);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "3");
    }

    #[test]
    fn replace_all_accepts_empty_server_answers() {
        let mut notes = vec![note("1", "old")];
        replace_all(&mut notes, vec![]);
        assert!(notes.is_empty());
    }

    #[test]
    fn create_appends_and_grows_by_exactly_one() {
        let mut notes = vec![note("1", "a")];
        apply_created(&mut notes, note("42", "server-assigned"));
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].id, "42");
        assert_eq!(notes[1].title, "server-assigned");
        assert_eq!(notes.iter().filter(|n| n.id == "42").count(), 1);
    }

    #[test]
    fn create_never_duplicates_an_id() {
        let mut notes = vec![note("42", "first")];
        apply_created(&mut notes, note("42", "again"));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "again");
    }

    #[test]
    fn update_replaces_with_the_server_value() {
        let mut notes = vec![note("1", "local title")];
        let mut server = note("1", "Normalized Title");
        server.content = "trimmed by server".to_string();
        apply_updated(&mut notes, server);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Normalized Title");
        assert_eq!(notes[0].content, "trimmed by server");
    }

    #[test]
    fn update_never_changes_the_collection_size() {
        let mut notes = vec![note("1", "a"), note("2", "b")];
        apply_updated(&mut notes, note("2", "b2"));
        assert_eq!(notes.len(), 2);
        // Unknown id: still a no-op on size.
        apply_updated(&mut notes, note("404", "ghost"));
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.id != "404"));
    }

    #[test]
    fn delete_removes_exactly_the_matching_entry() {
        let mut notes = vec![note("1", "a"), note("2", "b")];
        apply_deleted(&mut notes, "1");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "2");
        // Missing id: no-op.
        apply_deleted(&mut notes, "1");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn crud_sequence_tracks_the_server_id_set() {
        let mut notes = vec![];
        apply_created(&mut notes, note("1", "a"));
        apply_created(&mut notes, note("2", "b"));
        apply_updated(&mut notes, note("1", "a!"));
        apply_deleted(&mut notes, "2");
        apply_created(&mut notes, note("3", "c"));

        let mut ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn late_fetch_response_wins_over_an_earlier_one() {
        // Two overlapping fetches: the one that RESOLVES last determines the
        // collection, regardless of issue order. There is deliberately no
        // stale-response guard.
        let mut notes = vec![];
        let issued_second_resolved_first = vec![note("b", "newer request")];
        let issued_first_resolved_last = vec![note("a", "older request")];

        replace_all(&mut notes, issued_second_resolved_first);
        replace_all(&mut notes, issued_first_resolved_last);

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "a");
    }

    #[test]
    fn double_submit_of_one_draft_yields_two_entries() {
        // No in-flight de-duplication: the server minted two ids, both land.
        let mut notes = vec![];
        apply_created(&mut notes, note("10", "same draft"));
        apply_created(&mut notes, note("11", "same draft"));
        assert_eq!(notes.len(), 2);
    }
}
