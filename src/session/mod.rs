use crate::storage::{self, TOKEN_KEY};
use leptos::prelude::*;

/// Holder of the current session token.
///
/// Exactly one instance exists per running app (it is `Copy` and handed to
/// ApiClient and the auth guard), but tests construct isolated instances
/// with [`SessionStore::new`]. The token is mirrored to localStorage so a
/// full page reload restores the session; no expiry is tracked locally —
/// the backend's 401 is the only invalidation signal.
///
/// `clear()` is the single de-authentication side effect. Its writers are
/// login success, logout, and the 401 handler in `api`; all other code
/// observes validity through `get()` / `is_authenticated()`.
#[derive(Clone, Copy)]
pub(crate) struct SessionStore {
    token: RwSignal<Option<String>>,
}

impl SessionStore {
    /// In-memory store with no token. Used by tests and as a fallback.
    pub fn new() -> Self {
        Self {
            token: RwSignal::new(None),
        }
    }

    /// Restore the persisted token, if any.
    pub fn load_from_storage() -> Self {
        Self {
            token: RwSignal::new(storage::get_item(TOKEN_KEY)),
        }
    }

    /// Untracked read; request building must not register reactive deps.
    pub fn get(&self) -> Option<String> {
        self.token.get_untracked()
    }

    /// Tracked read for guards and views: re-runs observers whenever the
    /// token appears or disappears, including a mid-session 401 clear.
    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    pub fn set(&self, token: String) {
        storage::set_item(TOKEN_KEY, &token);
        self.token.set(Some(token));
    }

    /// Idempotent: a logout racing a 401-triggered clear is harmless.
    pub fn clear(&self) {
        storage::remove_item(TOKEN_KEY);
        self.token.set(None);
    }

    /// Drop the in-memory token without touching storage. Used by the
    /// cross-tab listener when another tab already removed the key.
    pub fn clear_memory(&self) {
        self.token.set(None);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_absent() {
        let s = SessionStore::new();
        assert_eq!(s.get(), None);
        assert!(!s.is_authenticated());
    }

    #[test]
    fn set_then_get() {
        let s = SessionStore::new();
        s.set("jwt-token".to_string());
        assert_eq!(s.get().as_deref(), Some("jwt-token"));
        assert!(s.is_authenticated());
    }

    #[test]
    fn clear_is_idempotent() {
        let s = SessionStore::new();
        s.set("t".to_string());
        s.clear();
        assert_eq!(s.get(), None);
        // Second clear (e.g. logout racing a 401 interception) is a no-op.
        s.clear();
        assert_eq!(s.get(), None);
    }

    #[test]
    fn instances_are_isolated() {
        let a = SessionStore::new();
        let b = SessionStore::new();
        a.set("only-a".to_string());
        assert_eq!(b.get(), None);
    }

    #[test]
    fn copies_share_the_token() {
        // ApiClient and the guard hold copies of the same store.
        let a = SessionStore::new();
        let b = a;
        a.set("shared".to_string());
        assert_eq!(b.get().as_deref(), Some("shared"));
        b.clear();
        assert_eq!(a.get(), None);
    }
}
