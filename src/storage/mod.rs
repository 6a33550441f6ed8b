//! localStorage access.
//!
//! The session token and the theme preference live under separate fixed
//! keys so clearing one never disturbs the other.

/// Session token key. Cleared on logout and on any 401 response.
pub(crate) const TOKEN_KEY: &str = "token";

/// Theme preference key ("true"/"false"), independent of the session.
pub(crate) const THEME_KEY: &str = "darkMode";

fn local_storage() -> Option<web_sys::Storage> {
    // Off-wasm (native unit tests) there is no browser storage; every
    // helper below degrades to a no-op / None so stores stay in-memory.
    if cfg!(not(target_arch = "wasm32")) {
        return None;
    }
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn get_item(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

pub(crate) fn set_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(key, value);
    }
}

pub(crate) fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn load_dark_mode() -> bool {
    get_item(THEME_KEY).map(|v| v == "true").unwrap_or(false)
}

pub(crate) fn save_dark_mode(on: bool) {
    set_item(THEME_KEY, if on { "true" } else { "false" });
}
