use crate::models::{LoginRequest, LoginResponse, Note, NoteDraft, SignupRequest};
use crate::session::SessionStore;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Versioned prefix joined between the configured base URL and every path.
pub(crate) const API_PREFIX: &str = "/api/v1";

pub(crate) const LOGIN_PATH: &str = "/users/login";
pub(crate) const SIGNUP_PATH: &str = "/users/signup";
pub(crate) const LOGOUT_PATH: &str = "/users/logout";
pub(crate) const NOTES_PATH: &str = "/notes";

/// Second create route observed against the deployed backend. The canonical
/// path is unconfirmed (see DESIGN.md); the quick-capture flow uses this one
/// and the editor form uses `NOTES_PATH` until the service contract settles.
pub(crate) const NOTES_QUICK_CREATE_PATH: &str = "/notes/createnote";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// HTTP 401. Handling it clears the session before the caller sees it.
    Unauthorized,
    /// Other 4xx; carries the server's inline message when present.
    Validation,
    /// 5xx.
    Server,
    /// No response received.
    Network,
    /// 2xx with an undecodable body.
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    /// Classify a non-2xx, non-401 response. The server reports user-facing
    /// problems under a `message` field; pass that through for 4xx so forms
    /// can show it inline.
    fn from_status(status: StatusCode, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string);

        if status.is_server_error() {
            Self {
                kind: ApiErrorKind::Server,
                message: message.unwrap_or_else(|| format!("Server error ({status})")),
            }
        } else {
            Self {
                kind: ApiErrorKind::Validation,
                message: message.unwrap_or_else(|| format!("Request failed ({status})")),
            }
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub backend_url: String,
}

const DEFAULT_BACKEND_URL: &str = "https://noteflow-backend01.onrender.com";

impl EnvConfig {
    pub fn new() -> Self {
        // Deployment override via `window.ENV.BACKEND_URL`; the Vite-era
        // key is still accepted for older deploy scripts.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["BACKEND_URL", "VITE_BACKEND_URL"] {
                        if let Ok(url) = js_sys::Reflect::get(&env, &(*key).into()) {
                            if let Some(url_str) = url.as_string() {
                                return Self { backend_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin wrapper over the HTTP transport.
///
/// Reads the injected [`SessionStore`] before every request and attaches the
/// bearer header when a token exists; without one the request goes out
/// unauthenticated and the server decides whether that is acceptable for the
/// path. Exactly one network attempt per call — no retry, no backoff.
#[derive(Clone)]
pub(crate) struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: String, session: SessionStore) -> Self {
        Self { base_url, session }
    }

    pub fn from_env(session: SessionStore) -> Self {
        Self::new(EnvConfig::new().backend_url, session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn bearer_header(&self) -> Option<String> {
        self.session.get().map(|t| format!("Bearer {t}"))
    }

    /// 401 policy, applied identically regardless of which operation hit it:
    /// the session is gone before the caller observes the rejection. The
    /// auth guard reacts to the cleared session and redirects; the caller's
    /// own error path still runs on the returned `Unauthorized`.
    fn on_unauthorized(&self) -> ApiError {
        self.session.clear();
        ApiError::unauthorized()
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<Value> {
        let client = reqwest::Client::new();
        let mut req = client.request(method, self.url(path));
        if let Some(header) = self.bearer_header() {
            req = req.header("Authorization", header);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();

        if status.as_u16() == 401 {
            return Err(self.on_unauthorized());
        }

        if !status.is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            return Err(ApiError::from_status(status, &body));
        }

        // Some endpoints (logout, delete) answer with an empty body.
        let text = res.text().await.map_err(ApiError::network)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(ApiError::parse)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let body = self
            .request(
                Method::POST,
                LOGIN_PATH,
                Some(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                }),
            )
            .await?;

        let parsed: LoginResponse = serde_json::from_value(body).map_err(ApiError::parse)?;
        parsed
            .bearer()
            .ok_or_else(|| ApiError::parse("login response is missing a token"))
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        self.request(
            Method::POST,
            SIGNUP_PATH,
            Some(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await?;
        Ok(())
    }

    /// Best-effort server-side logout. The local session is cleared by the
    /// caller whether or not the server answered; see SessionStore::clear.
    pub async fn logout(&self) -> ApiResult<()> {
        self.request(Method::POST, LOGOUT_PATH, Some(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    pub async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        let body = self
            .request(Method::GET, NOTES_PATH, None::<&Value>)
            .await?;
        parse_note_list(&body)
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> ApiResult<Note> {
        let body = self
            .request(Method::POST, NOTES_PATH, Some(draft))
            .await?;
        parse_note(&body)
    }

    /// Create through the alternate route (see `NOTES_QUICK_CREATE_PATH`).
    pub async fn create_note_quick(&self, draft: &NoteDraft) -> ApiResult<Note> {
        let body = self
            .request(Method::POST, NOTES_QUICK_CREATE_PATH, Some(draft))
            .await?;
        parse_note(&body)
    }

    pub async fn update_note(&self, id: &str, draft: &NoteDraft) -> ApiResult<Note> {
        let body = self
            .request(Method::PUT, &note_path(id), Some(draft))
            .await?;
        parse_note(&body)
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        self.request(Method::DELETE, &note_path(id), None::<&Value>)
            .await?;
        Ok(())
    }
}

pub(crate) fn note_path(id: &str) -> String {
    format!("{}/{}", NOTES_PATH, urlencoding::encode(id))
}

/// List responses wrap the array under `data`; fall back to the raw body
/// when the envelope is absent. Entries that fail to parse are skipped with
/// a warning rather than poisoning the whole list.
pub(crate) fn parse_note_list(body: &Value) -> ApiResult<Vec<Note>> {
    let list = body.get("data").unwrap_or(body);
    let arr = list
        .as_array()
        .ok_or_else(|| ApiError::parse("note list response is not an array"))?;

    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        match serde_json::from_value::<Note>(item.clone()) {
            Ok(n) => out.push(n),
            Err(e) => leptos::logging::warn!("skipping malformed note entry: {e}"),
        }
    }
    Ok(out)
}

/// Single-note responses have been observed raw, under `data`, and under
/// `note`. Unwrap in that order.
pub(crate) fn parse_note(body: &Value) -> ApiResult<Note> {
    let inner = body
        .get("data")
        .or_else(|| body.get("note"))
        .unwrap_or(body);
    serde_json::from_value(inner.clone()).map_err(ApiError::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(DEFAULT_BACKEND_URL.to_string(), SessionStore::new())
    }

    #[test]
    fn url_joins_base_prefix_and_path() {
        let c = client();
        assert_eq!(
            c.url(NOTES_PATH),
            "https://noteflow-backend01.onrender.com/api/v1/notes"
        );
        assert_eq!(
            c.url(LOGIN_PATH),
            "https://noteflow-backend01.onrender.com/api/v1/users/login"
        );
    }

    #[test]
    fn both_create_paths_live_under_the_versioned_prefix() {
        // Two call sites, two paths; kept until the contract is confirmed.
        let c = client();
        assert_eq!(
            c.url(NOTES_QUICK_CREATE_PATH),
            "https://noteflow-backend01.onrender.com/api/v1/notes/createnote"
        );
        assert_ne!(NOTES_PATH, NOTES_QUICK_CREATE_PATH);
    }

    #[test]
    fn note_path_percent_encodes_the_id() {
        assert_eq!(note_path("42"), "/notes/42");
        assert_eq!(note_path("a b/c"), "/notes/a%20b%2Fc");
    }

    #[test]
    fn bearer_header_absent_without_token() {
        assert!(client().bearer_header().is_none());
    }

    #[test]
    fn bearer_header_present_with_token() {
        let session = SessionStore::new();
        session.set("my-jwt-token".to_string());
        let c = ApiClient::new(DEFAULT_BACKEND_URL.to_string(), session);
        assert_eq!(c.bearer_header().as_deref(), Some("Bearer my-jwt-token"));
    }

    #[test]
    fn unauthorized_clears_the_injected_session() {
        let session = SessionStore::new();
        session.set("expired".to_string());
        let c = ApiClient::new(DEFAULT_BACKEND_URL.to_string(), session);

        let e = c.on_unauthorized();

        assert_eq!(e.kind, ApiErrorKind::Unauthorized);
        assert_eq!(session.get(), None, "session must be absent before the caller sees the error");
    }

    #[test]
    fn from_status_maps_4xx_to_validation_with_server_message() {
        let e = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            &json!({"message": "Title is required"}),
        );
        assert_eq!(e.kind, ApiErrorKind::Validation);
        assert_eq!(e.message, "Title is required");
    }

    #[test]
    fn from_status_maps_4xx_without_message_to_generic_validation() {
        let e = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, &Value::Null);
        assert_eq!(e.kind, ApiErrorKind::Validation);
        assert!(e.message.contains("422"));
    }

    #[test]
    fn from_status_maps_5xx_to_server() {
        let e = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null);
        assert_eq!(e.kind, ApiErrorKind::Server);
    }

    #[test]
    fn parse_note_list_unwraps_data_envelope() {
        let body = json!({"data": [
            {"id": 1, "title": "A", "content": "a", "isPublic": false},
            {"id": 2, "title": "B", "content": "b", "isPublic": true},
        ]});
        let notes = parse_note_list(&body).expect("should parse");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, "1");
        assert!(notes[1].is_public);
    }

    #[test]
    fn parse_note_list_falls_back_to_raw_array() {
        let body = json!([{"id": "x", "title": "A", "content": "a"}]);
        let notes = parse_note_list(&body).expect("should parse");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "x");
    }

    #[test]
    fn parse_note_list_skips_malformed_entries() {
        let body = json!([
            {"id": "ok", "title": "A", "content": "a"},
            {"title": "no id"},
        ]);
        let notes = parse_note_list(&body).expect("should parse");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn parse_note_list_rejects_non_array_bodies() {
        let e = parse_note_list(&json!({"data": {"oops": true}})).unwrap_err();
        assert_eq!(e.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn parse_note_accepts_raw_data_and_note_envelopes() {
        let raw = json!({"id": 42, "title": "T", "content": "C"});
        let data = json!({"data": {"id": 42, "title": "T", "content": "C"}});
        let note = json!({"note": {"id": 42, "title": "T", "content": "C"}});
        for body in [raw, data, note] {
            let n = parse_note(&body).expect("should parse");
            assert_eq!(n.id, "42");
        }
    }
}
