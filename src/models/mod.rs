use serde::{Deserialize, Deserializer, Serialize};

/// A user-owned note.
///
/// The backend has been observed returning ids both as strings and as
/// numbers, and under `_id` as well as `id`; we normalize everything to a
/// `String` and treat it as opaque.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Note {
    #[serde(alias = "_id", deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
}

/// Fields the user controls; the server assigns everything else.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login body: the deployed backend returns the credential under `token`,
/// older deployments under `accessToken`. Accept either.
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

impl LoginResponse {
    pub fn bearer(self) -> Option<String> {
        self.token.or(self.access_token)
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "note id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_deserializes_string_id() {
        let n: Note = serde_json::from_str(
            r#"{"id":"abc","title":"T","content":"C","isPublic":true}"#,
        )
        .expect("note should parse");
        assert_eq!(n.id, "abc");
        assert!(n.is_public);
    }

    #[test]
    fn note_deserializes_numeric_id() {
        let n: Note =
            serde_json::from_str(r#"{"id":42,"title":"T","content":"C"}"#).expect("should parse");
        assert_eq!(n.id, "42");
        assert!(!n.is_public, "isPublic defaults to false when omitted");
    }

    #[test]
    fn note_accepts_underscore_id_alias() {
        let n: Note = serde_json::from_str(
            r#"{"_id":"64ff","title":"Mongo","content":"","isPublic":false}"#,
        )
        .expect("should parse");
        assert_eq!(n.id, "64ff");
    }

    #[test]
    fn note_rejects_missing_id() {
        assert!(serde_json::from_str::<Note>(r#"{"title":"T","content":"C"}"#).is_err());
    }

    #[test]
    fn draft_serializes_service_field_names() {
        let d = NoteDraft {
            title: "T".into(),
            content: "C".into(),
            is_public: true,
        };
        let v = serde_json::to_value(d).expect("should serialize");
        assert_eq!(v["title"], "T");
        assert_eq!(v["content"], "C");
        assert_eq!(v["isPublic"], true);
    }

    #[test]
    fn login_response_prefers_token_over_access_token() {
        let r: LoginResponse =
            serde_json::from_str(r#"{"token":"a","accessToken":"b"}"#).expect("should parse");
        assert_eq!(r.bearer().as_deref(), Some("a"));
    }

    #[test]
    fn login_response_falls_back_to_access_token() {
        let r: LoginResponse =
            serde_json::from_str(r#"{"accessToken":"b"}"#).expect("should parse");
        assert_eq!(r.bearer().as_deref(), Some("b"));
    }

    #[test]
    fn login_response_may_carry_neither() {
        let r: LoginResponse = serde_json::from_str(r#"{"message":"ok"}"#).expect("should parse");
        assert_eq!(r.bearer(), None);
    }
}
