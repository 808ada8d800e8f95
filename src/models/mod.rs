use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved link, as stored by the backend.
///
/// Extra columns returned by the table API (`user_id`, ...) are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `id` and `created_at` are assigned by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewBookmark {
    pub title: String,
    pub url: String,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Authenticated account, as returned by the auth service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Full name, then email, then a placeholder.
    pub fn display_name(&self) -> String {
        let non_blank = |s: &Option<String>| {
            s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
        };
        non_blank(&self.user_metadata.full_name)
            .or_else(|| non_blank(&self.email))
            .unwrap_or_else(|| "U".to_string())
    }

    pub fn first_name(&self) -> String {
        self.display_name()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    pub fn greeting(&self) -> String {
        format!("Hello, {}!", self.first_name())
    }

    /// Up to two upper-case initials for the avatar fallback.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .avatar_url
            .clone()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Message exchanged between tabs of the same browser session. Never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub(crate) enum SyncEvent {
    Insert { bookmark: Bookmark },
    Delete { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: Option<&str>, email: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            email: email.map(str::to_string),
            user_metadata: UserMetadata {
                full_name: full_name.map(str::to_string),
                avatar_url: None,
            },
        }
    }

    #[test]
    fn test_bookmark_contract_deserialize_ignores_extra_columns() {
        // Row shape returned by the table API.
        let json = r#"{
            "id": "b1",
            "user_id": "u1",
            "title": "Docs",
            "url": "https://docs.example.com",
            "created_at": "2024-05-01T10:20:30.123456+00:00"
        }"#;
        let parsed: Bookmark = serde_json::from_str(json).expect("bookmark row should parse");
        assert_eq!(parsed.id, "b1");
        assert_eq!(parsed.title, "Docs");
        assert_eq!(parsed.created_at.to_rfc3339(), "2024-05-01T10:20:30.123456+00:00");
    }

    #[test]
    fn test_sync_event_wire_format() {
        let delete = SyncEvent::Delete {
            id: "1".to_string(),
        };
        let v = serde_json::to_value(&delete).expect("should serialize");
        assert_eq!(v, serde_json::json!({"type": "DELETE", "id": "1"}));

        let json = r#"{
            "type": "INSERT",
            "bookmark": {"id": "1", "title": "Docs", "url": "https://docs.example.com", "created_at": "2024-05-01T00:00:00Z"}
        }"#;
        let parsed: SyncEvent = serde_json::from_str(json).expect("insert event should parse");
        match parsed {
            SyncEvent::Insert { bookmark } => assert_eq!(bookmark.id, "1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_sync_event_unknown_type_is_rejected() {
        let json = r#"{"type": "UPDATE", "id": "1"}"#;
        assert!(serde_json::from_str::<SyncEvent>(json).is_err());
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        assert_eq!(user(Some("Ada Lovelace"), Some("ada@x.io")).display_name(), "Ada Lovelace");
        assert_eq!(user(None, Some("ada@x.io")).display_name(), "ada@x.io");
        assert_eq!(user(None, None).display_name(), "U");
        assert_eq!(user(Some("  "), None).display_name(), "U");
    }

    #[test]
    fn test_user_initials_and_first_name() {
        let u = user(Some("ada byron lovelace"), None);
        assert_eq!(u.initials(), "AB");
        assert_eq!(u.first_name(), "ada");
        assert_eq!(user(None, Some("ada@x.io")).initials(), "A");
    }

    #[test]
    fn test_user_header_fields_are_independent_copies() {
        let u = user(Some("Ada Lovelace"), Some("ada@example.com"));
        let greeting = u.greeting();
        let initials = u.initials();
        let avatar = u.avatar_url();
        drop(u);
        assert_eq!(greeting, "Hello, Ada!");
        assert_eq!(initials, "AL");
        assert_eq!(avatar, None);

        assert_eq!(user(None, None).greeting(), "Hello, U!");
    }
}
