use serde::{Deserialize, Serialize};

pub(crate) const SESSION_KEY: &str = "bookmark_manager_session";

/// Tokens captured from the OAuth redirect.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl StoredSession {
    /// Parses the `#access_token=...&refresh_token=...` fragment the auth
    /// service appends to the redirect target.
    pub(crate) fn from_fragment(fragment: &str) -> Option<Self> {
        let fragment = fragment.trim_start_matches('#');

        let mut access_token = None;
        let mut refresh_token = None;
        let mut expires_at = None;

        for pair in fragment.split('&') {
            let Some((k, v)) = pair.split_once('=') else {
                continue;
            };
            let v = urlencoding::decode(v).ok()?.into_owned();
            match k {
                "access_token" => access_token = Some(v),
                "refresh_token" => refresh_token = Some(v),
                "expires_at" => expires_at = v.parse::<i64>().ok(),
                _ => {}
            }
        }

        let access_token = access_token.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            access_token,
            refresh_token,
            expires_at,
        })
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, &json).is_err() {
                log::warn!("failed to persist {key}");
            }
        }
    }
}

pub(crate) fn load_session_from_storage() -> Option<StoredSession> {
    load_json_from_storage(SESSION_KEY)
}

pub(crate) fn save_session_to_storage(session: &StoredSession) {
    save_json_to_storage(SESSION_KEY, session);
}

pub(crate) fn clear_session_storage() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_oauth_fragment() {
        let frag = "#access_token=abc.def&expires_at=1700000000&expires_in=3600&refresh_token=r1&token_type=bearer";
        let s = StoredSession::from_fragment(frag).expect("fragment should parse");
        assert_eq!(s.access_token, "abc.def");
        assert_eq!(s.refresh_token.as_deref(), Some("r1"));
        assert_eq!(s.expires_at, Some(1_700_000_000));
    }

    #[test]
    fn test_session_fragment_without_token_is_rejected() {
        assert!(StoredSession::from_fragment("#error=access_denied").is_none());
        assert!(StoredSession::from_fragment("").is_none());
        assert!(StoredSession::from_fragment("#access_token=").is_none());
    }

    #[test]
    fn test_session_fragment_values_are_url_decoded() {
        let s = StoredSession::from_fragment("access_token=a%2Bb").expect("should parse");
        assert_eq!(s.access_token, "a+b");
    }
}
