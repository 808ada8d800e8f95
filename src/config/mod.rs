use serde::{Deserialize, Serialize};

/// Channel shared by every tab that mirrors bookmark changes.
pub(crate) const DEFAULT_SYNC_CHANNEL: &str = "bookmark-sync";

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub sync_channel: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut cfg = Self::defaults();

        // `window.ENV` is injected by index.html at deploy time. Both the
        // upper-case keys (documented) and lower-case keys are accepted.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    let read = |keys: &[&str]| -> Option<String> {
                        keys.iter().find_map(|k| {
                            js_sys::Reflect::get(&env, &(*k).into())
                                .ok()
                                .and_then(|v| v.as_string())
                                .filter(|s| !s.trim().is_empty())
                        })
                    };

                    if let Some(url) = read(&["SUPABASE_URL", "supabase_url"]) {
                        cfg.supabase_url = url;
                    }
                    if let Some(key) = read(&["SUPABASE_ANON_KEY", "supabase_anon_key"]) {
                        cfg.supabase_anon_key = key;
                    }
                    if let Some(channel) = read(&["SYNC_CHANNEL", "sync_channel"]) {
                        cfg.sync_channel = channel;
                    }
                }
            }
        }

        cfg.supabase_url = cfg.supabase_url.trim_end_matches('/').to_string();
        cfg
    }

    pub fn defaults() -> Self {
        Self {
            supabase_url: DEFAULT_SUPABASE_URL.to_string(),
            supabase_anon_key: String::new(),
            sync_channel: DEFAULT_SYNC_CHANNEL.to_string(),
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(self.sync_channel.clone())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies the cross-tab channel.
///
/// Handed to the add form and the list at construction so both sides agree on
/// the channel without sharing a literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SyncConfig {
    pub channel_name: String,
}

impl SyncConfig {
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_CHANNEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_bookmark_sync_channel() {
        let cfg = EnvConfig::defaults();
        assert_eq!(cfg.sync_channel, "bookmark-sync");
        assert_eq!(cfg.sync_config(), SyncConfig::default());
    }

    #[test]
    fn test_sync_config_carries_injected_name() {
        let cfg = SyncConfig::new("custom");
        assert_eq!(cfg.channel_name, "custom");
    }
}
