use super::storage::SessionStore;
use crate::error::{Result, UnitrackError};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process session store; nothing survives a restart
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given tokens
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            if let Some(access) = access {
                entries.insert(super::ACCESS_TOKEN_KEY.to_string(), access.to_string());
            }
            if let Some(refresh) = refresh {
                entries.insert(super::REFRESH_TOKEN_KEY.to_string(), refresh.to_string());
            }
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| UnitrackError::SessionError("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_tokens_seeds_both_keys() {
        let store = MemorySessionStore::with_tokens(Some("a"), Some("r"));
        assert_eq!(store.access_token().as_deref(), Some("a"));
        assert_eq!(store.refresh_token().as_deref(), Some("r"));
    }

    #[test]
    fn test_save_tokens_without_refresh_drops_stale_refresh() {
        let store = MemorySessionStore::with_tokens(Some("old"), Some("stale"));
        store.save_tokens("new", None).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("new"));
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_refresh_token_alone_is_a_session() {
        let store = MemorySessionStore::with_tokens(None, Some("r"));
        assert!(store.has_session());

        let store = MemorySessionStore::with_tokens(None, None);
        assert!(!store.has_session());
    }

    #[test]
    fn test_clear_removes_session() {
        let store = MemorySessionStore::with_tokens(Some("a"), Some("r"));
        assert!(store.has_session());
        store.clear().unwrap();
        assert!(!store.has_session());
        assert!(store.refresh_token().is_none());
    }
}
