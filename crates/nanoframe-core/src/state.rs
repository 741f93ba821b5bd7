use std::sync::atomic::AtomicBool;
use std::sync::RwLock;

use crate::board::ReferenceImage;
use crate::history::HistoryEntry;
use crate::persist::{keys, Persistence};
use crate::MAX_HISTORY_ENTRIES;

/// Everything one session holds in memory.
///
/// Created once at startup and handed to the managers behind an `Arc`.
/// Reference images are deliberately absent from persistence: a fresh
/// process always starts with an empty board.
pub struct SessionState {
    api_key: RwLock<String>,
    proxy_url: String,
    pub(crate) history: RwLock<Vec<HistoryEntry>>,
    pub(crate) refs: RwLock<Vec<ReferenceImage>>,
    pub(crate) refs_full_notified: AtomicBool,
}

impl SessionState {
    /// Hydrates a session from the store: the access key and history come
    /// back, the reference board starts empty. Unreadable stored history is
    /// logged and replaced with an empty list rather than failing startup.
    pub fn load(store: &dyn Persistence, proxy_url: impl Into<String>) -> Self {
        let api_key = store.get(keys::API_KEY).unwrap_or_default();
        let mut history = store
            .get(keys::HISTORY)
            .and_then(|raw| match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    tracing::warn!(error = %e, "stored history unreadable, starting empty");
                    None
                }
            })
            .unwrap_or_default();
        // an oversized stored list (hand-edited, older build) is clamped so
        // the bound holds from the first instant
        history.truncate(MAX_HISTORY_ENTRIES);
        Self {
            api_key: RwLock::new(api_key),
            proxy_url: proxy_url.into(),
            history: RwLock::new(history),
            refs: RwLock::new(Vec::new()),
            refs_full_notified: AtomicBool::new(false),
        }
    }

    pub fn api_key(&self) -> String {
        self.api_key.read().expect("poisoned").clone()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.read().expect("poisoned").is_empty()
    }

    pub(crate) fn set_api_key(&self, key: &str) {
        *self.api_key.write().expect("poisoned") = key.to_string();
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }
}
