use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::persist::{keys, PersistError, Persistence};
use crate::render::RenderSink;
use crate::state::SessionState;
use crate::MAX_HISTORY_ENTRIES;

/// One generated result the user may come back to.
///
/// Field names match the serialized form the front end has always written,
/// so an existing persisted history hydrates unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub url: String,
    pub date: String,
}

/// Bounded most-recent-first log of generated results.
pub struct HistoryLog {
    state: Arc<SessionState>,
    store: Arc<dyn Persistence>,
    sink: Arc<dyn RenderSink>,
}

impl HistoryLog {
    pub fn new(
        state: Arc<SessionState>,
        store: Arc<dyn Persistence>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self { state, store, sink }
    }

    /// Records a result at the head, evicting the oldest entry past the
    /// bound, then persists the whole list. Never fails: a store write
    /// error leaves the in-memory list authoritative for the session.
    pub fn record(&self, prompt: &str, url: &str) -> HistoryEntry {
        let entry = HistoryEntry {
            prompt: prompt.to_string(),
            url: url.to_string(),
            date: Local::now().format("%H:%M:%S").to_string(),
        };
        let snapshot = {
            let mut v = self.state.history.write().expect("poisoned");
            v.insert(0, entry.clone());
            if v.len() > MAX_HISTORY_ENTRIES {
                v.pop();
            }
            v.clone()
        };
        if let Err(e) = self.persist(&snapshot) {
            tracing::warn!(error = %e, "history not persisted, keeping in memory");
        }
        self.sink.history_changed(&snapshot);
        entry
    }

    /// Entry at `index`, newest first; out of range returns `None` so the
    /// caller can treat a bad selector as a no-op.
    pub fn select(&self, index: usize) -> Option<HistoryEntry> {
        self.state
            .history
            .read()
            .expect("poisoned")
            .get(index)
            .cloned()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.state.history.read().expect("poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.state.history.read().expect("poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), PersistError> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(keys::HISTORY, &raw)
    }
}
