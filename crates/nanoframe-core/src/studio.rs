use std::sync::Arc;

use crate::board::ReferenceBoard;
use crate::history::HistoryLog;
use crate::persist::{keys, Persistence};
use crate::render::RenderSink;
use crate::state::SessionState;
use crate::viewer::{AcquireError, Viewer, ViewerConfig};

/// Composition root: one session's state with its managers wired over a
/// shared store and render sink.
pub struct Studio {
    state: Arc<SessionState>,
    store: Arc<dyn Persistence>,
    pub history: HistoryLog,
    pub board: ReferenceBoard,
    pub viewer: Viewer,
}

impl Studio {
    pub fn open(
        proxy_url: impl Into<String>,
        config: ViewerConfig,
        store: Arc<dyn Persistence>,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, AcquireError> {
        let state = Arc::new(SessionState::load(store.as_ref(), proxy_url));
        let history = HistoryLog::new(state.clone(), store.clone(), sink.clone());
        let board = ReferenceBoard::new(state.clone(), sink.clone());
        let viewer = Viewer::new(state.clone(), config, sink)?;
        Ok(Self {
            state,
            store,
            history,
            board,
            viewer,
        })
    }

    /// Stores the trimmed key in memory and durably. The empty string is
    /// the "unset" sentinel, not an error.
    pub fn set_api_key(&self, key: &str) {
        let key = key.trim();
        self.state.set_api_key(key);
        if let Err(e) = self.store.set(keys::API_KEY, key) {
            tracing::warn!(error = %e, "access key not persisted, keeping in memory");
        }
    }

    pub fn api_key(&self) -> String {
        self.state.api_key()
    }

    pub fn has_api_key(&self) -> bool {
        self.state.has_api_key()
    }
}
