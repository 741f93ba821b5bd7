use crate::board::ReferenceImage;
use crate::history::HistoryEntry;

/// Notifications the core emits toward whatever draws the screen.
///
/// The core never renders: managers mutate state and report through this
/// trait, and a front end subscribes. Implementations run on the caller's
/// task and must not block.
pub trait RenderSink: Send + Sync {
    /// A display call entered its loading phase.
    fn loading_started(&self) {}
    /// A display call succeeded. `shown` is the path or source to draw and
    /// `download_name` the suggested save-as filename.
    fn result_ready(&self, _shown: &str, _download_name: &str) {}
    /// Acquisition failed; the original source is shown as a degraded
    /// fallback, with a download reference still offered.
    fn acquisition_failed(&self, _original: &str, _download_name: &str) {}
    fn history_changed(&self, _entries: &[HistoryEntry]) {}
    fn board_changed(&self, _images: &[ReferenceImage]) {}
    /// The board crossed into capacity; emitted once per crossing.
    fn board_full(&self, _limit: usize) {}
}

/// Sink that ignores everything; headless sessions and tests.
#[derive(Default)]
pub struct NoopRenderSink;

impl RenderSink for NoopRenderSink {}
