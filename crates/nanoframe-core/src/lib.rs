//! nanoframe-core: session state, bounded collections, and the image
//! acquisition pipeline behind the Nanoframe front end.
//!
//! The crate owns no rendering. Managers mutate [`SessionState`], persist
//! what must survive a restart, and report through [`RenderSink`]; a front
//! end subscribes and draws.

pub mod board;
pub mod history;
pub mod persist;
pub mod render;
pub mod scratch;
pub mod state;
pub mod studio;
pub mod viewer;

pub use board::{AddOutcome, ReferenceBoard, ReferenceImage};
pub use history::{HistoryEntry, HistoryLog};
pub use persist::{FileStore, MemStore, PersistError, Persistence};
pub use render::{NoopRenderSink, RenderSink};
pub use scratch::{ResourceHandle, ScratchStore};
pub use state::SessionState;
pub use studio::Studio;
pub use viewer::{AcquireError, DisplayOutcome, DisplayState, Viewer, ViewerConfig};

/// Hard cap on stored history entries; the oldest entry is evicted past it.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Hard cap on reference images; additions past it are rejected.
pub const MAX_REFERENCE_IMAGES: usize = 14;

/// Proxy template the front end has always shipped with; the remote image
/// URL is percent-encoded and appended.
pub const DEFAULT_PROXY_URL: &str = "https://corsproxy.io/?";
