use std::sync::atomic::Ordering;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};

use crate::render::RenderSink;
use crate::state::SessionState;
use crate::MAX_REFERENCE_IMAGES;

/// A reference image carried for the next generation request, kept as a
/// self-contained data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub data_uri: String,
    pub mime: String,
}

/// What became of an `add` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Payload did not sniff as an image; dropped without ceremony.
    NotAnImage,
    /// Board already at capacity; the submission was rejected.
    Full,
}

/// The bounded set of user-supplied reference images.
///
/// Retention differs from history on purpose: at capacity new submissions
/// are rejected outright, nothing is evicted.
pub struct ReferenceBoard {
    state: Arc<SessionState>,
    sink: Arc<dyn RenderSink>,
}

impl ReferenceBoard {
    pub fn new(state: Arc<SessionState>, sink: Arc<dyn RenderSink>) -> Self {
        Self { state, sink }
    }

    /// Encodes `bytes` into a data URI off-thread and appends it to the
    /// board. The capacity check runs after the encode completes, against
    /// the live collection, so overlapping adds can never push the board
    /// past the limit. The full-board notification fires once per
    /// crossing, not once per rejected submission.
    pub async fn add(&self, bytes: Vec<u8>) -> AddOutcome {
        let encoded = match tokio::task::spawn_blocking(move || encode_data_uri(&bytes)).await {
            Ok(Some(img)) => img,
            Ok(None) => {
                tracing::debug!("non-image payload dropped");
                return AddOutcome::NotAnImage;
            }
            Err(e) => {
                tracing::warn!(error = %e, "encode worker failed");
                return AddOutcome::NotAnImage;
            }
        };

        let (snapshot, notify) = {
            let mut refs = self.state.refs.write().expect("poisoned");
            if refs.len() >= MAX_REFERENCE_IMAGES {
                let notify = !self.state.refs_full_notified.swap(true, Ordering::SeqCst);
                (None, notify)
            } else {
                refs.push(encoded);
                (Some(refs.clone()), false)
            }
        };
        match snapshot {
            Some(images) => {
                self.sink.board_changed(&images);
                AddOutcome::Added
            }
            None => {
                if notify {
                    self.sink.board_full(MAX_REFERENCE_IMAGES);
                }
                AddOutcome::Full
            }
        }
    }

    /// Removes the image at `index`; out of range is a no-op. Dropping
    /// below the limit re-arms the full-board notification. The re-arm
    /// happens under the same lock as the size change so a rejected add
    /// landing in between cannot read a stale latch.
    pub fn remove(&self, index: usize) {
        let snapshot = {
            let mut refs = self.state.refs.write().expect("poisoned");
            if index >= refs.len() {
                return;
            }
            refs.remove(index);
            self.state.refs_full_notified.store(false, Ordering::SeqCst);
            refs.clone()
        };
        self.sink.board_changed(&snapshot);
    }

    pub fn clear(&self) {
        let snapshot = {
            let mut refs = self.state.refs.write().expect("poisoned");
            refs.clear();
            self.state.refs_full_notified.store(false, Ordering::SeqCst);
            refs.clone()
        };
        self.sink.board_changed(&snapshot);
    }

    pub fn images(&self) -> Vec<ReferenceImage> {
        self.state.refs.read().expect("poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.state.refs.read().expect("poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_REFERENCE_IMAGES
    }
}

/// Sniffs the payload and, when it is an image, wraps it as a
/// `data:<mime>;base64,...` string.
fn encode_data_uri(bytes: &[u8]) -> Option<ReferenceImage> {
    let format = image::guess_format(bytes).ok()?;
    let mime = format.to_mime_type();
    let payload = general_purpose::STANDARD.encode(bytes);
    Some(ReferenceImage {
        data_uri: format!("data:{mime};base64,{payload}"),
        mime: mime.to_string(),
    })
}
