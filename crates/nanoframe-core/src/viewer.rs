use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use thiserror::Error;

use crate::render::RenderSink;
use crate::scratch::{ResourceHandle, ScratchStore};
use crate::state::SessionState;

/// Where the viewer is in its display lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Loading,
    Displaying,
    Failed,
}

/// Why an acquisition attempt failed.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("proxy returned status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("source is neither a URL, a data URI, nor a readable file")]
    Unsupported,
}

/// Terminal result of a `display` call.
#[derive(Debug)]
pub enum DisplayOutcome {
    /// The source was acquired and decoded; `shown` is what the render
    /// layer was given to draw.
    Displayed {
        shown: String,
        download_name: String,
    },
    /// Acquisition failed; the original source was shown directly.
    Fallback {
        original: String,
        download_name: String,
        error: AcquireError,
    },
    /// A newer display call was issued while this one was in flight.
    Superseded,
}

/// Tunables for the viewer. The proxy template itself lives in
/// [`SessionState`].
pub struct ViewerConfig {
    pub scratch_dir: PathBuf,
    pub fetch_timeout: Duration,
}

impl ViewerConfig {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            fetch_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Turns a source reference into something displayable.
///
/// One display is conceptually active at a time. Every call takes a fresh
/// sequence number; a completion that is no longer the latest mutates
/// nothing and releases whatever it produced. The currently displayed
/// scratch file is owned here and released when superseded or cleared.
pub struct Viewer {
    session: Arc<SessionState>,
    http: reqwest::Client,
    scratch: ScratchStore,
    sink: Arc<dyn RenderSink>,
    seq: AtomicU64,
    state: Mutex<DisplayState>,
    current: Mutex<Option<ResourceHandle>>,
}

impl Viewer {
    pub fn new(
        session: Arc<SessionState>,
        config: ViewerConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, AcquireError> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        let scratch = ScratchStore::new(&config.scratch_dir)?;
        Ok(Self {
            session,
            http,
            scratch,
            sink,
            seq: AtomicU64::new(0),
            state: Mutex::new(DisplayState::Idle),
            current: Mutex::new(None),
        })
    }

    pub fn state(&self) -> DisplayState {
        *self.state.lock().expect("poisoned")
    }

    /// Displays `source`, fetching through the proxy when it is remote.
    ///
    /// Never fails the caller: errors degrade to a fallback display of the
    /// original source plus one notification through the sink.
    pub async fn display(&self, source: &str, caption: &str) -> DisplayOutcome {
        // Token issue and the Loading transition share one critical
        // section, so entries are ordered by token and a superseded
        // call can never stamp Loading over a newer result.
        let token = {
            let mut state = self.state.lock().expect("poisoned");
            let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            *state = DisplayState::Loading;
            token
        };
        tracing::debug!(token, caption, source, "display requested");
        self.sink.loading_started();

        let acquired = self.acquire(source).await;
        let download_name = download_name_now();

        let mut current = self.current.lock().expect("poisoned");
        if self.seq.load(Ordering::SeqCst) != token {
            drop(current);
            if let Ok(Some(mut handle)) = acquired {
                handle.release();
            }
            tracing::debug!(token, "stale display result discarded");
            return DisplayOutcome::Superseded;
        }
        match acquired {
            Ok(handle) => {
                let shown = match &handle {
                    Some(h) => h.location(),
                    None => source.to_string(),
                };
                if let Some(mut old) = std::mem::replace(&mut *current, handle) {
                    old.release();
                }
                *self.state.lock().expect("poisoned") = DisplayState::Displaying;
                drop(current);
                tracing::debug!(token, shown = %shown, "displaying");
                self.sink.result_ready(&shown, &download_name);
                DisplayOutcome::Displayed {
                    shown,
                    download_name,
                }
            }
            Err(error) => {
                if let Some(mut old) = current.take() {
                    old.release();
                }
                *self.state.lock().expect("poisoned") = DisplayState::Failed;
                drop(current);
                tracing::warn!(token, error = %error, "acquisition failed, showing the original source");
                self.sink.acquisition_failed(source, &download_name);
                DisplayOutcome::Fallback {
                    original: source.to_string(),
                    download_name,
                    error,
                }
            }
        }
    }

    /// Drops the current display and its scratch file. Anything still in
    /// flight completes as stale.
    pub fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.lock().expect("poisoned");
        if let Some(mut handle) = current.take() {
            handle.release();
        }
        *self.state.lock().expect("poisoned") = DisplayState::Idle;
    }

    /// Fetch-or-pass-through plus decode verification. Remote sources come
    /// back as an owned scratch handle; local ones display as-is.
    async fn acquire(&self, source: &str) -> Result<Option<ResourceHandle>, AcquireError> {
        if is_remote(source) {
            let bytes = self.fetch_via_proxy(source).await?;
            let (bytes, format) = decode_image(bytes).await?;
            let ext = format.extensions_str().first().copied().unwrap_or("png");
            let handle = self.scratch.put(&bytes, ext)?;
            Ok(Some(handle))
        } else if let Some(payload) = data_uri_payload(source) {
            let bytes = general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| AcquireError::Decode(e.to_string()))?;
            decode_image(bytes).await?;
            Ok(None)
        } else {
            let path = PathBuf::from(source);
            if !path.is_file() {
                return Err(AcquireError::Unsupported);
            }
            let bytes = tokio::task::spawn_blocking(move || std::fs::read(path))
                .await
                .map_err(|e| AcquireError::Decode(e.to_string()))??;
            decode_image(bytes).await?;
            Ok(None)
        }
    }

    async fn fetch_via_proxy(&self, url: &str) -> Result<Vec<u8>, AcquireError> {
        let proxied = format!("{}{}", self.session.proxy_url(), urlencoding::encode(url));
        let resp = self.http.get(&proxied).send().await?;
        if !resp.status().is_success() {
            return Err(AcquireError::Status(resp.status().as_u16()));
        }
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Decode verification on a blocking worker; hands the bytes back with the
/// sniffed format on success.
async fn decode_image(bytes: Vec<u8>) -> Result<(Vec<u8>, image::ImageFormat), AcquireError> {
    tokio::task::spawn_blocking(move || {
        let format = image::guess_format(&bytes).map_err(|e| AcquireError::Decode(e.to_string()))?;
        image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| AcquireError::Decode(e.to_string()))?;
        Ok((bytes, format))
    })
    .await
    .map_err(|e| AcquireError::Decode(e.to_string()))?
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn data_uri_payload(source: &str) -> Option<&str> {
    let rest = source.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    Some(payload)
}

fn download_name_now() -> String {
    format!("nano-thumbnail-{}.png", Utc::now().timestamp_millis())
}
