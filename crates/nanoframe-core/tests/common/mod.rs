#![allow(dead_code)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use nanoframe_core::{HistoryEntry, PersistError, Persistence, ReferenceImage, RenderSink};

/// Sink that counts and remembers notifications for assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub loading: AtomicUsize,
    pub results: Mutex<Vec<(String, String)>>,
    pub failures: Mutex<Vec<(String, String)>>,
    pub history_events: AtomicUsize,
    pub board_events: AtomicUsize,
    pub full_events: AtomicUsize,
}

impl RenderSink for RecordingSink {
    fn loading_started(&self) {
        self.loading.fetch_add(1, Ordering::SeqCst);
    }
    fn result_ready(&self, shown: &str, download_name: &str) {
        self.results
            .lock()
            .unwrap()
            .push((shown.to_string(), download_name.to_string()));
    }
    fn acquisition_failed(&self, original: &str, download_name: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((original.to_string(), download_name.to_string()));
    }
    fn history_changed(&self, _entries: &[HistoryEntry]) {
        self.history_events.fetch_add(1, Ordering::SeqCst);
    }
    fn board_changed(&self, _images: &[ReferenceImage]) {
        self.board_events.fetch_add(1, Ordering::SeqCst);
    }
    fn board_full(&self, _limit: usize) {
        self.full_events.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store whose writes always fail, for exercising the keep-in-memory
/// behavior. Counts attempts so tests can assert the write happened.
#[derive(Default)]
pub struct FailingStore {
    pub writes: AtomicUsize,
}

impl Persistence for FailingStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(PersistError::Io(std::io::Error::other("quota exceeded")))
    }
}

/// Tiny valid PNG for feeding the decoders.
pub fn png_bytes() -> Vec<u8> {
    png_bytes_colored(0)
}

/// Same, with a distinguishable pixel value so payloads differ.
pub fn png_bytes_colored(shade: u8) -> Vec<u8> {
    use image::{ImageBuffer, Rgba, RgbaImage};
    let mut img: RgbaImage = ImageBuffer::new(2, 2);
    for p in img.pixels_mut() {
        *p = Rgba([shade, 255, 0, 255]);
    }
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("png encode");
    buf.into_inner()
}

pub fn png_data_uri() -> String {
    use base64::{engine::general_purpose, Engine as _};
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png_bytes())
    )
}
