use nanoframe_core::{ReferenceImage, RenderSink, MAX_REFERENCE_IMAGES};

/// Renders studio events as terminal lines. Status goes to stdout,
/// complaints to stderr.
pub struct TermSink;

impl RenderSink for TermSink {
    fn loading_started(&self) {
        println!("loading...");
    }

    fn result_ready(&self, shown: &str, download_name: &str) {
        println!("displaying {shown}");
        println!("save as {download_name}");
    }

    fn acquisition_failed(&self, original: &str, download_name: &str) {
        eprintln!("could not load image; showing original {original}");
        println!("displaying {original}");
        println!("save as {download_name}");
    }

    fn board_changed(&self, images: &[ReferenceImage]) {
        println!("board {}/{}", images.len(), MAX_REFERENCE_IMAGES);
    }

    fn board_full(&self, limit: usize) {
        eprintln!("board is full ({limit} images max)");
    }
}
