use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};

/// Scratch-file home for fetched image bytes.
///
/// Names carry a content-hash prefix for debuggability plus a nanosecond
/// suffix, so two handles never share a file even for identical bytes.
pub struct ScratchStore {
    root: PathBuf,
}

impl ScratchStore {
    pub fn new<P: AsRef<Path>>(root: P) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Materializes `bytes` as a file and hands back the owning handle.
    pub fn put(&self, bytes: &[u8], ext: &str) -> std::io::Result<ResourceHandle> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hex::encode(hasher.finalize());
        let ns = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let path = self.root.join(format!("{}-{:x}.{}", &digest[..16], ns, ext));
        let mut f = fs::File::create(&path)?;
        f.write_all(bytes)?;
        Ok(ResourceHandle {
            path,
            len: bytes.len() as u64,
            released: false,
        })
    }
}

/// Owning reference to a materialized scratch file.
///
/// Whoever displays the file keeps the handle; releasing it deletes the
/// backing file so superseded displays cannot pile up on disk. `Drop`
/// releases as a backstop.
#[derive(Debug)]
pub struct ResourceHandle {
    path: PathBuf,
    len: u64,
    released: bool,
}

impl ResourceHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display string for render layers.
    pub fn location(&self) -> String {
        self.path.display().to_string()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deletes the backing file. Idempotent; a second call is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %self.path.display(), error = %e, "scratch file not removed");
            }
        }
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.release();
    }
}
