//! Opaque blob persistence.
//!
//! The host hands the plugin one byte blob to keep state in.  [`BlobStore`]
//! is that contract; [`FileStore`] backs it with a file on disk and
//! [`MemoryStore`] keeps it in memory for tests and embedding.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Load/save access to a single opaque byte blob.
pub trait BlobStore: Send + Sync {
    /// Return the stored blob, or an empty vec if nothing was saved yet.
    fn load(&self) -> Result<Vec<u8>>;

    /// Replace the stored blob.
    fn save(&self, blob: &[u8]) -> Result<()>;
}

/// A blob kept in a single file.
///
/// A missing file loads as an empty blob.  Saves go to a sibling temporary
/// file that is then renamed over the target, so a reader never sees a
/// half-written blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BlobStore for FileStore {
    fn load(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, blob).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("renaming {} to {}", tmp.display(), self.path.display()))
    }
}

/// A blob held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `blob` already stored.
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Mutex::new(blob.into()),
        }
    }
}

impl BlobStore for MemoryStore {
    fn load(&self) -> Result<Vec<u8>> {
        let blob = self
            .blob
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(blob.clone())
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        let mut stored = self
            .blob
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        *stored = blob.to_vec();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
