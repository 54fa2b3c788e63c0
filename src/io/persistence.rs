use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

/// Error type for the raw byte store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("could not encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Byte-oriented key-value slot the task list is persisted into.
///
/// `load` returns `Ok(None)` when nothing has been saved yet; only genuine
/// failures are errors. Callers treat every error as non-fatal.
pub trait PersistenceAdapter {
    fn load(&mut self) -> Result<Option<Vec<u8>>, StorageError>;
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Tasks stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// `<data dir>/checklist/tasks.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("checklist").join("tasks.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceAdapter for FileStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        atomic_write(&self.path, bytes).map_err(|e| self.io_error(e))
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory slot. Clones share the same bytes, so a caller can keep a
/// handle to inspect what the store last saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        MemoryStore {
            slot: Rc::new(RefCell::new(Some(bytes.into()))),
        }
    }

    /// Bytes from the most recent save, if any
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.slot.borrow().clone()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }
}
