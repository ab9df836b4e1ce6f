use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single local key-value storage slot holding the board's textual
/// encoding. The store is written against this seam so unit tests can run
/// against [`MemorySlot`] instead of a real file.
pub trait Slot {
    /// Read the slot's contents, `None` when the slot has never been written.
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replace the slot's contents.
    fn write(&mut self, contents: &str) -> Result<(), SlotError>;
}

/// File-backed slot. An absent file reads as an empty slot; writing creates
/// parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory slot for tests. Counts writes so write-through behavior can be
/// asserted operation by operation.
#[derive(Debug, Default, Clone)]
pub struct MemorySlot {
    contents: Option<String>,
    writes: usize,
}

impl MemorySlot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot pre-seeded with stored text, as if a previous session wrote it.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of writes performed since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), SlotError> {
        self.contents = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }
}
