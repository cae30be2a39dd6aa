//! Persistence of the best level reached.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{StoreError, StoreResult};

/// Single integer slot holding the best level ever reached.
pub trait BestLevelStore {
    /// Read the stored value. An empty slot reads as 0.
    fn load(&self) -> StoreResult<u32>;

    /// Overwrite the stored value.
    fn save(&mut self, level: u32) -> StoreResult<()>;
}

/// In-memory slot for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
    saves: usize,
}

impl MemoryStore {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot already holding `level`.
    pub fn with_value(level: u32) -> Self {
        Self {
            value: Some(level),
            saves: 0,
        }
    }

    /// How many times [`BestLevelStore::save`] was called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BestLevelStore for MemoryStore {
    fn load(&self) -> StoreResult<u32> {
        Ok(self.value.unwrap_or(0))
    }

    fn save(&mut self, level: u32) -> StoreResult<()> {
        self.value = Some(level);
        self.saves += 1;
        Ok(())
    }
}

/// A slot stored as `<dir>/<key>.json` holding a bare JSON integer.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Key used when none is given.
    pub const DEFAULT_KEY: &'static str = "best_level";

    /// Slot `key` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// The default slot inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, Self::DEFAULT_KEY)
    }

    /// The default slot in the platform's per-user data directory.
    pub fn default_location() -> StoreResult<Self> {
        let dirs = ProjectDirs::from("", "", "mathbox").ok_or(StoreError::NoDataDir)?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the slot. Deleting a missing slot is not an error.
    pub fn clear(&self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl BestLevelStore for FileStore {
    fn load(&self) -> StoreResult<u32> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(text.trim())?)
    }

    fn save(&mut self, level: u32) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Replace the slot atomically.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string(&level)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
