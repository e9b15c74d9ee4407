use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::store::{Result, StoreError};

/// Minimal persistent string map. Implementations must make `set` visible to
/// later `get` calls on the same medium, including after a restart.
pub trait KeyValueStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str) -> Result<()>;
}

/// One file per entry under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Opens the store in the per-user data directory.
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fiszki");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            name: base_dir.display().to_string(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !name.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> Option<String> {
        let path = self.entry_path(name).ok()?;
        fs::read_to_string(path).ok()
    }

    /// Writes to a `.tmp` sibling and renames it over the entry, so readers see
    /// either the old or the new value.
    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let path = self.entry_path(name)?;
        let tmp_path = path.with_extension("tmp");
        let io_err = |source| StoreError::Io {
            name: name.to_string(),
            source,
        };

        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp_path, &path).map_err(io_err)?;
        Ok(())
    }
}

/// In-memory store used by tests and as a fallback when no data directory
/// can be created.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: &str, value: &str) -> Self {
        self.entries.insert(name.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.entries.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
