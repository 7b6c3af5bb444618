//! Key/value persistence providers. Each key holds one whole JSON snapshot.

use crate::error::{Result, TallyError};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod keys {
    pub const PAYMENTS: &str = "st_payments";
    pub const RECEIVABLES: &str = "st_receivables";
    pub const INVENTORY: &str = "st_inventory";
    pub const FAVORITES: &str = "st_favorites";
    pub const LEDGERS: &str = "st_ledgers";
    pub const DEBITS: &str = "st_debits";
}

/// The six persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Payments,
    Receivables,
    Inventory,
    Favorites,
    Ledgers,
    Debits,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Payments => keys::PAYMENTS,
            Collection::Receivables => keys::RECEIVABLES,
            Collection::Inventory => keys::INVENTORY,
            Collection::Favorites => keys::FAVORITES,
            Collection::Ledgers => keys::LEDGERS,
            Collection::Debits => keys::DEBITS,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, json: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, json: &str) -> Self {
        self.entries.insert(key.to_string(), json.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, json: &str) -> Result<()> {
        self.entries.insert(key.to_string(), json.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TallyError::Io(e)),
        }
    }

    /// Write to a sibling temp file, then rename over the target.
    fn set(&mut self, key: &str, json: &str) -> Result<()> {
        let target = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(json.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}
