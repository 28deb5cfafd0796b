//! Persistence port for the curriculum store.
//!
//! The store keeps three collections and mirrors each one to its own slot as
//! a full serialized blob after every mutation. The backend only moves opaque
//! JSON strings; it knows nothing about the domain types, which keeps a file
//! directory and an in-memory fake interchangeable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;

/// The three independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Areas,
    Courses,
    Associations,
}

impl Slot {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Areas => "core_areas.json",
            Self::Courses => "courses.json",
            Self::Associations => "associations.json",
        }
    }
}

/// Where serialized collections live between sessions.
///
/// `load` returning `None` means the slot has never been written (or cannot
/// be read); the store treats both the same as "start empty". `save` rewrites
/// the slot in full.
pub trait StorageBackend: Send + Sync {
    fn load(&self, slot: Slot) -> Option<String>;
    fn save(&self, slot: Slot, json: &str) -> Result<()>;
}

/// File-backed storage: one JSON file per slot inside a directory.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open storage in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "curriculum-board")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::new(dirs.data_dir().to_path_buf())
    }
}

impl StorageBackend for JsonFileStorage {
    fn load(&self, slot: Slot) -> Option<String> {
        std::fs::read_to_string(self.dir.join(slot.file_name())).ok()
    }

    fn save(&self, slot: Slot, json: &str) -> Result<()> {
        std::fs::write(self.dir.join(slot.file_name()), json)?;
        Ok(())
    }
}

/// In-memory storage for tests. Clones share the same blobs, so a test can
/// hand one clone to a store, drop the store, and reopen against the other.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<Slot, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot directly, bypassing the store. Used to simulate corrupt
    /// or legacy blobs.
    pub fn seed(&self, slot: Slot, json: impl Into<String>) {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .insert(slot, json.into());
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, slot: Slot) -> Option<String> {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .get(&slot)
            .cloned()
    }

    fn save(&self, slot: Slot, json: &str) -> Result<()> {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .insert(slot, json.to_string());
        Ok(())
    }
}
