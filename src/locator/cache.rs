use crate::error::{LocatorError, Result};
use indexmap::IndexMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default location of the persisted selector mappings
pub const DEFAULT_CACHE_PATH: &str = "locator_cache.json";

/// Persisted original-selector → healed-selector mapping.
///
/// The backing document is read once, on first use, and rewritten whole on
/// every upsert. The in-memory mapping only changes once the rewrite has
/// landed. There is no cross-process locking: concurrent writers race and the
/// last complete document wins.
#[derive(Debug)]
pub struct MappingCache {
    path: PathBuf,
    entries: Option<IndexMap<String, String>>,
}

impl MappingCache {
    /// Bind a cache to `path` without touching the filesystem
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a cache document strictly. A missing file is an empty mapping;
    /// anything unreadable or malformed is a `CacheRead` error.
    pub fn read_document(path: &Path) -> Result<IndexMap<String, String>> {
        let read_err = |reason: String| LocatorError::CacheRead {
            path: path.display().to_string(),
            reason,
        };

        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| read_err(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(IndexMap::new()),
            Err(e) => Err(read_err(e.to_string())),
        }
    }

    fn entries(&mut self) -> &mut IndexMap<String, String> {
        let path = &self.path;
        self.entries.get_or_insert_with(|| {
            Self::read_document(path).unwrap_or_else(|e| {
                log::warn!("{}; starting with an empty cache", e);
                IndexMap::new()
            })
        })
    }

    /// Healed selector recorded for `original`
    pub fn lookup(&mut self, original: &str) -> Option<String> {
        self.entries().get(original).cloned()
    }

    /// Record `original → healed`, replacing any previous value, and rewrite
    /// the backing document
    pub fn upsert(&mut self, original: &str, healed: &str) -> Result<()> {
        let mut next = self.entries().clone();
        next.insert(original.to_string(), healed.to_string());
        self.replace(next)
    }

    /// Drop every mapping and rewrite the document
    pub fn clear(&mut self) -> Result<()> {
        self.replace(IndexMap::new())
    }

    pub fn len(&mut self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Copy of the current mapping, in insertion order
    pub fn snapshot(&mut self) -> IndexMap<String, String> {
        self.entries().clone()
    }

    fn replace(&mut self, next: IndexMap<String, String>) -> Result<()> {
        self.persist(&next)?;
        self.entries = Some(next);
        Ok(())
    }

    fn persist(&self, entries: &IndexMap<String, String>) -> Result<()> {
        let write_err = |reason: String| LocatorError::CacheWrite {
            path: self.path.display().to_string(),
            reason,
        };

        let json = serde_json::to_string_pretty(entries).map_err(|e| write_err(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;

        // Each writer gets its own temp file beside the target; the rename is atomic
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(json.as_bytes()).map_err(|e| write_err(e.to_string()))?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error.to_string()))?;

        Ok(())
    }
}
