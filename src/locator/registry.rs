use crate::error::{LocatorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// Default location of the offline-built registry
pub const DEFAULT_REGISTRY_PATH: &str = "selector_registry.json";

/// One known control on a route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryEntry {
    pub selector: String,

    #[serde(alias = "class")]
    pub classification: String,
}

impl RegistryEntry {
    pub fn new(selector: impl Into<String>, classification: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            classification: classification.into(),
        }
    }
}

/// Route → known controls, produced by an offline crawl. Read-only here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Registry {
    routes: IndexMap<String, Vec<RegistryEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry document
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read the registry at `path`. A missing file is an empty registry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_err = |reason: String| LocatorError::RegistryRead {
            path: path.display().to_string(),
            reason,
        };

        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map_err(|e| read_err(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(read_err(e.to_string())),
        }
    }

    /// Like [`load`](Self::load), but an unreadable registry only disables the boost
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}; continuing without registry boost", e);
            Self::new()
        })
    }

    /// Builder method: append a known control to a route
    pub fn with_entry(mut self, route: impl Into<String>, entry: RegistryEntry) -> Self {
        self.routes.entry(route.into()).or_default().push(entry);
        self
    }

    /// Recorded classification of `selector`, searching `route` first and
    /// then every route in document order
    pub fn classification_for(&self, route: Option<&str>, selector: &str) -> Option<&str> {
        fn find<'a>(entries: &'a [RegistryEntry], selector: &str) -> Option<&'a str> {
            entries
                .iter()
                .find(|entry| entry.selector == selector)
                .map(|entry| entry.classification.as_str())
        }

        route
            .and_then(|r| self.routes.get(r))
            .and_then(|entries| find(entries, selector))
            .or_else(|| self.routes.values().find_map(|entries| find(entries, selector)))
    }

    pub fn entries(&self, route: &str) -> &[RegistryEntry] {
        self.routes.get(route).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
