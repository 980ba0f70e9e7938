use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::foundation::error::{WdpError, WdpResult};

/// Retrieves the raw bytes of an archive from a location string.
pub trait Fetcher {
    fn fetch(&self, location: &str) -> WdpResult<Vec<u8>>;
}

/// Reads archives from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against `root` when set.
#[derive(Clone, Debug, Default)]
pub struct FsFetcher {
    root: Option<PathBuf>,
}

impl FsFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let raw = location.strip_prefix("file://").unwrap_or(location);
        let path = Path::new(raw);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, location: &str) -> WdpResult<Vec<u8>> {
        let path = self.resolve(location);
        std::fs::read(&path).map_err(|source| WdpError::Fetch {
            location: location.to_string(),
            source,
        })
    }
}

/// Serves archives from memory, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.blobs.insert(location.into(), bytes);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, location: &str) -> WdpResult<Vec<u8>> {
        self.blobs
            .get(location)
            .cloned()
            .ok_or_else(|| WdpError::Fetch {
                location: location.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such blob"),
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/fetch.rs"]
mod tests;
