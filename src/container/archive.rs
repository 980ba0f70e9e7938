use std::{
    collections::BTreeMap,
    io::{Cursor, Read},
};

use anyhow::Context;

use crate::foundation::error::{WdpError, WdpResult};

/// Named-entry lookup over an unpacked archive.
pub trait ArchiveEntries {
    /// Read the bytes of entry `name`, or `Ok(None)` when the archive has no such entry.
    fn read_entry(&mut self, name: &str) -> WdpResult<Option<Vec<u8>>>;

    /// Names of every entry, or `None` when the unpacker cannot list them.
    fn entry_names(&self) -> Option<Vec<String>> {
        None
    }
}

/// ZIP-backed entries over an owned byte buffer.
pub struct ZipEntries {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
    byte_len: u64,
}

impl ZipEntries {
    /// Index the central directory of `bytes`.
    ///
    /// Fails with [`WdpError::Archive`] when the bytes are not a ZIP archive.
    pub fn from_bytes(bytes: Vec<u8>) -> WdpResult<Self> {
        let byte_len = bytes.len() as u64;
        let archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| WdpError::archive(format!("not a readable WDP archive: {e}")))?;
        Ok(Self { archive, byte_len })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }
}

impl std::fmt::Debug for ZipEntries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipEntries")
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl ArchiveEntries for ZipEntries {
    fn read_entry(&mut self, name: &str) -> WdpResult<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(WdpError::archive(format!("open entry '{name}': {e}"))),
        };

        // Declared sizes are untrusted; never reserve more than the archive itself holds.
        let reserve = file.size().min(self.byte_len);
        let mut buf = Vec::with_capacity(usize::try_from(reserve).unwrap_or(0));
        file.read_to_end(&mut buf)
            .with_context(|| format!("read entry '{name}'"))?;
        Ok(Some(buf))
    }

    fn entry_names(&self) -> Option<Vec<String>> {
        Some(self.names())
    }
}

/// In-memory entries, for callers that unpack archives themselves.
#[derive(Clone, Debug, Default)]
pub struct MemoryEntries {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveEntries for MemoryEntries {
    fn read_entry(&mut self, name: &str) -> WdpResult<Option<Vec<u8>>> {
        Ok(self.entries.get(name).cloned())
    }

    fn entry_names(&self) -> Option<Vec<String>> {
        Some(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/archive.rs"]
mod tests;
