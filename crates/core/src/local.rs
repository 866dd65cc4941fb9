//! Local filesystem access for the upload picker and downloads

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::listing::{sort_listing, ListingItem};

/// Name of the synthetic parent-directory entry
pub const PARENT_ENTRY: &str = "..";

/// One entry in a local directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    /// File or directory name (not a full path)
    pub name: String,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Size in bytes
    pub size: u64,
}

impl LocalEntry {
    /// The synthetic `..` entry
    pub fn parent() -> Self {
        Self {
            name: PARENT_ENTRY.to_string(),
            is_dir: true,
            size: 0,
        }
    }

    /// Whether this is the synthetic `..` entry
    pub fn is_parent(&self) -> bool {
        self.is_dir && self.name == PARENT_ENTRY
    }
}

impl ListingItem for LocalEntry {
    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// Local filesystem operations used by the browser
#[async_trait]
pub trait LocalFs: Send + Sync {
    /// Resolve a path to an absolute, canonical directory path
    async fn resolve_dir(&self, path: &Path) -> Result<PathBuf>;

    /// List a directory: `..` first, hidden entries skipped, rest in listing order
    async fn list_entries(&self, dir: &Path) -> Result<Vec<LocalEntry>>;

    /// Read a whole file
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or replace a file
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// `LocalFs` backed by the real disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

#[async_trait]
impl LocalFs for DiskFs {
    async fn resolve_dir(&self, path: &Path) -> Result<PathBuf> {
        Ok(tokio::fs::canonicalize(path).await?)
    }

    async fn list_entries(&self, dir: &Path) -> Result<Vec<LocalEntry>> {
        let mut reader = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();

        while let Some(item) = reader.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            // Entries that vanish or cannot be stat'ed are left out
            let metadata = match item.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("skipping {}: {e}", item.path().display());
                    continue;
                }
            };

            entries.push(LocalEntry {
                name,
                is_dir: metadata.is_dir(),
                size: metadata.len(),
            });
        }

        sort_listing(&mut entries);
        entries.insert(0, LocalEntry::parent());
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        Ok(tokio::fs::write(path, data).await?)
    }
}
