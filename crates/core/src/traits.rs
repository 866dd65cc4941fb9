//! ObjectStore trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It allows the browser to be decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::Result;
use crate::listing::ListingItem;
use crate::path::{base_name, RemotePath};

/// One object or directory-like prefix in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full key, without trailing slash for directories
    ///
    /// An object `a` and a prefix `a/` end up with the same key; check
    /// `is_dir` too when the two must be told apart.
    pub key: String,

    /// Whether this is a directory/prefix
    pub is_dir: bool,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modified timestamp (None for directories)
    pub last_modified: Option<Timestamp>,
}

impl Entry {
    /// Create a new Entry for a file
    pub fn file(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            is_dir: false,
            size,
            last_modified: None,
        }
    }

    /// Create a new Entry for a directory/prefix
    pub fn dir(key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            key: key.trim_end_matches('/').to_string(),
            is_dir: true,
            size: 0,
            last_modified: None,
        }
    }

    /// Set the last modified timestamp
    pub fn modified_at(mut self, timestamp: Timestamp) -> Self {
        self.last_modified = Some(timestamp);
        self
    }

    /// Last segment of the key
    pub fn name(&self) -> &str {
        base_name(&self.key)
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.size, humansize::BINARY)
    }
}

impl ListingItem for Entry {
    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn sort_name(&self) -> &str {
        &self.key
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
/// Retries and backoff are the implementor's business.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the immediate children of a directory key
    ///
    /// Sub-prefixes come back as directory entries, objects as files.
    async fn list_entries(&self, dir: &RemotePath) -> Result<Vec<Entry>>;

    /// List every object below a directory key, at any depth
    async fn list_descendants(&self, dir: &RemotePath) -> Result<Vec<Entry>>;

    /// Get object content as bytes
    async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>>;

    /// Upload an object
    async fn put_object(
        &self,
        path: &RemotePath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()>;

    /// Delete an object
    async fn delete_object(&self, path: &RemotePath) -> Result<()>;

    /// Server-side copy within the store
    async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()>;

    /// Check that a bucket exists and the credentials can reach it
    async fn bucket_accessible(&self, bucket: &str) -> Result<()>;
}
