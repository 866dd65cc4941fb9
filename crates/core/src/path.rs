//! Key and prefix handling
//!
//! Object keys are treated as `/`-separated paths. Directory keys are stored
//! without a trailing slash (`photos/2024`); the slash is only appended when a
//! listing prefix is sent to the store.

use crate::error::{Error, Result};

/// A location inside a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    /// Bucket name
    pub bucket: String,
    /// Object key or directory key (empty for bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            bucket: bucket.into(),
            key: key.trim_end_matches('/').to_string(),
        }
    }

    /// Prefix used to list the children of this path (`dir/` or empty at root)
    pub fn listing_prefix(&self) -> String {
        listing_prefix(&self.key)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}", self.bucket)
        } else {
            write!(f, "{}/{}", self.bucket, self.key)
        }
    }
}

/// Prefix that lists the children of `key`
pub fn listing_prefix(key: &str) -> String {
    let key = key.trim_end_matches('/');
    if key.is_empty() {
        String::new()
    } else {
        format!("{key}/")
    }
}

/// Last `/`-separated segment of a key
pub fn base_name(key: &str) -> &str {
    let key = key.trim_end_matches('/');
    match key.rfind('/') {
        Some(pos) => &key[pos + 1..],
        None => key,
    }
}

/// Key with its last segment removed (empty at depth one)
pub fn parent_key(key: &str) -> String {
    let key = key.trim_end_matches('/');
    match key.rfind('/') {
        Some(pos) => key[..pos].to_string(),
        None => String::new(),
    }
}

/// Join a name onto a directory key
pub fn join_key(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Split a file name into stem and extension (extension keeps its dot)
///
/// A leading dot does not start an extension: `.env` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

/// Destination key for pasting `source_key` into directory `dir`
///
/// When the plain destination is already taken, `_copy_N` is inserted before
/// the extension with the smallest `N >= 1` that is not taken.
pub fn paste_destination(dir: &str, source_key: &str, taken: impl Fn(&str) -> bool) -> String {
    let file_name = base_name(source_key);
    let plain = join_key(dir, file_name);
    if !taken(&plain) {
        return plain;
    }

    let (stem, ext) = split_extension(file_name);
    (1..)
        .map(|n| join_key(dir, &format!("{stem}_copy_{n}{ext}")))
        .find(|candidate| !taken(candidate))
        .unwrap_or(plain)
}

/// Validate a single path segment typed by the user
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("Name cannot be empty".into()));
    }

    if name.contains('/') {
        return Err(Error::Validation("Name cannot contain '/'".into()));
    }

    if name == "." || name == ".." {
        return Err(Error::Validation("'.' and '..' are reserved names".into()));
    }

    if name.len() > 1024 {
        return Err(Error::InvalidKey(format!(
            "name is {} bytes, keys are limited to 1024",
            name.len()
        )));
    }

    Ok(())
}
