//! Connection credentials
//!
//! Credentials are read from an s3cmd-compatible `.s3cfg` file so an existing
//! s3cmd setup works unchanged. Only the `[default]` section is used.

use std::path::{Path, PathBuf};

use ini::Ini;
use url::Url;

use crate::error::{Error, Result};

/// Section holding the connection settings
const SECTION: &str = "default";

/// Default endpoint host
pub const DEFAULT_HOST_BASE: &str = "s3.amazonaws.com";

/// Default bucket host template
pub const DEFAULT_HOST_BUCKET: &str = "%(bucket)s.s3.amazonaws.com";

/// Default region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Placeholder s3cmd substitutes with the bucket name
pub const BUCKET_PLACEHOLDER: &str = "%(bucket)s";

/// Connection settings for an S3-compatible endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Endpoint host, optionally with port (`minio.local:9000`)
    pub host_base: String,

    /// Bucket host template (`%(bucket)s.host` for virtual-hosted style)
    pub host_bucket: String,

    /// Connect over HTTPS
    pub use_https: bool,

    /// Request SigV2 signing (accepted for compatibility, not honoured)
    pub signature_v2: bool,

    /// Region used for signing
    pub region: String,
}

impl S3Config {
    /// Create a config with the given keys and AWS defaults for the rest
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            host_base: DEFAULT_HOST_BASE.to_string(),
            host_bucket: DEFAULT_HOST_BUCKET.to_string(),
            use_https: true,
            signature_v2: false,
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Point the config at a custom endpoint host
    ///
    /// The bucket template follows the host: virtual-hosted for AWS,
    /// path-style for everything else. Plain HTTP is used for loopback hosts.
    pub fn with_endpoint(mut self, host_base: impl Into<String>) -> Self {
        let host_base: String = host_base.into();
        self.host_bucket = if host_base.contains("amazonaws.com") {
            format!("{BUCKET_PLACEHOLDER}.{host_base}")
        } else {
            format!("{host_base}/{BUCKET_PLACEHOLDER}")
        };
        self.use_https = !is_loopback(&host_base);
        self.host_base = host_base;
        self
    }

    /// Set the signing region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Full endpoint URL
    pub fn endpoint_url(&self) -> Result<String> {
        let scheme = if self.use_https { "https" } else { "http" };
        let url = Url::parse(&format!("{scheme}://{}", self.host_base))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::Config(format!(
                "host_base '{}' has no host",
                self.host_base
            )));
        }
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Whether requests use path-style bucket addressing
    pub fn path_style(&self) -> bool {
        !self.host_bucket.starts_with(&format!("{BUCKET_PLACEHOLDER}."))
    }

    /// Read the `[default]` section of an `.s3cfg` file
    pub fn load(path: &Path) -> Result<Self> {
        let ini = Ini::load_from_file(path)?;
        let section = ini.section(Some(SECTION)).ok_or_else(|| {
            Error::Config(format!("{}: missing [{SECTION}] section", path.display()))
        })?;

        let required = |key: &str| -> Result<String> {
            match section.get(key).map(str::trim) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(Error::Config(format!(
                    "{}: '{key}' is missing or empty",
                    path.display()
                ))),
            }
        };
        let optional = |key: &str, default: &str| -> String {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let config = Self {
            access_key: required("access_key")?,
            secret_key: required("secret_key")?,
            host_base: optional("host_base", DEFAULT_HOST_BASE),
            host_bucket: optional("host_bucket", DEFAULT_HOST_BUCKET),
            use_https: parse_bool(&optional("use_https", "True"))
                .ok_or_else(|| invalid_bool(path, "use_https"))?,
            signature_v2: parse_bool(&optional("signature_v2", "False"))
                .ok_or_else(|| invalid_bool(path, "signature_v2"))?,
            region: optional("bucket_location", DEFAULT_REGION),
        };

        if config.signature_v2 {
            tracing::warn!("signature_v2 is not supported, signing with SigV4");
        }

        Ok(config)
    }

    /// Write the config as an `.s3cfg` file readable only by the owner
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION))
            .set("access_key", self.access_key.as_str())
            .set("secret_key", self.secret_key.as_str())
            .set("host_base", self.host_base.as_str())
            .set("host_bucket", self.host_bucket.as_str())
            .set("use_https", format_bool(self.use_https))
            .set("signature_v2", format_bool(self.signature_v2))
            .set("bucket_location", self.region.as_str());
        ini.write_to_file(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

/// Candidate `.s3cfg` locations in search order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".s3cfg")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".s3cfg"));
    }
    paths.push(PathBuf::from("/etc/s3cfg"));
    paths
}

/// Find the credentials file to use
///
/// An explicit path must exist; otherwise the first existing search path wins.
pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "credentials file '{}' does not exist",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(search_paths().into_iter().find(|p| p.is_file()))
}

fn is_loopback(host_base: &str) -> bool {
    let host = host_base.split(':').next().unwrap_or(host_base);
    host == "localhost" || host == "127.0.0.1"
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn invalid_bool(path: &Path, key: &str) -> Error {
    Error::Config(format!("{}: '{key}' must be True or False", path.display()))
}
