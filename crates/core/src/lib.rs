//! s4-core: Core library for the s4 bucket browser
//!
//! This crate provides the pieces of s4 that do not depend on any S3 SDK:
//! - Key and prefix handling, paste-conflict naming
//! - Listing order shared by remote and local listings
//! - ObjectStore and LocalFs traits for the browser's collaborators
//! - Settings (TOML) and credentials (`.s3cfg`)

pub mod config;
pub mod credentials;
pub mod error;
pub mod listing;
pub mod local;
pub mod path;
pub mod traits;

pub use config::{Settings, SettingsManager};
pub use credentials::S3Config;
pub use error::{Error, Result};
pub use listing::{sort_listing, ListingItem};
pub use local::{DiskFs, LocalEntry, LocalFs};
pub use path::RemotePath;
pub use traits::{Entry, ObjectStore};
