//! Navigation state: everything the browser shows, in one value.

use std::collections::HashMap;
use std::path::PathBuf;

use s4_core::path::base_name;
use s4_core::{Entry, LocalEntry};

use super::input::TextInput;
use super::scroll;
use crate::dispatch::{Command, DirStats};

/// Text shown instead of content that is not valid UTF-8.
pub const BINARY_PLACEHOLDER: &str = "[Binary file - cannot preview]";

/// Active view. Exactly one is shown at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Browser,
    Preview,
    Help,
    Upload,
    Rename,
    Confirm,
}

/// The single message line: an error or a status, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Status(String),
}

/// An action waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { key: String },
    Download { key: String },
    /// Upload `source` into the current directory as `name`.
    Upload { source: PathBuf, name: String },
}

impl ConfirmAction {
    /// Question shown in the confirm dialog.
    pub fn prompt(&self) -> String {
        match self {
            Self::Delete { key } => format!("Delete '{}' from the bucket?", base_name(key)),
            Self::Download { key } => format!("Download '{}'?", base_name(key)),
            Self::Upload { name, .. } => format!("Upload '{name}' to the current directory?"),
        }
    }
}

/// Rename dialog: the key being renamed and the edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDialog {
    pub key: String,
    pub input: TextInput,
}

/// Text preview of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub key: String,
    pub lines: Vec<String>,
    pub scroll: usize,
}

impl Preview {
    /// Build a preview, falling back to the placeholder for binary content.
    pub fn from_bytes(key: String, data: Vec<u8>) -> Self {
        let lines = match String::from_utf8(data) {
            Ok(text) => text
                .split('\n')
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect(),
            Err(_) => vec![BINARY_PLACEHOLDER.to_string()],
        };
        Self {
            key,
            lines,
            scroll: 0,
        }
    }
}

/// Local directory listing for choosing a file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPicker {
    /// Canonical path being listed.
    pub path: PathBuf,
    pub entries: Vec<LocalEntry>,
    pub cursor: usize,
    pub scroll: usize,
}

/// Result of one transition: commands to dispatch and whether to exit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub commands: Vec<Command>,
    pub quit: bool,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            commands: Vec::new(),
            quit: true,
        }
    }

    pub fn dispatch(command: Command) -> Self {
        Self {
            commands: vec![command],
            quit: false,
        }
    }

    pub fn dispatch_all(commands: Vec<Command>) -> Self {
        Self {
            commands,
            quit: false,
        }
    }
}

/// Root browser state.
///
/// Mutated only by the transition methods; the renderer reads it.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Bucket being browsed.
    pub bucket: String,
    /// Current directory key, empty at the bucket root.
    pub dir: String,
    /// Entries of `dir`, directories first.
    pub entries: Vec<Entry>,
    pub cursor: usize,
    pub scroll: usize,
    pub mode: ViewMode,
    /// A listing of `dir` is in flight.
    pub loading: bool,
    /// Yanked file keys in the order they were marked.
    pub marked: Vec<String>,
    /// Stats for directories of the current listing.
    pub stats: HashMap<String, DirStats>,
    pub notice: Option<Notice>,
    pub preview: Option<Preview>,
    pub rename: Option<RenameDialog>,
    pub confirm: Option<ConfirmAction>,
    pub picker: Option<UploadPicker>,
    /// Directory the upload picker opens in.
    pub upload_start: PathBuf,
    terminal_height: u16,
}

impl NavigationState {
    pub fn new(bucket: impl Into<String>, upload_start: PathBuf) -> Self {
        Self {
            bucket: bucket.into(),
            dir: String::new(),
            entries: Vec::new(),
            cursor: 0,
            scroll: 0,
            mode: ViewMode::Browser,
            loading: false,
            marked: Vec::new(),
            stats: HashMap::new(),
            notice: None,
            preview: None,
            rename: None,
            confirm: None,
            picker: None,
            upload_start,
            terminal_height: 24,
        }
    }

    /// Rows available to the entry list and the preview pane.
    pub fn visible_rows(&self) -> usize {
        scroll::visible_rows(self.terminal_height)
    }

    pub fn terminal_height(&self) -> u16 {
        self.terminal_height
    }

    /// Entry under the cursor.
    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Whether an entry is yanked. Only files are ever marked, so a prefix
    /// that shares its key with a marked object is not.
    pub fn is_marked(&self, entry: &Entry) -> bool {
        !entry.is_dir && self.marked.iter().any(|k| *k == entry.key)
    }

    /// Whether a key is present in the current listing.
    ///
    /// Files and directories are both matched: an object `logs` and a prefix
    /// `logs/` share the key `logs`, and either one makes the name taken.
    pub fn listed(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.notice {
            Some(Notice::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match &self.notice {
            Some(Notice::Status(message)) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Error(message.into()));
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Status(message.into()));
    }

    pub(crate) fn set_terminal_height_raw(&mut self, height: u16) {
        self.terminal_height = height;
    }
}
