//! Transitions of the navigation state.
//!
//! Every input key and every command result goes through here. Transitions
//! only touch the state and return the commands to run; all I/O happens in
//! the dispatcher.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use s4_core::path::{base_name, join_key, paste_destination, parent_key, validate_name};
use s4_core::sort_listing;

use super::input::{InputResult, TextInput};
use super::scroll::{self, PREVIEW_PAGE};
use super::state::{
    ConfirmAction, NavigationState, Preview, RenameDialog, Transition, UploadPicker, ViewMode,
};
use crate::dispatch::{Command, CommandResult, CopyJob};

/// Browser-level key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowserAction {
    Quit,
    Up,
    Down,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
    Open,
    Back,
    Rename,
    Download,
    Upload,
    Delete,
    Yank,
    Paste,
    ClearYanks,
    Refresh,
    Help,
    None,
}

impl BrowserAction {
    fn from_key(key: KeyEvent) -> Self {
        let plain = matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT);
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Self::Quit,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Self::HalfPageUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Self::HalfPageDown,

            (KeyCode::Up, _) => Self::Up,
            (KeyCode::Down, _) => Self::Down,
            (KeyCode::PageUp, _) => Self::HalfPageUp,
            (KeyCode::PageDown, _) => Self::HalfPageDown,
            (KeyCode::Home, _) => Self::Top,
            (KeyCode::End, _) => Self::Bottom,
            (KeyCode::Enter | KeyCode::Right, _) => Self::Open,
            (KeyCode::Backspace | KeyCode::Left, _) => Self::Back,

            (KeyCode::Char(c), _) if plain => match c {
                'q' => Self::Quit,
                'k' => Self::Up,
                'j' => Self::Down,
                'g' => Self::Top,
                'G' => Self::Bottom,
                'l' | 'o' => Self::Open,
                'h' => Self::Back,
                'r' => Self::Rename,
                'd' => Self::Download,
                'u' => Self::Upload,
                'x' => Self::Delete,
                'y' => Self::Yank,
                'p' => Self::Paste,
                'c' => Self::ClearYanks,
                'R' => Self::Refresh,
                '?' => Self::Help,
                _ => Self::None,
            },

            _ => Self::None,
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL
}

fn is_plain_char(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT)
}

impl NavigationState {
    /// Load the bucket root.
    pub fn start(&mut self) -> Transition {
        self.navigate(String::new())
    }

    /// Track the terminal height and keep every window valid for it.
    pub fn resize(&mut self, height: u16) {
        self.set_terminal_height_raw(height);
        let visible = self.visible_rows();

        self.scroll = scroll::follow_cursor(self.cursor, self.scroll, visible, self.entries.len());
        if let Some(picker) = &mut self.picker {
            picker.scroll =
                scroll::follow_cursor(picker.cursor, picker.scroll, visible, picker.entries.len());
        }
        if let Some(preview) = &mut self.preview {
            preview.scroll = preview
                .scroll
                .min(scroll::max_preview_scroll(preview.lines.len(), visible));
        }
    }

    /// Handle one key press in the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Transition {
        match self.mode {
            ViewMode::Browser => self.browser_key(key),
            ViewMode::Preview => self.preview_key(key),
            ViewMode::Help => self.help_key(key),
            ViewMode::Upload => self.picker_key(key),
            ViewMode::Rename => self.rename_key(key),
            ViewMode::Confirm => self.confirm_key(key),
        }
    }

    // --- browser ---------------------------------------------------------

    fn browser_key(&mut self, key: KeyEvent) -> Transition {
        let half = scroll::half_page(self.visible_rows());

        match BrowserAction::from_key(key) {
            BrowserAction::Quit => return Transition::quit(),
            BrowserAction::Up => self.move_cursor(-1),
            BrowserAction::Down => self.move_cursor(1),
            BrowserAction::HalfPageUp => self.move_cursor(-(half as isize)),
            BrowserAction::HalfPageDown => self.move_cursor(half as isize),
            BrowserAction::Top => self.jump_cursor(0),
            BrowserAction::Bottom => self.jump_cursor(self.entries.len().saturating_sub(1)),
            BrowserAction::Open => return self.open_selected(),
            BrowserAction::Back => return self.go_back(),
            BrowserAction::Rename => self.begin_rename(),
            BrowserAction::Download => {
                if let Some(entry) = self.selected().filter(|e| !e.is_dir) {
                    let key = entry.key.clone();
                    self.ask(ConfirmAction::Download { key });
                }
            }
            BrowserAction::Delete => {
                if let Some(entry) = self.selected().filter(|e| !e.is_dir) {
                    let key = entry.key.clone();
                    self.ask(ConfirmAction::Delete { key });
                }
            }
            BrowserAction::Upload => {
                return Transition::dispatch(Command::ListLocal {
                    path: self.upload_start.clone(),
                });
            }
            BrowserAction::Yank => self.toggle_mark(),
            BrowserAction::Paste => return self.paste(),
            BrowserAction::ClearYanks => {
                if !self.marked.is_empty() {
                    let count = self.marked.len();
                    self.marked.clear();
                    self.set_status(format!("✓ Cleared {count} yanked file(s)"));
                }
            }
            BrowserAction::Refresh => return self.refresh(),
            BrowserAction::Help => self.mode = ViewMode::Help,
            BrowserAction::None => {}
        }

        Transition::none()
    }

    fn move_cursor(&mut self, delta: isize) {
        let cursor = scroll::step_cursor(self.cursor, delta, self.entries.len());
        self.jump_cursor(cursor);
    }

    fn jump_cursor(&mut self, cursor: usize) {
        let len = self.entries.len();
        self.cursor = if len == 0 { 0 } else { cursor.min(len - 1) };
        self.scroll = scroll::follow_cursor(self.cursor, self.scroll, self.visible_rows(), len);
    }

    fn open_selected(&mut self) -> Transition {
        let Some(entry) = self.selected() else {
            return Transition::none();
        };

        if entry.is_dir {
            let dir = entry.key.clone();
            self.navigate(dir)
        } else {
            Transition::dispatch(Command::Preview {
                key: entry.key.clone(),
            })
        }
    }

    fn go_back(&mut self) -> Transition {
        if self.dir.is_empty() {
            return Transition::none();
        }
        let parent = parent_key(&self.dir);
        self.navigate(parent)
    }

    /// Switch to another directory and request its listing.
    fn navigate(&mut self, dir: String) -> Transition {
        self.dir = dir;
        self.entries.clear();
        self.cursor = 0;
        self.scroll = 0;
        self.stats.clear();
        self.notice = None;
        self.loading = true;
        Transition::dispatch(Command::List {
            dir: self.dir.clone(),
        })
    }

    /// Re-list the current directory with fresh stats.
    fn refresh(&mut self) -> Transition {
        self.stats.clear();
        Transition::dispatch(self.reload())
    }

    fn reload(&mut self) -> Command {
        self.loading = true;
        Command::List {
            dir: self.dir.clone(),
        }
    }

    fn begin_rename(&mut self) {
        if let Some(entry) = self.selected().filter(|e| !e.is_dir) {
            let key = entry.key.clone();
            let input = TextInput::with_initial(base_name(&key));
            self.rename = Some(RenameDialog { key, input });
            self.notice = None;
            self.mode = ViewMode::Rename;
        }
    }

    fn ask(&mut self, action: ConfirmAction) {
        self.confirm = Some(action);
        self.notice = None;
        self.mode = ViewMode::Confirm;
    }

    fn toggle_mark(&mut self) {
        let Some(entry) = self.selected().filter(|e| !e.is_dir) else {
            return;
        };

        let key = entry.key.clone();
        if let Some(pos) = self.marked.iter().position(|k| *k == key) {
            self.marked.remove(pos);
        } else {
            self.marked.push(key);
        }
        self.notice = None;

        if self.cursor + 1 < self.entries.len() {
            self.move_cursor(1);
        }
    }

    fn paste(&mut self) -> Transition {
        if self.marked.is_empty() {
            return Transition::none();
        }

        let mut jobs: Vec<CopyJob> = Vec::with_capacity(self.marked.len());
        for source in &self.marked {
            let destination = paste_destination(&self.dir, source, |candidate| {
                self.listed(candidate) || jobs.iter().any(|j| j.destination == candidate)
            });
            jobs.push(CopyJob {
                source: source.clone(),
                destination,
            });
        }

        self.set_status(format!("Pasting {} file(s)...", jobs.len()));
        Transition::dispatch(Command::Paste { jobs })
    }

    // --- other modes -----------------------------------------------------

    fn preview_key(&mut self, key: KeyEvent) -> Transition {
        if is_ctrl_c(&key) || is_plain_char(&key, 'q') {
            return Transition::quit();
        }

        let visible = self.visible_rows();
        let Some(preview) = &mut self.preview else {
            self.mode = ViewMode::Browser;
            return Transition::none();
        };
        let max = scroll::max_preview_scroll(preview.lines.len(), visible);

        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                self.preview = None;
                self.mode = ViewMode::Browser;
            }
            KeyCode::Up | KeyCode::Char('k') => preview.scroll = preview.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => preview.scroll = (preview.scroll + 1).min(max),
            KeyCode::PageUp | KeyCode::Char('u') => {
                preview.scroll = preview.scroll.saturating_sub(PREVIEW_PAGE);
            }
            KeyCode::PageDown | KeyCode::Char('d') => {
                preview.scroll = (preview.scroll + PREVIEW_PAGE).min(max);
            }
            KeyCode::Home | KeyCode::Char('g') => preview.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => preview.scroll = max,
            _ => {}
        }

        Transition::none()
    }

    fn help_key(&mut self, key: KeyEvent) -> Transition {
        if is_ctrl_c(&key) || is_plain_char(&key, 'q') {
            return Transition::quit();
        }
        self.mode = ViewMode::Browser;
        Transition::none()
    }

    fn picker_key(&mut self, key: KeyEvent) -> Transition {
        if is_ctrl_c(&key) || is_plain_char(&key, 'q') {
            return Transition::quit();
        }

        let visible = self.visible_rows();
        let Some(picker) = &mut self.picker else {
            self.mode = ViewMode::Browser;
            return Transition::none();
        };
        let len = picker.entries.len();
        let half = scroll::half_page(visible) as isize;

        let delta = match (key.code, key.modifiers) {
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(-half),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(half),
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(-1),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(1),
            (KeyCode::Home | KeyCode::Char('g'), _) => Some(-(len as isize)),
            (KeyCode::End | KeyCode::Char('G'), _) => Some(len as isize),
            _ => None,
        };
        if let Some(delta) = delta {
            picker.cursor = scroll::step_cursor(picker.cursor, delta, len);
            picker.scroll = scroll::follow_cursor(picker.cursor, picker.scroll, visible, len);
            return Transition::none();
        }

        match key.code {
            KeyCode::Esc => {
                self.picker = None;
                self.mode = ViewMode::Browser;
                Transition::none()
            }
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                Transition::dispatch(Command::ListLocal {
                    path: picker.path.join(".."),
                })
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('o') => {
                let Some(entry) = picker.entries.get(picker.cursor) else {
                    return Transition::none();
                };
                let target: PathBuf = picker.path.join(&entry.name);
                if entry.is_dir {
                    Transition::dispatch(Command::ListLocal { path: target })
                } else {
                    let name = entry.name.clone();
                    self.ask(ConfirmAction::Upload {
                        source: target,
                        name,
                    });
                    self.picker = None;
                    Transition::none()
                }
            }
            _ => Transition::none(),
        }
    }

    fn rename_key(&mut self, key: KeyEvent) -> Transition {
        if is_ctrl_c(&key) {
            return Transition::quit();
        }
        let Some(dialog) = &mut self.rename else {
            self.mode = ViewMode::Browser;
            return Transition::none();
        };

        match dialog.input.handle_key(key) {
            InputResult::Continue => Transition::none(),
            InputResult::Cancel => {
                self.close_rename();
                Transition::none()
            }
            InputResult::Submit(name) => self.submit_rename(name),
        }
    }

    fn submit_rename(&mut self, name: String) -> Transition {
        let Some(from) = self.rename.as_ref().map(|d| d.key.clone()) else {
            return Transition::none();
        };

        if name == base_name(&from) {
            self.close_rename();
            return Transition::none();
        }

        if let Err(e) = validate_name(&name) {
            self.set_error(e.to_string());
            return Transition::none();
        }

        let to = join_key(&parent_key(&from), &name);
        if self.listed(&to) {
            self.set_error(format!("'{name}' already exists"));
            return Transition::none();
        }

        self.close_rename();
        self.set_status(format!("Renaming '{}'...", base_name(&from)));
        Transition::dispatch(Command::Rename { from, to })
    }

    fn close_rename(&mut self) {
        self.rename = None;
        self.mode = ViewMode::Browser;
    }

    fn confirm_key(&mut self, key: KeyEvent) -> Transition {
        if is_ctrl_c(&key) || is_plain_char(&key, 'q') {
            return Transition::quit();
        }

        let accept = matches!(key.code, KeyCode::Enter | KeyCode::Char('y' | 'Y'));
        let decline = matches!(key.code, KeyCode::Esc | KeyCode::Char('n' | 'N'));
        if !accept && !decline {
            return Transition::none();
        }

        self.mode = ViewMode::Browser;
        let Some(action) = self.confirm.take() else {
            return Transition::none();
        };
        if decline {
            return Transition::none();
        }

        let command = match action {
            ConfirmAction::Delete { key } => {
                self.set_status(format!("Deleting '{}'...", base_name(&key)));
                Command::Delete { key }
            }
            ConfirmAction::Download { key } => {
                self.set_status(format!("Downloading '{}'...", base_name(&key)));
                Command::Download { key }
            }
            ConfirmAction::Upload { source, name } => {
                self.set_status(format!("Uploading '{name}'..."));
                Command::Upload {
                    source,
                    key: join_key(&self.dir, &name),
                }
            }
        };
        Transition::dispatch(command)
    }

    // --- results ---------------------------------------------------------

    /// Fold a finished command into the state.
    pub fn handle_result(&mut self, result: CommandResult) -> Transition {
        match result {
            CommandResult::Listed { dir, result } => {
                if dir != self.dir {
                    tracing::debug!(%dir, current = %self.dir, "dropping stale listing");
                    return Transition::none();
                }
                self.loading = false;
                match result {
                    Ok(entries) => return self.apply_listing(entries),
                    Err(e) => self.set_error(e),
                }
            }

            CommandResult::Previewed { key, result } => match result {
                Ok(data) if self.mode == ViewMode::Browser => {
                    self.preview = Some(Preview::from_bytes(key, data));
                    self.notice = None;
                    self.mode = ViewMode::Preview;
                }
                Ok(_) => {}
                Err(e) => self.set_error(e),
            },

            CommandResult::Downloaded { key, result } => match result {
                Ok(path) => self.set_status(format!(
                    "✓ Downloaded '{}' to {}",
                    base_name(&key),
                    path.display()
                )),
                Err(e) => self.set_error(e),
            },

            CommandResult::Uploaded { key, result } => match result {
                Ok(()) => {
                    self.set_status(format!("✓ Uploaded '{}' successfully", base_name(&key)));
                    return Transition::dispatch(self.reload());
                }
                Err(e) => self.set_error(e),
            },

            CommandResult::Deleted { key, result } => match result {
                Ok(()) => {
                    self.marked.retain(|k| *k != key);
                    self.set_status(format!("✓ Deleted '{}' successfully", base_name(&key)));
                    return Transition::dispatch(self.reload());
                }
                Err(e) => self.set_error(e),
            },

            CommandResult::Pasted(report) => {
                if report.failed.is_empty() {
                    self.set_status(format!("✓ {}", report.summary()));
                } else {
                    self.set_error(report.summary());
                }
                if !report.copied.is_empty() {
                    return Transition::dispatch(self.reload());
                }
            }

            CommandResult::Renamed { from, to, result } => match result {
                Ok(()) => {
                    for key in &mut self.marked {
                        if *key == from {
                            key.clone_from(&to);
                        }
                    }
                    self.set_status(format!(
                        "✓ Renamed '{}' to '{}' successfully",
                        base_name(&from),
                        base_name(&to)
                    ));
                    return Transition::dispatch(self.reload());
                }
                Err(e) => self.set_error(e),
            },

            CommandResult::LocalListed { path, result } => match result {
                Ok(entries) if matches!(self.mode, ViewMode::Browser | ViewMode::Upload) => {
                    self.picker = Some(UploadPicker {
                        path,
                        entries,
                        cursor: 0,
                        scroll: 0,
                    });
                    self.notice = None;
                    self.mode = ViewMode::Upload;
                }
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "dropping local listing");
                }
                Err(e) => self.set_error(e),
            },

            CommandResult::DirStats { key, stats } => {
                if self.entries.iter().any(|e| e.is_dir && e.key == key) {
                    self.stats.insert(key, stats);
                } else {
                    tracing::debug!(%key, "dropping stats for unlisted directory");
                }
            }
        }

        Transition::none()
    }

    fn apply_listing(&mut self, mut entries: Vec<s4_core::Entry>) -> Transition {
        sort_listing(&mut entries);
        self.entries = entries;
        self.jump_cursor(self.cursor);

        let commands = self
            .entries
            .iter()
            .filter(|e| e.is_dir && !self.stats.contains_key(&e.key))
            .map(|e| Command::DirStats { key: e.key.clone() })
            .collect();
        Transition::dispatch_all(commands)
    }
}
