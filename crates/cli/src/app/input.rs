//! Single-line text editor used by the rename dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Outcome of feeding one key to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Keep editing.
    Continue,
    /// Abandon the edit.
    Cancel,
    /// Accept the current buffer.
    Submit(String),
}

/// Text buffer with a character-addressed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    /// Cursor position in characters, `0..=char_count`.
    cursor: usize,
}

impl TextInput {
    /// Editor seeded with `value`, cursor at the end.
    pub fn with_initial(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of a character position.
    fn byte_offset(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Split the buffer at the cursor for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.byte_offset(self.cursor))
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => return InputResult::Submit(self.buffer.clone()),
            (KeyCode::Esc, _) => return InputResult::Cancel,

            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.char_count() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_count());
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_count();
            }

            // Ctrl-U: delete everything left of the cursor
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.replace_range(..at, "");
                self.cursor = 0;
            }

            // Ctrl-W: delete the word left of the cursor, plus trailing spaces
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let chars: Vec<char> = self.buffer.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                let (from, to) = (self.byte_offset(start), self.byte_offset(self.cursor));
                self.buffer.replace_range(from..to, "");
                self.cursor = start;
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) if !c.is_control() => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            }

            _ => {}
        }

        InputResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_seeded_cursor_at_end() {
        let input = TextInput::with_initial("report.txt");
        assert_eq!(input.cursor(), 10);
        assert_eq!(input.value(), "report.txt");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::with_initial("ac");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = TextInput::with_initial("abcd");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "abc");

        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "bc");
        assert_eq!(input.cursor(), 0);

        // Backspace at start is a no-op
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::with_initial("ab");
        input.handle_key(key(KeyCode::Right));
        assert_eq!(input.cursor(), 2);

        input.handle_key(ctrl('a'));
        input.handle_key(key(KeyCode::Left));
        assert_eq!(input.cursor(), 0);

        input.handle_key(ctrl('e'));
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_ctrl_u_deletes_left_of_cursor() {
        let mut input = TextInput::with_initial("old_name.txt");
        for _ in 0..4 {
            input.handle_key(key(KeyCode::Left));
        }
        input.handle_key(ctrl('u'));
        assert_eq!(input.value(), ".txt");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_ctrl_w_deletes_word() {
        let mut input = TextInput::with_initial("my draft  ");
        input.handle_key(ctrl('w'));
        assert_eq!(input.value(), "my ");
        assert_eq!(input.cursor(), 3);

        input.handle_key(ctrl('w'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_initial("café");
        assert_eq!(input.cursor(), 4);
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");

        input.handle_key(key(KeyCode::Char('é')));
        input.handle_key(key(KeyCode::Left));
        assert_eq!(input.split_at_cursor(), ("caf", "é"));
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = TextInput::with_initial("x");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputResult::Submit("x".into()));
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancel);
    }
}
