//! Line-editor prompt for the terminal user interface.
//!
//! One prompt handles all four text intents (new list, new task, edit
//! text, due date); the carried `PromptKind` says what to do with the
//! value on submit.

use crate::tui::enums::PromptKind;

/// A labeled single-line text prompt with cursor management.
#[derive(Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub label: String,
    pub value: String,
    pub cursor: usize,
}

impl Prompt {
    /// Create an empty prompt.
    pub fn new(kind: PromptKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
            value: String::new(),
            cursor: 0,
        }
    }

    /// Create a prompt prefilled with an initial value, cursor at the end.
    pub fn with_value(kind: PromptKind, label: &str, value: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.value.remove(idx);
            self.cursor = idx;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_respects_char_boundaries() {
        let mut p = Prompt::with_value(PromptKind::NewList, "Name", "café");
        p.handle_backspace();
        assert_eq!(p.value, "caf");
        p.handle_char('é');
        p.move_cursor_left();
        p.move_cursor_right();
        assert_eq!(p.value, "café");
        assert_eq!(p.cursor, p.value.len());
    }
}
