//! Editable line buffer with cursor tracking.
//!
//! Positions are char offsets, not byte offsets: the buffer is a `Vec<char>`
//! so cursor arithmetic never has to care about UTF-8 widths.

use std::fmt;
use std::ops::Range;

/// In-progress input for one logical read.
///
/// Invariant: `cursor <= chars.len()` after every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

/// Find the char offset where the word before `pos` starts.
///
/// Skips whitespace immediately before `pos`, then the run of non-whitespace
/// before that.
pub fn word_boundary_left(chars: &[char], pos: usize) -> usize {
    let mut end = pos.min(chars.len());
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    start
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Text in `range`, clamped to the buffer.
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    // --- Editing ---

    pub fn insert(&mut self, ch: char) {
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Remove the char before the cursor. Returns `false` at offset 0.
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Ctrl-W: drop trailing whitespace and the word before the cursor.
    /// Returns the offset the deletion started at, or `None` if nothing changed.
    pub fn delete_word_before(&mut self) -> Option<usize> {
        if self.cursor == 0 {
            return None;
        }
        let start = word_boundary_left(&self.chars, self.cursor);
        if start == self.cursor {
            return None;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
        Some(start)
    }

    /// Ctrl-U: drop everything before the cursor.
    pub fn clear_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.chars.drain(..self.cursor);
        self.cursor = 0;
        true
    }

    /// Replace `range` with `text` and put the cursor right after the inserted text.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        let inserted = text.chars().count();
        self.chars.splice(start..end, text.chars());
        self.cursor = start + inserted;
    }

    // --- Cursor movement ---

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_to_start(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_to_end(&mut self) -> bool {
        let moved = self.cursor != self.chars.len();
        self.cursor = self.chars.len();
        moved
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
