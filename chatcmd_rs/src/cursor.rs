//! Scanning cursor over an immutable line of input.
//!
//! The cursor is the single primitive the tokenizer is built on: a character
//! buffer plus a read position that only ever moves one step at a time.

/// Mutable scan pointer over an immutable character buffer.
///
/// The position starts at `-1` ("before the first character") so that the
/// first [`next_token`](Cursor::next_token) lands on index 0. Parsers peek by
/// consuming a character and calling [`backward`](Cursor::backward) when they
/// decide it belongs to someone else.
///
/// A cursor is single-threaded scanning state; each parse gets its own.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    position: isize,
}

impl Cursor {
    /// Bind a new cursor to the given payload, positioned before the start.
    pub fn new(payload: &str) -> Self {
        Self {
            chars: payload.chars().collect(),
            position: -1,
        }
    }

    /// Advance by one and return the character there, or `None` once the
    /// payload is exhausted. The position advances either way, so the
    /// reported offset of an exhaustion error points one past the end.
    pub fn next_token(&mut self) -> Option<char> {
        self.position += 1;
        self.chars.get(self.position as usize).copied()
    }

    /// True if another call to [`next_token`](Cursor::next_token) would yield
    /// a character.
    pub fn has_next(&self) -> bool {
        self.position + 1 < self.chars.len() as isize
    }

    /// Step back one character, clamped at the start boundary.
    pub fn backward(&mut self) {
        if self.position > -1 {
            self.position -= 1;
        }
    }

    /// Reset the position to the start, keeping the current payload.
    pub fn reset(&mut self) {
        self.position = -1;
    }

    /// Rebind to a new payload and reset the position.
    pub fn reset_to(&mut self, payload: &str) {
        self.chars = payload.chars().collect();
        self.position = -1;
    }

    /// Raw position, `-1` before the first character.
    pub fn position(&self) -> isize {
        self.position
    }

    /// Position clamped to `0..`, used to anchor syntax errors.
    pub fn offset(&self) -> usize {
        self.position.max(0) as usize
    }

    /// Number of characters in the bound payload.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True if the bound payload is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
