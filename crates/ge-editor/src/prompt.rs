//! Single-line prompts on the message row.
//!
//! Find, replace, and go-to-line ask for a line of text at the bottom of
//! the screen. A [`Prompt`] is the input buffer for that: the text typed so
//! far, a cursor inside it, and what the answer is for. Enter turns it into
//! an [`EditCommand`]; Escape drops it.

use crate::buffer::char_to_byte;
use crate::command::EditCommand;

/// What the prompt is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Find,
    /// Replacement text for the current search term.
    Replace { search: String, all: bool },
    GotoLine,
}

impl PromptKind {
    /// The label drawn in front of the input.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Find => "Find: ".to_owned(),
            Self::Replace { search, all: false } => format!("Replace '{search}' with: "),
            Self::Replace { search, all: true } => format!("Replace all '{search}' with: "),
            Self::GotoLine => "Go to line: ".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
    /// Char offset into `input`.
    cursor: usize,
}

impl Prompt {
    #[must_use]
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            cursor: 0,
        }
    }

    /// A prompt pre-filled with `text`, cursor at its end.
    #[must_use]
    pub fn with_text(kind: PromptKind, text: &str) -> Self {
        Self {
            kind,
            input: text.to_owned(),
            cursor: text.chars().count(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &PromptKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    // -- Editing ------------------------------------------------------------

    pub fn insert_char(&mut self, ch: char) {
        let byte = char_to_byte(&self.input, self.cursor);
        self.input.insert(byte, ch);
        self.cursor += 1;
    }

    /// Pasted text; line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert_char(if ch == '\n' || ch == '\r' { ' ' } else { ch });
        }
    }

    /// Returns `true` if a char was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte = char_to_byte(&self.input, self.cursor);
        self.input.remove(byte);
        true
    }

    /// Returns `true` if a char was deleted.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let byte = char_to_byte(&self.input, self.cursor);
        self.input.remove(byte);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // -- Submission ---------------------------------------------------------

    /// The command this answer stands for, or `None` when an empty find or
    /// goto should do nothing. An empty replacement is a valid answer: it
    /// deletes the match.
    #[must_use]
    pub fn submit(self) -> Option<EditCommand> {
        match self.kind {
            PromptKind::Find if self.input.is_empty() => None,
            PromptKind::Find => Some(EditCommand::Find(self.input)),
            PromptKind::Replace { all: false, .. } => Some(EditCommand::Replace(self.input)),
            PromptKind::Replace { all: true, .. } => Some(EditCommand::ReplaceAll(self.input)),
            PromptKind::GotoLine if self.input.trim().is_empty() => None,
            PromptKind::GotoLine => Some(EditCommand::GotoLine(self.input)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
