//! Edit commands and the extension table.
//!
//! Every key the editor understands becomes an [`EditCommand`] before it
//! touches the session. The command is a plain value: it can be recorded
//! into a macro, replayed later, or bound to an extra key from
//! configuration.
//!
//! Commands that take no argument also have a stable text id
//! (`"duplicate-line"`, `"find-next"`, ...). That is what the configuration
//! file names when it binds a key:
//!
//! ```json
//! "extensions": { "ctrl+j": "duplicate-line", "f5": "save" }
//! ```
//!
//! Binding a key never runs outside code. The table maps a chord to one of
//! the closed set of commands below and nothing else.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ge_term::input::{KeyEvent, ParseKeyError};
use thiserror::Error;

// ---------------------------------------------------------------------------
// EditCommand
// ---------------------------------------------------------------------------

/// One primitive editor operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    // -- Movement -----------------------------------------------------------
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,

    // -- Selection ----------------------------------------------------------
    /// Like the plain moves, but the position the cursor leaves stays as
    /// the selection anchor.
    SelectUp,
    SelectDown,
    SelectLeft,
    SelectRight,
    SelectLineStart,
    SelectLineEnd,

    // -- Editing ------------------------------------------------------------
    InsertChar(char),
    /// Pasted or programmatic text; may contain newlines.
    InsertText(String),
    /// Split the line, with auto-indent.
    Newline,
    Backspace,
    Delete,
    /// Spaces up to the next tab stop.
    Tab,
    Indent,
    Dedent,
    DuplicateLine,

    // -- Clipboard ----------------------------------------------------------
    CutLine,
    CopyLine,
    Paste,
    CutToLineEnd,

    // -- Search -------------------------------------------------------------
    /// Set the search term and jump to its next occurrence.
    Find(String),
    FindNext,
    FindPrev,
    /// Replace the next occurrence of the search term with this text.
    Replace(String),
    /// Replace every occurrence of the search term with this text.
    ReplaceAll(String),

    // -- Navigation ---------------------------------------------------------
    /// The raw text typed at the "Go to line" prompt, 1-indexed.
    GotoLine(String),
    ToggleBookmark,
    /// 0-based index into the sorted bookmark list.
    JumpToBookmark(usize),

    // -- View ---------------------------------------------------------------
    ToggleLineNumbers,
    ToggleLineWrap,

    // -- File ---------------------------------------------------------------
    Save,
    AutoFormat,

    // -- Macros -------------------------------------------------------------
    ToggleMacroRecording,
    CancelMacroRecording,
    RunMacro,
}

impl EditCommand {
    /// True if the command changes the buffer text.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertText(_)
                | Self::Newline
                | Self::Backspace
                | Self::Delete
                | Self::Tab
                | Self::Indent
                | Self::Dedent
                | Self::DuplicateLine
                | Self::CutLine
                | Self::Paste
                | Self::CutToLineEnd
                | Self::Replace(_)
                | Self::ReplaceAll(_)
                | Self::AutoFormat
        )
    }

    /// True for the moves that grow the selection. Every other command
    /// drops it.
    #[must_use]
    pub const fn extends_selection(&self) -> bool {
        matches!(
            self,
            Self::SelectUp
                | Self::SelectDown
                | Self::SelectLeft
                | Self::SelectRight
                | Self::SelectLineStart
                | Self::SelectLineEnd
        )
    }

    /// False for the commands that drive the macro recorder itself. Those
    /// never end up inside a macro, so playback can't recurse.
    #[must_use]
    pub const fn is_recordable(&self) -> bool {
        !matches!(
            self,
            Self::ToggleMacroRecording | Self::CancelMacroRecording | Self::RunMacro
        )
    }

    /// The stable text id, for commands that take no argument.
    #[must_use]
    pub const fn id(&self) -> Option<&'static str> {
        Some(match self {
            Self::MoveUp => "move-up",
            Self::MoveDown => "move-down",
            Self::MoveLeft => "move-left",
            Self::MoveRight => "move-right",
            Self::LineStart => "line-start",
            Self::LineEnd => "line-end",
            Self::PageUp => "page-up",
            Self::PageDown => "page-down",
            Self::SelectUp => "select-up",
            Self::SelectDown => "select-down",
            Self::SelectLeft => "select-left",
            Self::SelectRight => "select-right",
            Self::SelectLineStart => "select-line-start",
            Self::SelectLineEnd => "select-line-end",
            Self::Newline => "newline",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Tab => "tab",
            Self::Indent => "indent",
            Self::Dedent => "dedent",
            Self::DuplicateLine => "duplicate-line",
            Self::CutLine => "cut-line",
            Self::CopyLine => "copy-line",
            Self::Paste => "paste",
            Self::CutToLineEnd => "cut-to-line-end",
            Self::FindNext => "find-next",
            Self::FindPrev => "find-prev",
            Self::ToggleBookmark => "toggle-bookmark",
            Self::ToggleLineNumbers => "toggle-line-numbers",
            Self::ToggleLineWrap => "toggle-line-wrap",
            Self::Save => "save",
            Self::AutoFormat => "auto-format",
            Self::ToggleMacroRecording => "toggle-macro-recording",
            Self::CancelMacroRecording => "cancel-macro-recording",
            Self::RunMacro => "run-macro",
            Self::InsertChar(_)
            | Self::InsertText(_)
            | Self::Find(_)
            | Self::Replace(_)
            | Self::ReplaceAll(_)
            | Self::GotoLine(_)
            | Self::JumpToBookmark(_) => return None,
        })
    }
}

const NAMED: &[EditCommand] = &[
    EditCommand::MoveUp,
    EditCommand::MoveDown,
    EditCommand::MoveLeft,
    EditCommand::MoveRight,
    EditCommand::LineStart,
    EditCommand::LineEnd,
    EditCommand::PageUp,
    EditCommand::PageDown,
    EditCommand::SelectUp,
    EditCommand::SelectDown,
    EditCommand::SelectLeft,
    EditCommand::SelectRight,
    EditCommand::SelectLineStart,
    EditCommand::SelectLineEnd,
    EditCommand::Newline,
    EditCommand::Backspace,
    EditCommand::Delete,
    EditCommand::Tab,
    EditCommand::Indent,
    EditCommand::Dedent,
    EditCommand::DuplicateLine,
    EditCommand::CutLine,
    EditCommand::CopyLine,
    EditCommand::Paste,
    EditCommand::CutToLineEnd,
    EditCommand::FindNext,
    EditCommand::FindPrev,
    EditCommand::ToggleBookmark,
    EditCommand::ToggleLineNumbers,
    EditCommand::ToggleLineWrap,
    EditCommand::Save,
    EditCommand::AutoFormat,
    EditCommand::ToggleMacroRecording,
    EditCommand::CancelMacroRecording,
    EditCommand::RunMacro,
];

/// Every command id, in declaration order.
pub fn command_ids() -> impl Iterator<Item = &'static str> {
    NAMED.iter().filter_map(EditCommand::id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for EditCommand {
    type Err = UnknownCommand;

    /// Ids are matched case-insensitively; `_` is accepted for `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        NAMED
            .iter()
            .find(|cmd| cmd.id() == Some(wanted.as_str()))
            .cloned()
            .ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => f.write_str(id),
            None => write!(f, "{self:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExtensionTable
// ---------------------------------------------------------------------------

/// A key chord that can carry an extension binding.
pub type Trigger = KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    Key(#[from] ParseKeyError),
    #[error(transparent)]
    Command(#[from] UnknownCommand),
}

/// Extra key bindings consulted after the built-in key map.
#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    bindings: HashMap<Trigger, EditCommand>,
}

impl ExtensionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(chord, command id)` text pairs. Pairs that
    /// don't parse are logged and skipped.
    pub fn from_config<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::new();
        for (chord, id) in pairs {
            if let Err(e) = table.bind(chord, id) {
                log::warn!("extension {chord:?} -> {id:?} ignored: {e}");
            }
        }
        table
    }

    /// Bind `trigger` to `command`, replacing any earlier binding.
    pub fn register(&mut self, trigger: Trigger, command: EditCommand) {
        if let Some(old) = self.bindings.insert(trigger, command.clone()) {
            log::debug!("extension {trigger} rebound from {old} to {command}");
        }
    }

    /// Parse and bind a textual pair such as `("ctrl+j", "duplicate-line")`.
    ///
    /// # Errors
    ///
    /// The chord or the command id doesn't parse.
    pub fn bind(&mut self, chord: &str, id: &str) -> Result<(), BindingError> {
        let trigger: Trigger = chord.parse()?;
        let command: EditCommand = id.parse()?;
        self.register(trigger, command);
        Ok(())
    }

    #[must_use]
    pub fn lookup(&self, trigger: &Trigger) -> Option<&EditCommand> {
        self.bindings.get(trigger)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
