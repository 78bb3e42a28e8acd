//! Editor session: one open file and everything that acts on it.
//!
//! A [`Session`] owns the buffer, the cursor, the clipboard, the search and
//! replace terms, bookmarks, and the macro recorder. Input reaches it only
//! as [`EditCommand`]s through [`Session::apply`], which returns an
//! optional status [`Message`] for the user. Nothing here knows about keys
//! or the terminal.
//!
//! After every command the cursor is clamped back inside the buffer, so no
//! command has to leave it valid on its own.

use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;

use crate::bookmarks::Bookmarks;
use crate::buffer::Buffer;
use crate::command::EditCommand;
use crate::cursor::Cursor;
use crate::error::EditorError;
use crate::macros::MacroRecorder;
use crate::options::Options;
use crate::position::{Position, Selection};
use crate::search;
use crate::syntax::detect_language;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A transient line for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub level: Level,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Warning,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Level::Error,
        }
    }

    /// How long the message stays up. Errors linger a little longer.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self.level {
            Level::Info | Level::Warning => Duration::from_secs(2),
            Level::Error => Duration::from_secs(3),
        }
    }
}

/// What a command has to tell the user, if anything.
pub type Outcome = Option<Message>;

const PREVIEW_CHARS: usize = 20;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    buffer: Buffer,
    cursor: Cursor,
    clipboard: Vec<String>,
    search_term: String,
    replace_term: String,
    bookmarks: Bookmarks,
    macros: MacroRecorder,
    language: String,
    file_name: String,
    options: Options,
    /// Text rows on screen, for page moves.
    viewport_height: usize,
    /// Set when the file exists but couldn't be read. Saving is refused so
    /// the file on disk is never overwritten by the empty stand-in.
    load_failed: bool,
}

impl Session {
    // -- Construction -------------------------------------------------------

    #[must_use]
    pub fn new(buffer: Buffer, file_name: impl Into<String>, options: Options) -> Self {
        let language = buffer
            .path()
            .map_or("text", detect_language)
            .to_owned();
        Self {
            buffer,
            cursor: Cursor::new(),
            clipboard: Vec::new(),
            search_term: String::new(),
            replace_term: String::new(),
            bookmarks: Bookmarks::new(),
            macros: MacroRecorder::new(),
            language,
            file_name: file_name.into(),
            options,
            viewport_height: 24,
            load_failed: false,
        }
    }

    /// Open `path`. A file that doesn't exist yet becomes an empty buffer
    /// that is already modified, unless the session is read-only. A file
    /// that can't be read leaves an empty buffer and an error message, and
    /// the session refuses to save over it.
    #[must_use]
    pub fn open(path: &Path, options: Options) -> (Self, Outcome) {
        let name = path.display().to_string();
        if !path.exists() {
            let buffer = if options.read_only {
                let mut buffer = Buffer::from_text("");
                buffer.set_path(path.to_path_buf());
                buffer
            } else {
                log::info!("new file {name}");
                Buffer::new_file(path)
            };
            return (Self::new(buffer, name, options), None);
        }
        match Buffer::from_file(path) {
            Ok(buffer) => (Self::new(buffer, name, options), None),
            Err(e) => {
                log::error!("{e}");
                let mut buffer = Buffer::from_text("");
                buffer.set_path(path.to_path_buf());
                let mut session = Self::new(buffer, name, options);
                session.load_failed = true;
                (session, Some(Message::error(e.to_string())))
            }
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor.position()
    }

    #[must_use]
    pub fn clipboard(&self) -> &[String] {
        &self.clipboard
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn replace_term(&self) -> &str {
        &self.replace_term
    }

    #[must_use]
    pub const fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.macros.is_recording()
    }

    #[must_use]
    pub const fn macros(&self) -> &MacroRecorder {
        &self.macros
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub const fn set_viewport_height(&mut self, rows: usize) {
        self.viewport_height = rows;
    }

    /// Bookmark selector lines, `"12: first twenty chars"`, in line order.
    #[must_use]
    pub fn bookmark_entries(&self) -> Vec<String> {
        self.bookmarks
            .list()
            .into_iter()
            .map(|pos| {
                let preview: String = self
                    .buffer
                    .line_slice(pos.line)
                    .chars()
                    .take(PREVIEW_CHARS)
                    .collect();
                format!("{}: {preview}", pos.line + 1)
            })
            .collect()
    }

    // -- Dispatch -----------------------------------------------------------

    /// Run one command from live input, recording it if a macro is being
    /// recorded.
    pub fn apply(&mut self, cmd: &EditCommand) -> Outcome {
        self.macros.record(cmd);
        self.dispatch(cmd)
    }

    fn dispatch(&mut self, cmd: &EditCommand) -> Outcome {
        if self.options.read_only && cmd.is_mutating() {
            return Some(Message::warning("Read-only mode - cannot edit"));
        }
        let outcome = self.execute(cmd);
        self.cursor.clamp(&self.buffer);
        outcome
    }

    fn execute(&mut self, cmd: &EditCommand) -> Outcome {
        if cmd.extends_selection() {
            if self.cursor.selection().is_none() {
                self.cursor.start_selection();
            }
        } else if let Some(sel) = self.take_selection() {
            if let ControlFlow::Break(outcome) = self.on_selection(cmd, sel) {
                return outcome;
            }
        }

        let buf = &self.buffer;
        let pos = self.cursor.position();
        match cmd {
            // -- Movement ---------------------------------------------------
            EditCommand::MoveUp | EditCommand::SelectUp => self.cursor.move_up(1, buf),
            EditCommand::MoveDown | EditCommand::SelectDown => self.cursor.move_down(1, buf),
            EditCommand::MoveLeft | EditCommand::SelectLeft => self.cursor.move_left(buf),
            EditCommand::MoveRight | EditCommand::SelectRight => self.cursor.move_right(buf),
            EditCommand::LineStart | EditCommand::SelectLineStart => {
                self.cursor.move_line_start();
            }
            EditCommand::LineEnd | EditCommand::SelectLineEnd => {
                self.cursor.move_line_end(buf);
            }
            EditCommand::PageUp => self.cursor.page_up(self.viewport_height, buf),
            EditCommand::PageDown => self.cursor.page_down(self.viewport_height, buf),

            // -- Editing ----------------------------------------------------
            EditCommand::InsertChar(ch) => {
                let mut utf8 = [0u8; 4];
                self.insert(ch.encode_utf8(&mut utf8));
            }
            EditCommand::InsertText(text) => self.insert(text),
            EditCommand::Newline => {
                let next = self.buffer.split_line(
                    pos,
                    self.options.auto_indent,
                    self.options.indent_width(),
                );
                self.cursor.set(next, &self.buffer);
            }
            EditCommand::Backspace => {
                let next = self.buffer.backspace(pos, self.options.indent_width());
                self.cursor.set(next, &self.buffer);
            }
            EditCommand::Delete => self.buffer.delete_forward(pos),
            EditCommand::Tab => {
                let width = self.options.indent_width();
                self.insert(&" ".repeat(width - pos.col % width));
            }
            EditCommand::Indent => self.shift_line(1),
            EditCommand::Dedent => self.shift_line(-1),
            EditCommand::DuplicateLine => {
                self.buffer.duplicate_line(pos.line);
                self.cursor.move_down(1, &self.buffer);
            }

            // -- Clipboard --------------------------------------------------
            EditCommand::CutLine => {
                self.clipboard = vec![self.buffer.remove_line(pos.line)];
                self.cursor.set(Position::new(pos.line, 0), &self.buffer);
            }
            EditCommand::CopyLine => {
                self.clipboard = vec![self.buffer.line(pos.line)];
                return Some(Message::info("Line copied to clipboard"));
            }
            EditCommand::Paste => {
                if !self.clipboard.is_empty() {
                    let text = self.clipboard.join("\n");
                    self.insert(&text);
                }
            }
            EditCommand::CutToLineEnd => {
                self.clipboard = vec![self.buffer.truncate_line(pos)];
            }

            // -- Search -----------------------------------------------------
            EditCommand::Find(term) => {
                self.search_term.clone_from(term);
                return Some(self.jump_to_match(true));
            }
            EditCommand::FindNext | EditCommand::FindPrev => {
                if self.search_term.is_empty() {
                    return Some(Message::warning("No search term"));
                }
                return Some(self.jump_to_match(matches!(cmd, EditCommand::FindNext)));
            }
            EditCommand::Replace(replacement) => {
                self.replace_term.clone_from(replacement);
                let found =
                    search::replace_next(&mut self.buffer, &self.search_term, replacement, pos);
                return Some(match found {
                    Some(end) => {
                        self.cursor.set(end, &self.buffer);
                        Message::info(format!("Replaced: {} -> {replacement}", self.search_term))
                    }
                    None => Message::warning(format!("Not found: {}", self.search_term)),
                });
            }
            EditCommand::ReplaceAll(replacement) => {
                self.replace_term.clone_from(replacement);
                let count = search::replace_all(&mut self.buffer, &self.search_term, replacement);
                return Some(if count > 0 {
                    Message::info(format!("Replaced {count} occurrence(s)"))
                } else {
                    Message::warning(format!("Not found: {}", self.search_term))
                });
            }

            // -- Navigation -------------------------------------------------
            EditCommand::GotoLine(input) => return Some(self.goto_line(input)),
            EditCommand::ToggleBookmark => {
                let added = self.bookmarks.toggle(pos);
                let verb = if added { "added" } else { "removed" };
                return Some(Message::info(format!(
                    "Bookmark {verb} at line {}",
                    pos.line + 1
                )));
            }
            EditCommand::JumpToBookmark(index) => {
                if let Some(mark) = self.bookmarks.get(*index) {
                    self.cursor.set(mark, &self.buffer);
                }
            }

            // -- View -------------------------------------------------------
            EditCommand::ToggleLineNumbers => {
                self.options.line_numbers = !self.options.line_numbers;
            }
            EditCommand::ToggleLineWrap => {
                self.options.line_wrap = !self.options.line_wrap;
                let state = if self.options.line_wrap { "enabled" } else { "disabled" };
                return Some(Message::info(format!("Line wrap {state}")));
            }

            // -- File -------------------------------------------------------
            EditCommand::Save => return Some(self.save()),
            EditCommand::AutoFormat => {
                return Some(Message::warning(format!(
                    "Auto-format not supported for {}",
                    self.language
                )));
            }

            // -- Macros -----------------------------------------------------
            EditCommand::ToggleMacroRecording => {
                return Some(if self.macros.is_recording() {
                    let count = self.macros.stop();
                    Message::info(format!("Macro recorded ({count} commands)"))
                } else {
                    self.macros.start();
                    Message::info("Macro recording started")
                });
            }
            EditCommand::CancelMacroRecording => {
                if self.macros.cancel() {
                    return Some(Message::info("Macro recording cancelled"));
                }
            }
            EditCommand::RunMacro => return Some(self.run_macro()),
        }
        None
    }

    // -- Command helpers ----------------------------------------------------

    /// The live selection, if any. The anchor is dropped either way.
    fn take_selection(&mut self) -> Option<Selection> {
        let sel = self.cursor.selection();
        self.cursor.clear_selection();
        sel
    }

    /// Clipboard and delete commands work on the selection instead of the
    /// cursor line. Typing and pasting replace it.
    fn on_selection(&mut self, cmd: &EditCommand, sel: Selection) -> ControlFlow<Outcome> {
        match cmd {
            EditCommand::CopyLine => {
                self.clipboard = vec![self.buffer.get_range(sel)];
                ControlFlow::Break(Some(Message::info("Selection copied to clipboard")))
            }
            EditCommand::CutLine | EditCommand::Backspace | EditCommand::Delete => {
                let removed = self.buffer.delete_range(sel);
                if matches!(cmd, EditCommand::CutLine) {
                    self.clipboard = vec![removed];
                }
                self.cursor.set(sel.start, &self.buffer);
                ControlFlow::Break(None)
            }
            EditCommand::InsertChar(_)
            | EditCommand::InsertText(_)
            | EditCommand::Newline
            | EditCommand::Tab
            | EditCommand::Paste => {
                self.buffer.delete_range(sel);
                self.cursor.set(sel.start, &self.buffer);
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Continue(()),
        }
    }

    fn insert(&mut self, text: &str) {
        let next = self.buffer.insert_text(self.cursor.position(), text);
        self.cursor.set(next, &self.buffer);
    }

    /// Indent or dedent the cursor line, keeping the cursor on the same
    /// text.
    fn shift_line(&mut self, amount: isize) {
        let pos = self.cursor.position();
        let before = self.buffer.line_len(pos.line);
        self.buffer
            .indent_line(pos.line, amount, self.options.indent_width());
        let after = self.buffer.line_len(pos.line);
        let col = (pos.col + after).saturating_sub(before);
        self.cursor.set(Position::new(pos.line, col), &self.buffer);
    }

    fn jump_to_match(&mut self, forward: bool) -> Message {
        let from = self.cursor.position();
        let found = if forward {
            search::find_next(&self.buffer, &self.search_term, from)
        } else {
            search::find_prev(&self.buffer, &self.search_term, from)
        };
        match found {
            Some(m) => {
                self.cursor.set(m.start, &self.buffer);
                Message::info(format!("Found: {}", self.search_term))
            }
            None => Message::warning(format!("Not found: {}", self.search_term)),
        }
    }

    fn goto_line(&mut self, input: &str) -> Message {
        let Ok(number) = input.trim().parse::<i64>() else {
            return Message::warning("Please enter a valid line number");
        };
        let target = number
            .checked_sub(1)
            .and_then(|n| usize::try_from(n).ok());
        let result = match target {
            Some(line) => self.cursor.goto_line(line, &self.buffer),
            None => Err(EditorError::InvalidLine { line: number }),
        };
        match result {
            Ok(()) => Message::info(format!("Jumped to line {number}")),
            Err(e) => Message::warning(e.to_string()),
        }
    }

    fn save(&mut self) -> Message {
        if self.options.read_only {
            return Message::warning(EditorError::ReadOnly.to_string());
        }
        if self.load_failed {
            let path = self.buffer.path().map(Path::to_path_buf).unwrap_or_default();
            return Message::error(EditorError::NotLoaded { path }.to_string());
        }
        match self.buffer.save() {
            Ok(()) => Message::info(format!("Saved {}", self.file_name)),
            Err(e) => {
                log::error!("{e}");
                Message::error(e.to_string())
            }
        }
    }

    /// Drain a copy of the recorded commands through `dispatch`.
    fn run_macro(&mut self) -> Message {
        if self.macros.is_recording() {
            return Message::warning("Stop recording before running the macro");
        }
        if self.macros.commands().is_empty() {
            return Message::info("No macro recorded");
        }
        let mut queue = self.macros.playback();
        let count = queue.len();
        while let Some(cmd) = queue.pop_front() {
            if let Some(msg) = self.dispatch(&cmd) {
                log::debug!("macro step {cmd}: {}", msg.text);
            }
        }
        Message::info(format!("Macro executed ({count} commands)"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
