//! # ge-editor — editor core for geteed
//!
//! Everything between a decoded key and a painted frame:
//!
//! - **[`position`]** — `Position` (line, col) and `Selection`, 0-indexed
//! - **[`buffer`]** — `Buffer`, a line-addressed rope with file I/O and a dirty flag
//! - **[`cursor`]** — cursor movement, clamping, and goto-line
//! - **[`search`]** — literal find (wrapping) and replace
//! - **[`syntax`]** / **[`tokenizer`]** — per-language rule sets and the line scanner
//! - **[`command`]** — `EditCommand` and the user extension table
//! - **[`prompt`]** — the one-line Find / Replace / Go to line input
//! - **[`session`]** — one open file plus clipboard, bookmarks, and macros
//! - **[`view`]** — scrolling, gutter, status bar, and painting into a frame
//!
//! The binary owns the terminal, the key map, and which prompt is open;
//! this crate never touches stdin or stdout.

pub mod bookmarks;
pub mod buffer;
pub mod command;
pub mod cursor;
pub mod error;
pub mod macros;
pub mod options;
pub mod position;
pub mod prompt;
pub mod search;
pub mod session;
pub mod syntax;
pub mod tokenizer;
pub mod view;

pub use buffer::Buffer;
pub use command::{EditCommand, ExtensionTable};
pub use cursor::Cursor;
pub use error::{EditorError, Result};
pub use options::Options;
pub use position::{Position, Selection};
pub use prompt::{Prompt, PromptKind};
pub use session::{Level, Message, Outcome, Session};
pub use syntax::{RuleOverlay, RuleRegistry, RuleSet};
pub use view::{Bottom, View};
