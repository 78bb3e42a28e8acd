// SPDX-License-Identifier: MIT
//
// Built-in key map.
//
// Most keys translate straight into an `EditCommand` for the session. The
// rest open something in the editor shell itself (a prompt, the bookmark
// list, help) or quit. Ctrl codes the terminal already owns are moved:
// Ctrl+M is Enter and Ctrl+/ is unreliable, so macro recording sits on
// Alt+M and dedent on Alt+[.

use ge_editor::EditCommand;
use ge_term::input::{KeyCode, KeyEvent, Modifiers};

/// What a key does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Edit(EditCommand),
    Shell(ShellAction),
}

/// Actions handled by the editor shell rather than the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Quit,
    Find,
    Replace { all: bool },
    GotoLine,
    Bookmarks,
    Help,
    /// A known key whose feature doesn't exist; the text names it.
    NotImplemented(&'static str),
}

/// Look up the built-in binding for `key`.
pub fn lookup(key: KeyEvent) -> Option<Binding> {
    use EditCommand as E;
    use ShellAction as S;

    let edit = |cmd| Some(Binding::Edit(cmd));
    let shell = |action| Some(Binding::Shell(action));
    let mods = key.modifiers;

    if mods == Modifiers::CTRL {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        return match c {
            'a' => edit(E::LineStart),
            'e' => edit(E::LineEnd),
            'd' => edit(E::DuplicateLine),
            ']' => edit(E::Indent),
            '^' => edit(E::AutoFormat),
            'x' => edit(E::CutLine),
            'c' => edit(E::CopyLine),
            'v' | 'y' => edit(E::Paste),
            'k' => edit(E::CutToLineEnd),
            's' => edit(E::Save),
            'b' => edit(E::ToggleBookmark),
            '\\' => edit(E::RunMacro),
            't' => edit(E::ToggleLineNumbers),
            'w' => edit(E::ToggleLineWrap),
            'q' => shell(S::Quit),
            'f' => shell(S::Find),
            'r' => shell(S::Replace { all: false }),
            'l' => shell(S::GotoLine),
            'g' => shell(S::Bookmarks),
            'n' => shell(S::NotImplemented("New file")),
            'o' => shell(S::NotImplemented("Open file")),
            'p' => shell(S::NotImplemented("Print")),
            'z' => shell(S::NotImplemented("Undo")),
            'u' => shell(S::NotImplemented("Redo")),
            _ => None,
        };
    }

    if mods == Modifiers::ALT {
        return match key.code {
            KeyCode::Char('[') => edit(E::Dedent),
            KeyCode::Char('m' | 'M') => edit(E::ToggleMacroRecording),
            KeyCode::Char('r' | 'R') => shell(S::Replace { all: true }),
            _ => None,
        };
    }

    if mods == Modifiers::SHIFT {
        let shifted = match key.code {
            KeyCode::F(3) => Some(E::FindPrev),
            KeyCode::Up => Some(E::SelectUp),
            KeyCode::Down => Some(E::SelectDown),
            KeyCode::Left => Some(E::SelectLeft),
            KeyCode::Right => Some(E::SelectRight),
            KeyCode::Home => Some(E::SelectLineStart),
            KeyCode::End => Some(E::SelectLineEnd),
            _ => None,
        };
        if shifted.is_some() {
            return shifted.map(Binding::Edit);
        }
    }

    // Terminals report some shifted keys with the flag and some without.
    if !(mods.is_empty() || mods == Modifiers::SHIFT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => edit(E::InsertChar(c)),
        KeyCode::Up => edit(E::MoveUp),
        KeyCode::Down => edit(E::MoveDown),
        KeyCode::Left => edit(E::MoveLeft),
        KeyCode::Right => edit(E::MoveRight),
        KeyCode::Home => edit(E::LineStart),
        KeyCode::End => edit(E::LineEnd),
        KeyCode::PageUp => edit(E::PageUp),
        KeyCode::PageDown => edit(E::PageDown),
        KeyCode::Enter => edit(E::Newline),
        KeyCode::Backspace => edit(E::Backspace),
        KeyCode::Delete => edit(E::Delete),
        KeyCode::Tab => edit(E::Tab),
        KeyCode::Escape => edit(E::CancelMacroRecording),
        KeyCode::F(1) => shell(S::Help),
        KeyCode::F(3) => edit(E::FindNext),
        _ => None,
    }
}

pub const HELP: &[&str] = &[
    "GETEED (General Text Editor) Help",
    "--------------------------------",
    "Navigation:",
    "  Arrow Keys    - Move cursor",
    "  Home/End      - Move to start/end of line",
    "  Ctrl+A/Ctrl+E - Move to start/end of line",
    "  Page Up/Dn    - Move up/down one screen",
    "  Ctrl+L        - Go to line number",
    "  Shift+Arrows  - Select text (also Shift+Home/End)",
    "",
    "Editing:",
    "  Enter         - Insert new line",
    "  Backspace     - Delete previous character",
    "  Delete        - Delete next character",
    "  Tab           - Insert spaces",
    "  Ctrl+D        - Duplicate line",
    "  Ctrl+]/Alt+[  - Indent right/left",
    "  Ctrl+^        - Auto format",
    "",
    "Clipboard:",
    "  Ctrl+X        - Cut line or selection",
    "  Ctrl+C        - Copy line or selection",
    "  Ctrl+V/Ctrl+Y - Paste",
    "  Ctrl+K        - Cut to end of line",
    "",
    "Search & Replace:",
    "  Ctrl+F        - Find",
    "  F3/Shift+F3   - Find next/previous",
    "  Ctrl+R        - Replace",
    "  Alt+R         - Replace all",
    "",
    "Bookmarks:",
    "  Ctrl+B        - Toggle bookmark",
    "  Ctrl+G        - Go to bookmark",
    "",
    "Macros:",
    "  Alt+M         - Toggle macro recording",
    "  Ctrl+\\        - Run macro",
    "  ESC           - Cancel recording",
    "",
    "File Operations:",
    "  Ctrl+S        - Save file",
    "  Ctrl+Q        - Quit",
    "",
    "View Options:",
    "  Ctrl+T        - Toggle line numbers",
    "  Ctrl+W        - Toggle line wrap",
    "",
    "Press any key to continue...",
];
