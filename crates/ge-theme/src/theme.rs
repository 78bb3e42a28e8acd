//! Theme: one [`Style`] per highlight group.
//!
//! Groups are plain fields so the view reads them without lookups. The
//! by-name accessors exist for configuration, where groups are addressed
//! with the same snake_case names as the fields.

use ge_term::style::{Attr, Color, Style};

use crate::overlay::ThemeError;

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,

    // ── Chrome ────────────────────────────────────────────────
    pub line_number: Style,
    pub current_line: Style,
    pub status_bar: Style,
    pub selection: Style,

    // ── Text ──────────────────────────────────────────────────
    pub text: Style,
    pub keyword: Style,
    pub string: Style,
    pub comment: Style,
    pub number: Style,

    // ── Messages ──────────────────────────────────────────────
    pub error: Style,
    pub warning: Style,
    pub info: Style,
}

/// Every group name, in declaration order.
pub const GROUP_NAMES: &[&str] = &[
    "line_number",
    "current_line",
    "status_bar",
    "selection",
    "text",
    "keyword",
    "string",
    "comment",
    "number",
    "error",
    "warning",
    "info",
];

impl Theme {
    /// Light text on the terminal's own background. The current line is a
    /// dark grey band.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_owned(),
            is_dark: true,
            line_number: Style::fg(Color::CYAN),
            current_line: Style::PLAIN.with_bg(Color::Indexed(236)),
            status_bar: Style::fg(Color::WHITE).with_attrs(Attr::REVERSE),
            selection: Style::fg(Color::YELLOW).with_attrs(Attr::REVERSE),
            text: Style::fg(Color::WHITE),
            keyword: Style::fg(Color::BLUE).with_attrs(Attr::BOLD),
            string: Style::fg(Color::GREEN),
            comment: Style::fg(Color::CYAN),
            number: Style::fg(Color::MAGENTA),
            error: Style::fg(Color::RED).with_attrs(Attr::BOLD),
            warning: Style::fg(Color::YELLOW).with_attrs(Attr::BOLD),
            info: Style::fg(Color::GREEN).with_attrs(Attr::BOLD),
        }
    }

    /// For light terminal backgrounds: darker foregrounds, a pale current
    /// line band.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_owned(),
            is_dark: false,
            line_number: Style::fg(Color::Indexed(24)),
            current_line: Style::PLAIN.with_bg(Color::Indexed(254)),
            status_bar: Style::fg(Color::BLACK).with_attrs(Attr::REVERSE),
            selection: Style::fg(Color::Indexed(136)).with_attrs(Attr::REVERSE),
            text: Style::fg(Color::BLACK),
            keyword: Style::fg(Color::Indexed(18)).with_attrs(Attr::BOLD),
            string: Style::fg(Color::Indexed(28)),
            comment: Style::fg(Color::Indexed(244)).with_attrs(Attr::ITALIC),
            number: Style::fg(Color::Indexed(90)),
            error: Style::fg(Color::Indexed(160)).with_attrs(Attr::BOLD),
            warning: Style::fg(Color::Indexed(130)).with_attrs(Attr::BOLD),
            info: Style::fg(Color::Indexed(28)).with_attrs(Attr::BOLD),
        }
    }

    /// Group by its configuration name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<Style> {
        Some(match name {
            "line_number" => self.line_number,
            "current_line" => self.current_line,
            "status_bar" => self.status_bar,
            "selection" => self.selection,
            "text" => self.text,
            "keyword" => self.keyword,
            "string" => self.string,
            "comment" => self.comment,
            "number" => self.number,
            "error" => self.error,
            "warning" => self.warning,
            "info" => self.info,
            _ => return None,
        })
    }

    /// # Errors
    ///
    /// [`ThemeError::UnknownGroup`] if no group has that name.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut Style, ThemeError> {
        Ok(match name {
            "line_number" => &mut self.line_number,
            "current_line" => &mut self.current_line,
            "status_bar" => &mut self.status_bar,
            "selection" => &mut self.selection,
            "text" => &mut self.text,
            "keyword" => &mut self.keyword,
            "string" => &mut self.string,
            "comment" => &mut self.comment,
            "number" => &mut self.number,
            "error" => &mut self.error,
            "warning" => &mut self.warning,
            "info" => &mut self.info,
            _ => return Err(ThemeError::UnknownGroup(name.to_owned())),
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
