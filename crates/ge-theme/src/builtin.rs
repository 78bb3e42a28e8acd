//! Named preset themes.

use crate::theme::Theme;

/// Look up a preset by name. `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "default" | "dark" => Some(Theme::dark()),
        "light" => Some(Theme::light()),
        _ => None,
    }
}

#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["default", "dark", "light"]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
