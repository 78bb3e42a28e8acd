//! Theme overrides from configuration.
//!
//! The `"theme"` table maps group names to a color spec:
//!
//! ```json
//! "theme": {
//!     "keyword": "bright-blue",
//!     "comment": 244,
//!     "status_bar": { "fg": "black", "bg": "#5fafd7", "attrs": ["bold"] }
//! }
//! ```
//!
//! A bare color (name, `#rrggbb`, or palette index) replaces the group's
//! foreground and keeps its background and attributes. The table form
//! replaces only the fields it names. Entries that don't resolve are logged
//! and skipped; the rest still apply.

use std::collections::BTreeMap;

use ge_term::style::{Attr, Color, Style};
use serde::Deserialize;
use thiserror::Error;

use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("unknown theme group {0:?}")]
    UnknownGroup(String),
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    #[error("color index {0} is outside 0..=255")]
    IndexOutOfRange(i64),
    #[error("unknown text attribute {0:?}")]
    UnknownAttr(String),
}

// ---------------------------------------------------------------------------
// Specs
// ---------------------------------------------------------------------------

/// One color as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Index(i64),
    Name(String),
}

impl ColorValue {
    /// # Errors
    ///
    /// The name is not a color, or the index is not a palette entry.
    pub fn resolve(&self) -> Result<Color, ThemeError> {
        match self {
            Self::Index(i) => u8::try_from(*i)
                .map(Color::Indexed)
                .map_err(|_| ThemeError::IndexOutOfRange(*i)),
            Self::Name(name) => {
                Color::from_name(name).ok_or_else(|| ThemeError::UnknownColor(name.clone()))
            }
        }
    }
}

/// The value side of a `"theme"` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Color(ColorValue),
    Style {
        #[serde(default)]
        fg: Option<ColorValue>,
        #[serde(default)]
        bg: Option<ColorValue>,
        #[serde(default)]
        attrs: Option<Vec<String>>,
    },
}

impl ColorSpec {
    /// `base` with this spec laid over it.
    ///
    /// # Errors
    ///
    /// Any color or attribute in the spec fails to resolve.
    pub fn apply_to(&self, base: Style) -> Result<Style, ThemeError> {
        match self {
            Self::Color(c) => Ok(Style { fg: c.resolve()?, ..base }),
            Self::Style { fg, bg, attrs } => {
                let mut style = base;
                if let Some(fg) = fg {
                    style.fg = fg.resolve()?;
                }
                if let Some(bg) = bg {
                    style.bg = bg.resolve()?;
                }
                if let Some(names) = attrs {
                    style.attrs = names.iter().map(|n| parse_attr(n)).collect::<Result<_, _>>()?;
                }
                Ok(style)
            }
        }
    }
}

fn parse_attr(name: &str) -> Result<Attr, ThemeError> {
    match name.to_ascii_lowercase().as_str() {
        "bold" => Ok(Attr::BOLD),
        "dim" => Ok(Attr::DIM),
        "italic" => Ok(Attr::ITALIC),
        "underline" => Ok(Attr::UNDERLINE),
        "reverse" | "inverse" => Ok(Attr::REVERSE),
        _ => Err(ThemeError::UnknownAttr(name.to_owned())),
    }
}

// ---------------------------------------------------------------------------
// ThemeOverlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ThemeOverlay(pub BTreeMap<String, ColorSpec>);

impl ThemeOverlay {
    /// Apply every entry to `theme`, collecting the ones that failed.
    pub fn try_apply(&self, theme: &mut Theme) -> Vec<ThemeError> {
        let mut errors = Vec::new();
        for (group, spec) in &self.0 {
            let result = theme
                .group_mut(group)
                .and_then(|slot| spec.apply_to(*slot).map(|style| *slot = style));
            if let Err(e) = result {
                errors.push(e);
            }
        }
        errors
    }

    /// Apply every entry to `theme`, logging the ones that failed.
    pub fn apply(&self, theme: &mut Theme) {
        for e in self.try_apply(theme) {
            log::warn!("theme override ignored: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
