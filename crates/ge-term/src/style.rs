// SPDX-License-Identifier: MIT
//
// Cell styling: colors and text attributes.
//
// Colors are kept in the form the terminal consumes. `Indexed` covers the
// 16 classic colors plus the 256-color cube, `Rgb` is truecolor, and
// `Default` defers to the terminal's own foreground or background.

use bitflags::bitflags;

// ─── Color ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    /// Palette index 0-255. 0-7 are the classic colors, 8-15 their bright
    /// variants.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);

    /// Parse a color as written in configuration: a classic color name
    /// (`"blue"`, `"bright-red"`), `"default"`, or `#rrggbb`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex);
        }
        let (bright, base) = name
            .strip_prefix("bright-")
            .or_else(|| name.strip_prefix("bright_"))
            .map_or((false, name.as_str()), |rest| (true, rest));
        let index = match base {
            "default" if !bright => return Some(Self::Default),
            "black" => 0,
            "red" => 1,
            "green" => 2,
            "yellow" => 3,
            "blue" => 4,
            "magenta" => 5,
            "cyan" => 6,
            "white" => 7,
            _ => return None,
        };
        Some(Self::Indexed(if bright { index + 8 } else { index }))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

// ─── Attributes ─────────────────────────────────────────────────────────────

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Foreground, background, and attributes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Style {
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attr::empty(),
    };

    #[must_use]
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Default,
            attrs: Attr::empty(),
        }
    }

    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Keep this style's foreground and attributes, but take the background
    /// from `under` when this one has none.
    #[must_use]
    pub const fn over(self, under: Self) -> Self {
        let bg = match self.bg {
            Color::Default => under.bg,
            bg => bg,
        };
        Self { bg, ..self }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
