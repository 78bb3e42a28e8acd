// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Stateless writers for every terminal command geteed uses. Deciding when
// to emit them is the renderer's business. Positions are 0-indexed here and
// converted to the terminal's 1-indexed form on the way out.

use std::io::{self, Write};

use crate::style::{Attr, Color, Style};

// ─── Cursor ──────────────────────────────────────────────────────────────────

#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0: drop every color and attribute.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// DEC 2026: the terminal holds output until [`end_sync`].
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Switch to `style` with one SGR sequence. Starts from a reset so nothing
/// from the previous style leaks through.
pub fn style(w: &mut impl Write, style: Style) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;
    for (flag, code) in [
        (Attr::BOLD, "1"),
        (Attr::DIM, "2"),
        (Attr::ITALIC, "3"),
        (Attr::UNDERLINE, "4"),
        (Attr::REVERSE, "7"),
    ] {
        if style.attrs.contains(flag) {
            write!(w, ";{code}")?;
        }
    }
    color(w, style.fg, 30, 90, 38)?;
    color(w, style.bg, 40, 100, 48)?;
    w.write_all(b"m")
}

/// One color parameter. `base` is the code for palette entry 0,
/// `bright` for entry 8, `extended` the 256/truecolor prefix.
fn color(w: &mut impl Write, c: Color, base: u16, bright: u16, extended: u16) -> io::Result<()> {
    match c {
        Color::Default => Ok(()),
        Color::Indexed(i) if i < 8 => write!(w, ";{}", base + u16::from(i)),
        Color::Indexed(i) if i < 16 => write!(w, ";{}", bright + u16::from(i - 8)),
        Color::Indexed(i) => write!(w, ";{extended};5;{i}"),
        Color::Rgb(r, g, b) => write!(w, ";{extended};2;{r};{g};{b}"),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
