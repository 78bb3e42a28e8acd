// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares each painted frame with the previous one and emits escape
// sequences only for cells that changed. Unchanged rows are skipped with a
// single slice comparison. Within a frame the renderer tracks where the
// terminal cursor is and which style is active, so runs of adjacent cells
// in one style cost one cursor move and one SGR sequence.
//
// Output is collected in memory and written with one syscall, wrapped in
// synchronized-output markers so the terminal never shows half a frame.

use std::io::{self, Write};

use crate::ansi;
use crate::frame::{Cell, FrameBuffer};
use crate::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
}

/// Where the terminal's cursor and pen are, as far as this frame knows.
#[derive(Default)]
struct Pen {
    at: Option<(u16, u16)>,
    style: Option<Style>,
}

pub struct Renderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: Vec::with_capacity(16 * 1024),
            previous: None,
        }
    }

    /// Diff `current` against the last rendered frame, then place the
    /// visible cursor at `cursor` (hidden when `None`). Call
    /// [`flush`](Self::flush) to send the result.
    pub fn render(&mut self, current: &FrameBuffer, cursor: Option<(u16, u16)>) -> RenderStats {
        self.output.clear();
        let mut stats = RenderStats::default();
        let (width, height) = (current.width(), current.height());

        // Writes into a Vec<u8> cannot fail.
        ansi::begin_sync(&mut self.output).ok();
        ansi::cursor_hide(&mut self.output).ok();

        let full_redraw = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != width || prev.height() != height);
        if full_redraw {
            ansi::reset(&mut self.output).ok();
            ansi::clear_screen(&mut self.output).ok();
        }

        let mut pen = Pen::default();
        for y in 0..height {
            let row = current.row(y).unwrap_or_default();
            let prev_row = if full_redraw {
                None
            } else {
                self.previous.as_ref().and_then(|p| p.row(y))
            };
            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            for (x, cell) in (0u16..).zip(row) {
                if prev_row.is_some_and(|p| p[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                    continue;
                }
                write_cell(&mut self.output, &mut pen, x, y, *cell);
                stats.cells_rendered += 1;
            }
        }

        ansi::reset(&mut self.output).ok();
        if let Some((x, y)) = cursor {
            ansi::cursor_to(&mut self.output, x, y).ok();
            ansi::cursor_show(&mut self.output).ok();
        }
        ansi::end_sync(&mut self.output).ok();

        match &mut self.previous {
            Some(prev) if prev.width() == width && prev.height() == height => {
                prev.clone_from(current);
            }
            _ => self.previous = Some(current.clone()),
        }
        stats
    }

    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write the last frame's output to stdout.
    ///
    /// # Errors
    ///
    /// Fails if stdout can't be written.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// # Errors
    ///
    /// Fails if `w` can't be written.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.output)?;
        w.flush()?;
        self.output.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_cell(out: &mut Vec<u8>, pen: &mut Pen, x: u16, y: u16, cell: Cell) {
    // The terminal already advanced past this column when it drew the
    // wide char on the left.
    let Some(ch) = cell.ch else {
        return;
    };
    if pen.at != Some((x, y)) {
        ansi::cursor_to(out, x, y).ok();
    }
    if pen.style != Some(cell.style) {
        ansi::style(out, cell.style).ok();
        pen.style = Some(cell.style);
    }
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    #[allow(clippy::cast_possible_truncation)] // width is 1 or 2
    let advance = crate::frame::char_width(ch).max(1) as u16;
    pen.at = Some((x.saturating_add(advance), y));
}

// ─── Tests ───────────────────────────────────────────────────────────────────
