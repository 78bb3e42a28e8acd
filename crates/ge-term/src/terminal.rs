// SPDX-License-Identifier: MIT
//
// The editor's hold on the terminal.
//
// `Terminal::enter` saves stdin's termios settings, switches to raw input
// and draws on the alternate screen with bracketed paste on. `leave`, or
// dropping the handle, puts everything back. The saved settings live in one
// static slot so the panic hook can restore them too: a panic while raw
// would otherwise leave the user's shell unusable.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::Once;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when stdout is not a terminal (tests, pipes).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Ask the terminal on stdout.
    #[cfg(unix)]
    #[must_use]
    pub fn query() -> Option<Self> {
        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
        (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub const fn query() -> Option<Self> {
        None
    }
}

// ─── Raw input ──────────────────────────────────────────────────────────────

#[cfg(unix)]
mod raw {
    use std::io;
    use std::sync::Mutex;

    /// Settings from before `make_raw`, present only while raw.
    static SAVED: Mutex<Option<libc::termios>> = Mutex::new(None);

    fn set(termios: &libc::termios) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Raw stdin, ISIG included, so Ctrl+C and Ctrl+Z reach the editor as
    /// keys. Does nothing when stdin is not a terminal.
    pub fn make_raw() -> io::Result<()> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(());
        }
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = termios;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        set(&termios)?;
        if let Ok(mut slot) = SAVED.lock() {
            *slot = Some(saved);
        }
        Ok(())
    }

    /// Put the saved settings back. A second call finds the slot empty.
    pub fn restore() -> io::Result<()> {
        let saved = SAVED.lock().ok().and_then(|mut slot| slot.take());
        saved.map_or(Ok(()), |termios| set(&termios))
    }

    /// Raw bytes to fd 1; the stdout lock may be held mid-frame.
    pub fn write_stdout(bytes: &[u8]) {
        let _ = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                bytes.as_ptr().cast::<libc::c_void>(),
                bytes.len(),
            )
        };
    }
}

#[cfg(not(unix))]
mod raw {
    use std::io::{self, Write};

    pub const fn make_raw() -> io::Result<()> {
        Ok(())
    }

    pub const fn restore() -> io::Result<()> {
        Ok(())
    }

    pub fn write_stdout(bytes: &[u8]) {
        let mut out = io::stdout();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

/// What `leave` writes, as one constant for the panic hook: end synchronized
/// output, paste mode off, attributes reset, cursor shown, and the alternate
/// screen left last.
const RESTORE_SEQUENCE: &[u8] = b"\x1b[?2026l\x1b[?2004l\x1b[0m\x1b[?25h\x1b[?1049l";

fn write_restore(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::disable_bracketed_paste(w)?;
    ansi::reset(w)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)
}

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            raw::write_stdout(RESTORE_SEQUENCE);
            let _ = raw::restore();
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The screen, held between [`enter`](Self::enter) and
/// [`leave`](Self::leave). Dropping an entered handle leaves.
pub struct Terminal {
    size: Size,
    entered: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// A handle that hasn't touched the terminal yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: Size::query().unwrap_or(Size::FALLBACK),
            entered: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Ask again after a SIGWINCH. Keeps the old size if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = Size::query() {
            self.size = size;
        }
        self.size
    }

    /// # Errors
    ///
    /// Fails if raw mode can't be set or stdout can't be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        install_panic_hook();
        raw::make_raw()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_bracketed_paste(&mut out)?;
        out.flush()?;

        self.entered = true;
        log::debug!("terminal entered ({}x{})", self.size.cols, self.size.rows);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if stdout can't be written or termios can't be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;

        let mut out = io::stdout().lock();
        write_restore(&mut out)?;
        out.flush()?;
        drop(out);

        raw::restore()?;
        log::debug!("terminal restored");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_sequence_leaves_alt_screen_last() {
        let s = std::str::from_utf8(RESTORE_SEQUENCE).unwrap();
        assert!(s.ends_with("\x1b[?1049l"));
        assert!(s.contains("\x1b[?2004l"));
        assert!(s.contains("\x1b[?25h"));
    }

    #[test]
    fn panic_hook_and_leave_write_the_same_bytes() {
        let mut out = Vec::new();
        write_restore(&mut out).unwrap();
        assert_eq!(out, RESTORE_SEQUENCE);
    }

    #[test]
    fn new_handle_has_a_usable_size() {
        let term = Terminal::new();
        assert!(term.size().cols > 0);
        assert!(term.size().rows > 0);
        assert_eq!(Terminal::default().size(), term.size());
    }

    #[test]
    fn leave_without_enter_does_nothing() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.entered);
    }

    #[test]
    fn restore_without_raw_mode_is_ok() {
        raw::restore().unwrap();
    }
}
