// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, painted frames out.
//
// The loop waits on the reader channel with a short timeout. Input is
// handled the moment it arrives; when the timeout fires instead, any lone
// ESC held by the parser is flushed as a key and the app gets a tick (used
// for expiring status messages). A frame is painted only when something
// marked it dirty, so an idle editor costs nothing.
//
// Resizes arrive as SIGWINCH, which only sets a flag; the loop notices it
// on the next iteration and repaints from scratch.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::frame::FrameBuffer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::render::Renderer;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// What the loop drives. Only [`paint`](App::paint) is required.
pub trait App {
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The frame has already been resized when this is called.
    fn on_resize(&mut self, _size: Size) {}

    /// Called whenever the input timeout fires. Return `true` to repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the whole screen. The buffer arrives blank.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Screen position for the visible cursor after painting, or `None`
    /// to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Input timeout in microseconds. Doubles as the ESC timeout and the
    /// tick interval.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 8333,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: Renderer,
    config: LoopConfig,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: Renderer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Take over the terminal and run until the app returns
    /// [`Action::Quit`] or stdin closes. The terminal is restored on the
    /// way out whatever happened inside.
    ///
    /// # Errors
    ///
    /// Fails if the terminal can't be set up or restored, or a frame
    /// can't be written.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        app.on_resize(size);
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        loop {
            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => {
                    if app.on_tick() {
                        dirty = true;
                    }
                    if self.parser.has_pending() {
                        self.parser.flush()
                    } else {
                        Vec::new()
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("input closed, leaving event loop");
                    return Ok(());
                }
            };

            if dispatch(app, &events) == Action::Quit {
                return Ok(());
            }
            dirty |= !events.is_empty();

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame, app.cursor());
                self.renderer.flush()?;
                dirty = false;
            }
        }
    }
}

fn dispatch(app: &mut impl App, events: &[Event]) -> Action {
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── Tests ───────────────────────────────────────────────────────────────────
