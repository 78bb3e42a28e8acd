// SPDX-License-Identifier: MIT
//
// ge-term — terminal plumbing for geteed.
//
// Raw mode through termios, a background stdin reader, a byte-level key
// parser, a styled cell framebuffer, and a differential renderer that only
// rewrites cells that changed since the last frame. No TUI framework sits
// in between; every escape sequence is written here.
//
// The editor core never touches the terminal directly. It paints into a
// `FrameBuffer` and receives `Event`s through the `App` trait.

pub mod ansi;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod reader;
pub mod render;
pub mod style;
pub mod terminal;
