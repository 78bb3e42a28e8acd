//! # ge-theme — color themes for geteed
//!
//! A [`Theme`] is a fixed set of named highlight groups (text, keyword,
//! status bar, ...) each resolved to a terminal [`Style`](ge_term::style::Style).
//! Two presets ship built in, and the `"theme"` table of the configuration
//! file can override individual groups through a [`ThemeOverlay`].

pub mod builtin;
pub mod overlay;
pub mod theme;

pub use builtin::{builtin_names, builtin_theme};
pub use overlay::{ColorSpec, ColorValue, ThemeError, ThemeOverlay};
pub use theme::{GROUP_NAMES, Theme};
