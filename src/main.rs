// SPDX-License-Identifier: MIT
//
// geteed — a general terminal text editor.
//
// This is the binary that wires the crates together:
//
//   ge-term   → terminal control, rendering, input parsing, event loop
//   ge-editor → buffer, cursor, search, tokenizer, session, view
//   ge-theme  → highlight groups and the dark/light presets
//
// The Editor struct implements ge-term's App trait. Each keypress flows
// through:
//
//   stdin → parser → on_event → key map → Session::apply → buffer/cursor
//   paint → View::render → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ gutter + text                │  ← h - 1 rows
//   ├──────────────────────────────┤
//   │ status / message / prompt    │  ← 1 row
//   └──────────────────────────────┘

mod config;
mod keymap;
mod logger;

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, bail};
use ge_editor::bookmarks::SELECTABLE;
use ge_editor::view::render_overlay;
use ge_editor::{
    Bottom, EditCommand, ExtensionTable, Message, Outcome, Prompt, PromptKind, RuleRegistry,
    Session, View,
};
use ge_term::event_loop::{Action, App, EventLoop};
use ge_term::frame::FrameBuffer;
use ge_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use ge_term::terminal::Size;
use ge_theme::{Theme, builtin_theme};

use crate::config::Config;
use crate::keymap::{Binding, HELP, ShellAction};

const USAGE: &str = "Usage: geteed <filename> [--nl] [--ro] [--light] [--dark]";

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: PathBuf,
    no_line_numbers: bool,
    read_only: bool,
    light: bool,
}

/// Flags may come before or after the file name. The last of
/// `--light`/`--dark` wins.
fn parse_args<I>(args: I) -> anyhow::Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut path = None;
    let mut parsed = Args {
        path: PathBuf::new(),
        no_line_numbers: false,
        read_only: false,
        light: false,
    };
    for arg in args {
        match arg.as_str() {
            "--nl" => parsed.no_line_numbers = true,
            "--ro" => parsed.read_only = true,
            "--light" => parsed.light = true,
            "--dark" => parsed.light = false,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if path.is_some() => bail!("only one file can be opened"),
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    parsed.path = path.context("no file name given")?;
    Ok(parsed)
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// What has the keyboard right now.
#[derive(Debug)]
enum Mode {
    Edit,
    /// A prompt on the bottom row. `then_replace` is set when the prompt
    /// is the search half of a replace, and says whether to replace all.
    Prompt {
        prompt: Prompt,
        then_replace: Option<bool>,
    },
    Bookmarks,
    Help,
}

struct Editor {
    session: Session,
    view: View,
    rules: RuleRegistry,
    theme: Theme,
    extensions: ExtensionTable,
    mode: Mode,

    /// The status message and when it expires.
    message: Option<(Message, Instant)>,

    /// Set by Ctrl+Q on a modified buffer. A second Ctrl+Q quits; Ctrl+S
    /// saves and quits; any other key disarms it.
    quit_pending: bool,

    /// Screen position of the cursor from the last paint.
    cursor_screen: Option<(u16, u16)>,

    /// Rows available for text (everything but the status row).
    text_height: usize,
}

impl Editor {
    fn new(session: Session, rules: RuleRegistry, theme: Theme, extensions: ExtensionTable) -> Self {
        Self {
            session,
            view: View::new(),
            rules,
            theme,
            extensions,
            mode: Mode::Edit,
            message: None,
            quit_pending: false,
            cursor_screen: None,
            text_height: usize::from(Size::FALLBACK.rows - 1),
        }
    }

    fn show(&mut self, outcome: Outcome) {
        if let Some(msg) = outcome {
            log::debug!("status: {}", msg.text);
            let expires = Instant::now() + msg.duration();
            self.message = Some((msg, expires));
        }
    }

    /// Run `cmd` on the session and report the result.
    fn apply(&mut self, cmd: EditCommand) {
        let outcome = self.session.apply(&cmd);
        if matches!(cmd, EditCommand::GotoLine(_) | EditCommand::JumpToBookmark(_)) {
            self.view.center_on(self.session.position().line, self.text_height);
        }
        self.show(outcome);
    }

    fn open_prompt(&mut self, prompt: Prompt, then_replace: Option<bool>) {
        self.mode = Mode::Prompt {
            prompt,
            then_replace,
        };
    }

    fn open_replace(&mut self, all: bool) {
        let kind = PromptKind::Replace {
            search: self.session.search_term().to_owned(),
            all,
        };
        let prompt = Prompt::with_text(kind, self.session.replace_term());
        self.open_prompt(prompt, None);
    }

    // ── Key handling ───────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match self.mode {
            Mode::Edit => self.handle_edit(key),
            Mode::Prompt { .. } => {
                self.handle_prompt(key);
                Action::Continue
            }
            Mode::Bookmarks => {
                self.mode = Mode::Edit;
                let digit = match key.code {
                    KeyCode::Char(c) => c.to_digit(10).and_then(|d| usize::try_from(d).ok()),
                    _ => None,
                };
                if let Some(n) = digit.filter(|n| (1..=SELECTABLE).contains(n)) {
                    if n <= self.session.bookmarks().len() {
                        self.apply(EditCommand::JumpToBookmark(n - 1));
                    }
                }
                Action::Continue
            }
            Mode::Help => {
                self.mode = Mode::Edit;
                Action::Continue
            }
        }
    }

    fn handle_edit(&mut self, key: KeyEvent) -> Action {
        let quit_pending = std::mem::take(&mut self.quit_pending);
        let binding = keymap::lookup(key)
            .or_else(|| self.extensions.lookup(&key).cloned().map(Binding::Edit));

        match binding {
            Some(Binding::Edit(EditCommand::Save)) if quit_pending => {
                self.apply(EditCommand::Save);
                if !self.session.is_modified() {
                    return Action::Quit;
                }
            }
            Some(Binding::Edit(cmd)) => self.apply(cmd),
            Some(Binding::Shell(action)) => return self.shell(action, quit_pending),
            None => log::debug!("unbound key {key}"),
        }
        Action::Continue
    }

    fn shell(&mut self, action: ShellAction, quit_pending: bool) -> Action {
        match action {
            ShellAction::Quit => {
                if !self.session.is_modified() || quit_pending {
                    log::info!("quit");
                    return Action::Quit;
                }
                self.quit_pending = true;
                self.show(Some(Message::warning(
                    "Unsaved changes! Press Ctrl+S to save or Ctrl+Q again to quit",
                )));
            }
            ShellAction::Find => {
                let prompt = Prompt::with_text(PromptKind::Find, self.session.search_term());
                self.open_prompt(prompt, None);
            }
            ShellAction::Replace { all } => {
                if self.session.search_term().is_empty() {
                    self.open_prompt(Prompt::new(PromptKind::Find), Some(all));
                } else {
                    self.open_replace(all);
                }
            }
            ShellAction::GotoLine => self.open_prompt(Prompt::new(PromptKind::GotoLine), None),
            ShellAction::Bookmarks => {
                if self.session.bookmarks().is_empty() {
                    self.show(Some(Message::info("No bookmarks set")));
                } else {
                    self.mode = Mode::Bookmarks;
                }
            }
            ShellAction::Help => self.mode = Mode::Help,
            ShellAction::NotImplemented(what) => {
                self.show(Some(Message::info(format!("{what} - Not implemented"))));
            }
        }
        Action::Continue
    }

    fn handle_prompt(&mut self, key: KeyEvent) {
        let Mode::Prompt { prompt, .. } = &mut self.mode else {
            return;
        };
        let plain = key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT;
        match key.code {
            KeyCode::Escape => self.mode = Mode::Edit,
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                prompt.backspace();
            }
            KeyCode::Delete => {
                prompt.delete();
            }
            KeyCode::Left => prompt.move_left(),
            KeyCode::Right => prompt.move_right(),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Char('a') if key.modifiers == Modifiers::CTRL => prompt.move_home(),
            KeyCode::Char('e') if key.modifiers == Modifiers::CTRL => prompt.move_end(),
            KeyCode::Char(c) if plain => prompt.insert_char(c),
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let Mode::Prompt {
            prompt,
            then_replace,
        } = std::mem::replace(&mut self.mode, Mode::Edit)
        else {
            return;
        };
        let Some(cmd) = prompt.submit() else {
            return;
        };
        let is_find = matches!(cmd, EditCommand::Find(_));
        self.apply(cmd);
        if is_find {
            if let Some(all) = then_replace {
                self.open_replace(all);
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        match &mut self.mode {
            Mode::Prompt { prompt, .. } => prompt.insert_str(&text),
            Mode::Edit => {
                self.quit_pending = false;
                self.apply(EditCommand::InsertText(text));
            }
            Mode::Bookmarks | Mode::Help => {}
        }
    }

    fn bookmark_lines(&self) -> Vec<String> {
        let mut lines = vec!["Bookmarks:".to_owned()];
        lines.extend(self.session.bookmark_entries());
        lines.push("Select bookmark (1-9): ".to_owned());
        lines
    }
}

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(text) => {
                self.handle_paste(text);
                Action::Continue
            }
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.text_height = usize::from(size.rows.saturating_sub(1)).max(1);
        self.session.set_viewport_height(self.text_height);
    }

    fn on_tick(&mut self) -> bool {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, expires)| Instant::now() >= *expires);
        if expired {
            self.message = None;
        }
        expired
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        match &self.mode {
            Mode::Help => {
                let lines: Vec<String> = HELP.iter().map(|&l| l.to_owned()).collect();
                render_overlay(frame, &lines, &self.theme);
                self.cursor_screen = None;
                return;
            }
            Mode::Bookmarks => {
                render_overlay(frame, &self.bookmark_lines(), &self.theme);
                self.cursor_screen = None;
                return;
            }
            Mode::Edit | Mode::Prompt { .. } => {}
        }

        let bottom = match (&self.mode, &self.message) {
            (Mode::Prompt { prompt, .. }, _) => Bottom::Prompt(prompt),
            (_, Some((msg, _))) => Bottom::Message(msg),
            _ => Bottom::Status,
        };
        let rules = self.rules.get(self.session.language());
        self.cursor_screen = self
            .view
            .render(&self.session, rules, &self.theme, bottom, frame);
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load_default();

    let mut options = config.options.clone().unwrap_or_default();
    options.read_only = args.read_only;
    if args.no_line_numbers {
        options.line_numbers = false;
    }

    let preset = if args.light { "light" } else { "dark" };
    let mut theme = builtin_theme(preset).unwrap_or_else(Theme::dark);
    if let Some(overlay) = &config.theme {
        overlay.apply(&mut theme);
    }
    let rules = RuleRegistry::new(&config.languages);
    log::debug!("highlighting rules: {}", rules.languages().join(", "));
    let extensions = ExtensionTable::from_config(&config.extensions);

    let (session, outcome) = Session::open(&args.path, options);
    log::info!(
        "editing {} as {} ({} lines)",
        session.file_name(),
        session.language(),
        session.buffer().line_count()
    );
    let mut editor = Editor::new(session, rules, theme, extensions);
    editor.show(outcome);

    EventLoop::new()
        .run(&mut editor)
        .context("terminal error while editing")?;
    Ok(())
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("geteed: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = logger::init() {
        eprintln!("geteed: logging disabled: {e}");
    }

    if let Err(e) = run(args) {
        log::error!("{e:#}");
        eprintln!("geteed: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
