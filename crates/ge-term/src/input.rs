// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and paste events. Understands:
//
// - Control bytes (Ctrl+letter, Ctrl+\ ] ^ /)
// - Legacy CSI sequences with xterm modifier parameters
// - SS3 sequences (arrows and F1-F4 from some terminals)
// - Alt+key (ESC followed by a key)
// - UTF-8 multi-byte characters
// - Bracketed paste
//
// Escape sequences may arrive split over several reads, so the parser keeps
// unconsumed bytes between calls to `advance`. A lone ESC is ambiguous until
// nothing else arrives; the event loop calls `flush` after a short timeout
// to resolve it.
//
// `KeyEvent` also round-trips through the textual chord form used in the
// configuration file (`"ctrl+j"`, `"alt+x"`, `"shift+f3"`).

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Text between the bracketed paste delimiters, delivered whole.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::ALT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F20.
    F(u8),
}

bitflags! {
    /// xterm modifier bits; a CSI modifier parameter is `1 + bits`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Feed bytes and return every event they complete. Incomplete
    /// sequences stay buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let remaining = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find_subsequence(remaining, PASTE_END) else {
                    break;
                };
                let text = String::from_utf8_lossy(&remaining[..end]).into_owned();
                events.push(Event::Paste(text));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }

            if remaining.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            // A prefix of the paste marker longer than `ESC [` waits for
            // more bytes rather than being misread as some other CSI.
            if remaining.len() > 2 && PASTE_START.starts_with(remaining) {
                break;
            }

            match try_parse(remaining) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        events
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve whatever is still buffered after the input went quiet.
    ///
    /// A lone ESC becomes Escape. ESC followed by one byte becomes Alt+that
    /// key, which is how Alt+[ and Alt+O arrive since they look like the
    /// start of a CSI or SS3 sequence. Anything else is read byte by byte.
    pub fn flush(&mut self) -> Vec<Event> {
        let bytes = std::mem::take(&mut self.buf);
        if self.in_paste {
            self.in_paste = false;
            return vec![Event::Paste(String::from_utf8_lossy(&bytes).into_owned())];
        }

        let mut events = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == 0x1B {
                if let Some(KeyEvent { code, modifiers }) = bytes.get(i + 1).and_then(|&b| single_byte(b)) {
                    events.push(Event::Key(KeyEvent::new(code, modifiers | Modifiers::ALT)));
                    i += 2;
                    continue;
                }
            }
            if let Some(key) = single_byte(bytes[i]) {
                events.push(Event::Key(key));
            }
            i += 1;
        }
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    Event(Event, usize),
    Incomplete,
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x80..=0xBF => Parsed::Skip(1),
        0xC0..=0xFF => parse_utf8(buf),
        b => single_byte(b).map_or(Parsed::Skip(1), |key| Parsed::Event(Event::Key(key), 1)),
    }
}

/// The key a single ASCII byte stands for on its own.
fn single_byte(b: u8) -> Option<KeyEvent> {
    let key = match b {
        0x1B => KeyEvent::plain(KeyCode::Escape),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::plain(KeyCode::Enter),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x00 => KeyEvent::ctrl(' '),
        0x01..=0x1A => KeyEvent::ctrl(char::from(b - 1 + b'a')),
        0x1C => KeyEvent::ctrl('\\'),
        0x1D => KeyEvent::ctrl(']'),
        0x1E => KeyEvent::ctrl('^'),
        0x1F => KeyEvent::ctrl('/'),
        0x20..=0x7E => KeyEvent::plain(KeyCode::Char(char::from(b))),
        _ => return None,
    };
    Some(key)
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0xC0..=0xFF => match parse_utf8(&buf[1..]) {
            Parsed::Event(Event::Key(key), n) => Parsed::Event(
                Event::Key(KeyEvent::new(key.code, key.modifiers | Modifiers::ALT)),
                n + 1,
            ),
            Parsed::Incomplete => Parsed::Incomplete,
            _ => Parsed::Event(Event::Key(KeyEvent::plain(KeyCode::Escape)), 1),
        },
        b => single_byte(b).map_or_else(
            || Parsed::Event(Event::Key(KeyEvent::plain(KeyCode::Escape)), 1),
            |key| Parsed::Event(Event::Key(KeyEvent::new(key.code, key.modifiers | Modifiers::ALT)), 2),
        ),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter and intermediate bytes run until a final byte 0x40..=0x7E.
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Parsed::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match buf[end] {
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            11 => KeyCode::F(1),
            12 => KeyCode::F(2),
            13 => KeyCode::F(3),
            14 => KeyCode::F(4),
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Parsed::Skip(consumed),
        },
        b'Z' => {
            return Parsed::Event(Event::Key(KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT)), consumed);
        }
        letter => match letter_key(letter) {
            Some(code) => code,
            None => return Parsed::Skip(consumed),
        },
    };
    Parsed::Event(Event::Key(KeyEvent::new(code, modifiers)), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    letter_key(b).map_or(Parsed::Skip(3), |code| {
        Parsed::Event(Event::Key(KeyEvent::plain(code)), 3)
    })
}

/// Final letters shared by CSI and SS3.
const fn letter_key(b: u8) -> Option<KeyCode> {
    Some(match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < expected {
        return Parsed::Incomplete;
    }
    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Event(Event::Key(KeyEvent::plain(KeyCode::Char(ch))), expected)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Semicolon-separated numeric parameters. Empty fields read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)] // only the low three bits are flags
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Chord Text ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized key chord: {:?}", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// `"ctrl+j"`, `"Alt+X"`, `"shift+f3"`, `"ctrl+\"`, `"pagedown"`.
    /// Modifier and key names are case-insensitive; a single-char key is
    /// lowercased when Ctrl or Alt is held.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_owned());
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(err());
        }

        let mut modifiers = Modifiers::empty();
        let mut rest = trimmed;
        // The key itself may be `+`, so only split on a `+` with text after it.
        while let Some((head, tail)) = rest.split_once('+') {
            if tail.is_empty() {
                break;
            }
            modifiers |= match head.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "c" => Modifiers::CTRL,
                "alt" | "meta" | "m" => Modifiers::ALT,
                "shift" | "s" => Modifiers::SHIFT,
                _ => return Err(err()),
            };
            rest = tail;
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let c = if modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
                    c.to_ascii_lowercase()
                } else {
                    c
                };
                KeyCode::Char(c)
            }
            _ => named_key(&rest.to_ascii_lowercase()).ok_or_else(err)?,
        };
        Ok(Self { code, modifiers })
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    Some(match name {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" | "bs" => KeyCode::Backspace,
        "esc" | "escape" => KeyCode::Escape,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        f => {
            let n: u8 = f.strip_prefix('f')?.parse().ok()?;
            if !(1..=20).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    })
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) if self.modifiers.is_empty() => write!(f, "{c}"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{n}"),
            code => write!(f, "{code:?}"),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    // ── Single bytes ────────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(
            parse(b"ab "),
            vec![key(KeyCode::Char('a')), key(KeyCode::Char('b')), key(KeyCode::Char(' '))]
        );
    }

    #[test]
    fn control_letters() {
        assert_eq!(parse(b"\x11"), vec![Event::Key(KeyEvent::ctrl('q'))]);
        assert_eq!(parse(b"\x13"), vec![Event::Key(KeyEvent::ctrl('s'))]);
    }

    #[test]
    fn named_control_bytes() {
        assert_eq!(parse(b"\r"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\t"), vec![key(KeyCode::Tab)]);
        assert_eq!(parse(b"\x7f"), vec![key(KeyCode::Backspace)]);
    }

    #[test]
    fn control_punctuation() {
        assert_eq!(parse(b"\x1c"), vec![Event::Key(KeyEvent::ctrl('\\'))]);
        assert_eq!(parse(b"\x1d"), vec![Event::Key(KeyEvent::ctrl(']'))]);
    }

    // ── CSI / SS3 ───────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![key(KeyCode::Up), key(KeyCode::Down), key(KeyCode::Right), key(KeyCode::Left)]
        );
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse(b"\x1b[3~"), vec![key(KeyCode::Delete)]);
        assert_eq!(parse(b"\x1b[5~"), vec![key(KeyCode::PageUp)]);
        assert_eq!(parse(b"\x1b[6~"), vec![key(KeyCode::PageDown)]);
        assert_eq!(parse(b"\x1b[1~"), vec![key(KeyCode::Home)]);
        assert_eq!(parse(b"\x1b[4~"), vec![key(KeyCode::End)]);
    }

    #[test]
    fn function_keys() {
        assert_eq!(parse(b"\x1bOP"), vec![key(KeyCode::F(1))]);
        assert_eq!(parse(b"\x1bOR"), vec![key(KeyCode::F(3))]);
        assert_eq!(parse(b"\x1b[15~"), vec![key(KeyCode::F(5))]);
        assert_eq!(parse(b"\x1b[24~"), vec![key(KeyCode::F(12))]);
    }

    #[test]
    fn modified_function_key() {
        assert_eq!(parse(b"\x1b[1;2R"), vec![key_mod(KeyCode::F(3), Modifiers::SHIFT)]);
        assert_eq!(
            parse(b"\x1b[1;5C"),
            vec![key_mod(KeyCode::Right, Modifiers::CTRL)]
        );
    }

    #[test]
    fn shift_tab() {
        assert_eq!(parse(b"\x1b[Z"), vec![key_mod(KeyCode::Tab, Modifiers::SHIFT)]);
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(parse(b"\x1b[99~x"), vec![key(KeyCode::Char('x'))]);
    }

    // ── Alt ─────────────────────────────────────────────────────────────

    #[test]
    fn alt_letter() {
        assert_eq!(parse(b"\x1bm"), vec![Event::Key(KeyEvent::alt('m'))]);
        assert_eq!(parse(b"\x1br"), vec![Event::Key(KeyEvent::alt('r'))]);
    }

    #[test]
    fn alt_bracket_resolves_on_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert_eq!(parser.flush(), vec![Event::Key(KeyEvent::alt('['))]);
    }

    #[test]
    fn lone_escape_on_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![key(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    // ── Incremental ─────────────────────────────────────────────────────

    #[test]
    fn split_sequence() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[2").is_empty());
        assert_eq!(parser.advance(b"4~"), vec![key(KeyCode::F(12))]);
    }

    #[test]
    fn split_utf8() {
        let mut parser = Parser::new();
        assert!(parser.advance(&[0xE4]).is_empty());
        assert_eq!(parser.advance(&[0xB8, 0xAD]), vec![key(KeyCode::Char('中'))]);
    }

    // ── Paste ───────────────────────────────────────────────────────────

    #[test]
    fn bracketed_paste() {
        assert_eq!(
            parse(b"\x1b[200~a\nb\x1b[201~x"),
            vec![Event::Paste("a\nb".into()), key(KeyCode::Char('x'))]
        );
    }

    #[test]
    fn paste_across_chunks() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[20").is_empty());
        assert!(parser.advance(b"0~hel").is_empty());
        assert_eq!(parser.advance(b"lo\x1b[201~"), vec![Event::Paste("hello".into())]);
    }

    // ── Chord text ──────────────────────────────────────────────────────

    #[test]
    fn chord_parsing() {
        assert_eq!("ctrl+j".parse(), Ok(KeyEvent::ctrl('j')));
        assert_eq!("Alt+X".parse(), Ok(KeyEvent::alt('x')));
        assert_eq!("f5".parse(), Ok(KeyEvent::plain(KeyCode::F(5))));
        assert_eq!(
            "shift+F3".parse(),
            Ok(KeyEvent::new(KeyCode::F(3), Modifiers::SHIFT))
        );
        assert_eq!("ctrl++".parse(), Ok(KeyEvent::ctrl('+')));
        assert_eq!("ctrl+\\".parse(), Ok(KeyEvent::ctrl('\\')));
    }

    #[test]
    fn chord_errors() {
        assert!("".parse::<KeyEvent>().is_err());
        assert!("hyper+a".parse::<KeyEvent>().is_err());
        assert!("f99".parse::<KeyEvent>().is_err());
        assert!("ctrl+banana".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn chord_display() {
        assert_eq!(KeyEvent::ctrl('s').to_string(), "Ctrl+S");
        assert_eq!(
            KeyEvent::new(KeyCode::F(3), Modifiers::SHIFT).to_string(),
            "Shift+F3"
        );
        assert_eq!(KeyEvent::plain(KeyCode::PageDown).to_string(), "PageDown");
    }

    #[test]
    fn chord_display_parses_back() {
        for key in [KeyEvent::alt('m'), KeyEvent::plain(KeyCode::F(1)), KeyEvent::ctrl(']')] {
            assert_eq!(key.to_string().parse(), Ok(key));
        }
    }
}
