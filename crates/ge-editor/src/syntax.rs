//! Syntax rule table: per-language keywords, delimiters, and number pattern.
//!
//! The [`RuleRegistry`] is built once at startup from the built-in table and
//! any overlays supplied by configuration, then handed to the tokenizer by
//! reference. It is never mutated afterwards.
//!
//! Overlay merging is field-wise. For a language already in the table only
//! the fields the overlay provides are replaced; a language the table has
//! never heard of is added with whatever fields it brings.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Highlighting rules for one language.
///
/// Delimiters are tried in order, so a multi-char delimiter must come before
/// any delimiter that is its prefix (`"""` before `"`).
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub keywords: Vec<String>,
    pub string_delimiters: Vec<String>,
    pub comment_delimiters: Vec<String>,
    /// Compiled with a leading `^` so it only matches at the scan position.
    number: Option<Regex>,
    number_source: Option<String>,
}

impl RuleSet {
    /// # Errors
    ///
    /// Returns the regex error if `number_pattern` doesn't compile.
    pub fn new(
        keywords: &[&str],
        string_delimiters: &[&str],
        comment_delimiters: &[&str],
        number_pattern: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let mut rules = Self {
            keywords: to_strings(keywords),
            string_delimiters: to_strings(string_delimiters),
            comment_delimiters: to_strings(comment_delimiters),
            number: None,
            number_source: None,
        };
        if let Some(pattern) = number_pattern {
            rules.set_number_pattern(pattern)?;
        }
        Ok(rules)
    }

    fn empty() -> Self {
        Self {
            keywords: Vec::new(),
            string_delimiters: Vec::new(),
            comment_delimiters: Vec::new(),
            number: None,
            number_source: None,
        }
    }

    /// Replace the number pattern. An empty pattern disables number
    /// highlighting.
    ///
    /// # Errors
    ///
    /// Returns the regex error and leaves the old pattern in place.
    pub fn set_number_pattern(&mut self, pattern: &str) -> Result<(), regex::Error> {
        if pattern.is_empty() {
            self.number = None;
            self.number_source = None;
            return Ok(());
        }
        self.number = Some(Regex::new(&format!("^(?:{pattern})"))?);
        self.number_source = Some(pattern.to_owned());
        Ok(())
    }

    /// The pattern as written in configuration, without the anchor.
    #[must_use]
    pub fn number_pattern(&self) -> Option<&str> {
        self.number_source.as_deref()
    }

    /// Length in bytes of a number starting at the front of `rest`. Empty
    /// matches don't count.
    #[must_use]
    pub fn match_number(&self, rest: &str) -> Option<usize> {
        let m = self.number.as_ref()?.find(rest)?;
        (m.end() > 0).then_some(m.end())
    }

    /// Apply an overlay's fields on top of these rules.
    fn merge(&mut self, language: &str, overlay: &RuleOverlay) {
        if let Some(keywords) = &overlay.keywords {
            self.keywords.clone_from(keywords);
        }
        if let Some(delims) = &overlay.string_delimiters {
            self.string_delimiters = non_empty(delims);
        }
        if let Some(delims) = &overlay.comment_delimiters {
            self.comment_delimiters = non_empty(delims);
        }
        if let Some(pattern) = &overlay.number_regex {
            if let Err(err) = self.set_number_pattern(pattern) {
                log::warn!("ignoring number_regex for '{language}': {err}");
            }
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// An empty delimiter would match everywhere.
fn non_empty(items: &[String]) -> Vec<String> {
    items.iter().filter(|s| !s.is_empty()).cloned().collect()
}

// ---------------------------------------------------------------------------
// RuleOverlay
// ---------------------------------------------------------------------------

/// A partial rule record as it appears in configuration. Absent fields
/// leave the built-in value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleOverlay {
    pub keywords: Option<Vec<String>>,
    pub string_delimiters: Option<Vec<String>>,
    pub comment_delimiters: Option<Vec<String>>,
    pub number_regex: Option<String>,
}

// ---------------------------------------------------------------------------
// RuleRegistry
// ---------------------------------------------------------------------------

const NUMBER: &str = r"\b\d+\b";

/// Immutable lookup from lowercase language id to its [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleSet>,
}

impl RuleRegistry {
    /// Only the built-in languages.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// The built-in languages with `overlays` merged in.
    pub fn new<'a, I>(overlays: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a RuleOverlay)>,
    {
        let mut rules = builtin_rules();
        for (language, overlay) in overlays {
            let key = language.to_lowercase();
            match rules.get_mut(&key) {
                Some(existing) => existing.merge(&key, overlay),
                None => {
                    let mut fresh = RuleSet::empty();
                    fresh.merge(&key, overlay);
                    log::info!("added highlighting rules for '{key}'");
                    rules.insert(key, fresh);
                }
            }
        }
        Self { rules }
    }

    /// Rules for `language`, matched case-insensitively. `None` means no
    /// highlighting.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&RuleSet> {
        self.rules.get(&language.to_lowercase())
    }

    /// Sorted language ids.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.rules.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> HashMap<String, RuleSet> {
    let table: [(&str, &[&str], &[&str], &[&str]); 3] = [
        (
            "python",
            &[
                "def", "class", "if", "else", "elif", "for", "while", "try", "except", "finally",
                "with", "import", "from", "as", "return", "yield", "break", "continue", "pass",
                "raise", "lambda", "and", "or", "not", "is", "in", "True", "False", "None",
            ],
            &["\"\"\"", "'''", "\"", "'"],
            &["#"],
        ),
        (
            "cpp",
            &[
                "class", "struct", "if", "else", "for", "while", "try", "catch", "throw",
                "namespace", "using", "return", "break", "continue", "switch", "case", "default",
                "auto", "const", "static", "volatile", "public", "private", "protected",
                "template", "typename", "bool", "int", "float", "double", "char", "void", "true",
                "false", "nullptr",
            ],
            &["\"", "'"],
            &["//", "/*", "*/"],
        ),
        (
            "javascript",
            &[
                "function", "class", "if", "else", "for", "while", "try", "catch", "finally",
                "throw", "return", "break", "continue", "switch", "case", "default", "var", "let",
                "const", "true", "false", "null", "undefined", "this", "new", "delete", "typeof",
                "instanceof", "await", "async", "yield",
            ],
            &["\"", "'", "`"],
            &["//", "/*", "*/"],
        ),
    ];

    table
        .into_iter()
        .filter_map(|(id, keywords, strings, comments)| {
            match RuleSet::new(keywords, strings, comments, Some(NUMBER)) {
                Ok(rules) => Some((id.to_owned(), rules)),
                Err(err) => {
                    log::error!("built-in rules for '{id}' failed to build: {err}");
                    None
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Language detection
// ---------------------------------------------------------------------------

/// Language id for a file, from its extension. Unknown extensions are
/// `"text"`, which has no rules.
#[must_use]
pub fn detect_language(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "py" => "python",
        "cpp" | "hpp" | "c" | "h" => "cpp",
        "js" | "ts" => "javascript",
        "html" => "html",
        "css" => "css",
        "sh" | "bash" => "bash",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "kt" => "kotlin",
        "swift" => "swift",
        "php" => "php",
        "rb" => "ruby",
        "lua" => "lua",
        "pl" => "perl",
        "r" => "r",
        "sql" => "sql",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "md" => "markdown",
        _ => "text",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
