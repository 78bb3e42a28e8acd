//! Line tokenizer: one line in, a list of tagged spans out.
//!
//! A single left-to-right pass. At each position the scanner tries, in
//! order: opening a string, closing the open string, a comment, a keyword,
//! a number, and finally falls back to one plain char. A comment runs to the
//! end of the line. A string left open at the end of the line is tagged
//! through the end of that line only; each line is scanned on its own and no
//! state carries to the next.
//!
//! The result is contiguous, ordered, and covers the whole line. Runs of
//! plain chars are merged into a single span.

use crate::syntax::RuleSet;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Keyword,
    String,
    Comment,
    Number,
    Plain,
}

/// Chars `[start, end)` of a line and what they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

struct Scanner<'a> {
    line: &'a str,
    /// Byte offset of every char, plus `line.len()` at the end.
    offsets: Vec<usize>,
    spans: Vec<Span>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        let mut offsets: Vec<usize> = line.char_indices().map(|(b, _)| b).collect();
        offsets.push(line.len());
        Self {
            line,
            offsets,
            spans: Vec::new(),
        }
    }

    fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    fn rest(&self, i: usize) -> &'a str {
        &self.line[self.offsets[i]..]
    }

    /// Char length of `delim` if it starts at char `i`.
    fn delimiter_at(&self, i: usize, delim: &str) -> Option<usize> {
        self.rest(i).starts_with(delim).then(|| delim.chars().count())
    }

    fn char_at(&self, i: usize) -> Option<char> {
        self.rest(i).chars().next()
    }

    /// `keyword` at `i` with no alphanumeric char touching either end.
    fn keyword_at(&self, i: usize, keyword: &str) -> Option<usize> {
        let len = self.delimiter_at(i, keyword)?;
        let before = i.checked_sub(1).and_then(|p| self.char_at(p));
        let after = self.char_at(i + len);
        let bounded = |c: Option<char>| c.is_none_or(|c| !c.is_alphanumeric());
        (len > 0 && bounded(before) && bounded(after)).then_some(len)
    }

    fn number_at(&self, i: usize, rules: &RuleSet) -> Option<usize> {
        let bytes = rules.match_number(self.rest(i))?;
        let end_byte = self.offsets[i] + bytes;
        // Regex matches end on char boundaries, so this lookup succeeds.
        self.offsets[i..].iter().position(|&b| b == end_byte)
    }

    fn push(&mut self, start: usize, end: usize, kind: SpanKind) {
        if start == end {
            return;
        }
        if kind == SpanKind::Plain {
            if let Some(last) = self.spans.last_mut() {
                if last.kind == SpanKind::Plain && last.end == start {
                    last.end = end;
                    return;
                }
            }
        }
        self.spans.push(Span::new(start, end, kind));
    }

    fn run(mut self, rules: &RuleSet) -> Vec<Span> {
        let n = self.char_len();
        // (opening delimiter, start column) of the string being scanned.
        let mut open: Option<(&str, usize)> = None;
        let mut i = 0;

        while i < n {
            if let Some((delim, start)) = open {
                if let Some(len) = self.delimiter_at(i, delim) {
                    self.push(start, i + len, SpanKind::String);
                    open = None;
                    i += len;
                } else {
                    i += 1;
                }
                continue;
            }

            if let Some((delim, len)) = rules
                .string_delimiters
                .iter()
                .find_map(|d| self.delimiter_at(i, d).map(|len| (d.as_str(), len)))
            {
                open = Some((delim, i));
                i += len;
                continue;
            }

            if rules
                .comment_delimiters
                .iter()
                .any(|d| self.delimiter_at(i, d).is_some())
            {
                self.push(i, n, SpanKind::Comment);
                return self.spans;
            }

            if let Some(len) = rules.keywords.iter().find_map(|k| self.keyword_at(i, k)) {
                self.push(i, i + len, SpanKind::Keyword);
                i += len;
                continue;
            }

            if let Some(len) = self.number_at(i, rules) {
                self.push(i, i + len, SpanKind::Number);
                i += len;
                continue;
            }

            self.push(i, i + 1, SpanKind::Plain);
            i += 1;
        }

        if let Some((_, start)) = open {
            self.push(start, n, SpanKind::String);
        }
        self.spans
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Split `line` into spans using `rules`. Without rules the whole line is
/// one plain span. An empty line has no spans.
#[must_use]
pub fn tokenize(line: &str, rules: Option<&RuleSet>) -> Vec<Span> {
    let scanner = Scanner::new(line);
    let n = scanner.char_len();
    if n == 0 {
        return Vec::new();
    }
    match rules {
        Some(rules) => scanner.run(rules),
        None => vec![Span::new(0, n, SpanKind::Plain)],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::RuleRegistry;
    use pretty_assertions::assert_eq;
    use SpanKind::{Comment, Keyword, Number, Plain, String as Str};

    fn hash_rules() -> RuleSet {
        RuleSet::new(&[], &["\""], &["#"], Some(r"\d+")).unwrap()
    }

    /// Spans as `(text, kind)` pairs, easier to read in failures.
    fn pieces(line: &str, rules: &RuleSet) -> Vec<(String, SpanKind)> {
        let chars: Vec<char> = line.chars().collect();
        tokenize(line, Some(rules))
            .into_iter()
            .map(|s| (chars[s.start..s.end].iter().collect(), s.kind))
            .collect()
    }

    fn p(text: &str, kind: SpanKind) -> (String, SpanKind) {
        (text.to_owned(), kind)
    }

    // -- Basics -------------------------------------------------------------

    #[test]
    fn number_and_comment() {
        assert_eq!(
            pieces("x = 5 # comment", &hash_rules()),
            vec![p("x = ", Plain), p("5", Number), p(" ", Plain), p("# comment", Comment)]
        );
    }

    #[test]
    fn string_then_comment() {
        assert_eq!(
            pieces("say(\"hi\") # end", &hash_rules()),
            vec![p("say(", Plain), p("\"hi\"", Str), p(") ", Plain), p("# end", Comment)]
        );
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(tokenize("", Some(&hash_rules())).is_empty());
        assert!(tokenize("", None).is_empty());
    }

    #[test]
    fn no_rules_is_one_plain_span() {
        assert_eq!(tokenize("def x", None), vec![Span::new(0, 5, Plain)]);
    }

    // -- Strings ------------------------------------------------------------

    #[test]
    fn comment_marker_inside_string_is_text() {
        assert_eq!(
            pieces("\"a # b\" c", &hash_rules()),
            vec![p("\"a # b\"", Str), p(" c", Plain)]
        );
    }

    #[test]
    fn empty_string_literal() {
        assert_eq!(pieces("\"\"", &hash_rules()), vec![p("\"\"", Str)]);
    }

    #[test]
    fn unterminated_string_runs_to_line_end() {
        assert_eq!(
            pieces("x = \"open # 1", &hash_rules()),
            vec![p("x = ", Plain), p("\"open # 1", Str)]
        );
    }

    #[test]
    fn string_closes_only_on_same_delimiter() {
        let rules = RuleSet::new(&[], &["\"", "'"], &[], None).unwrap();
        assert_eq!(pieces("\"it's\"", &rules), vec![p("\"it's\"", Str)]);
    }

    #[test]
    fn triple_quote_wins_over_single() {
        let reg = RuleRegistry::builtin();
        let py = reg.get("python").unwrap();
        assert_eq!(
            pieces("\"\"\"doc \" still\"\"\"", py),
            vec![p("\"\"\"doc \" still\"\"\"", Str)]
        );
    }

    // -- Keywords -----------------------------------------------------------

    #[test]
    fn keywords_need_word_boundaries() {
        let reg = RuleRegistry::builtin();
        let py = reg.get("python").unwrap();
        assert_eq!(
            pieces("if iffy: return", py),
            vec![p("if", Keyword), p(" iffy: ", Plain), p("return", Keyword)]
        );
    }

    #[test]
    fn adjacent_keywords_stay_separate() {
        let rules = RuleSet::new(&["a", "b"], &[], &[], None).unwrap();
        assert_eq!(pieces("a b", &rules), vec![p("a", Keyword), p(" ", Plain), p("b", Keyword)]);
    }

    #[test]
    fn unicode_letters_block_keywords() {
        let rules = RuleSet::new(&["if"], &[], &[], None).unwrap();
        assert_eq!(pieces("éif", &rules), vec![p("éif", Plain)]);
    }

    // -- Comments -----------------------------------------------------------

    #[test]
    fn first_matching_comment_delimiter_ends_scan() {
        let reg = RuleRegistry::builtin();
        let cpp = reg.get("cpp").unwrap();
        assert_eq!(
            pieces("int x; /* note */ y", cpp),
            vec![p("int", Keyword), p(" x; ", Plain), p("/* note */ y", Comment)]
        );
    }

    // -- Coverage -----------------------------------------------------------

    #[test]
    fn spans_cover_line_contiguously() {
        let reg = RuleRegistry::builtin();
        let js = reg.get("javascript").unwrap();
        let line = "const é = `tmpl` + 42; // ok";
        let spans = tokenize(line, Some(js));
        assert_eq!(spans.first().unwrap().start, 0);
        assert_eq!(spans.last().unwrap().end, line.chars().count());
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(spans.iter().all(|s| !s.is_empty()));
    }
}
