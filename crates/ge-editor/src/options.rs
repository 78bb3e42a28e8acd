//! Per-session editor options.
//!
//! `read_only` and `line_numbers` come from the command line (`--ro`,
//! `--nl`). The rest can be set in the configuration file:
//!
//! ```json
//! "options": { "tab_size": 2, "auto_indent": false, "line_wrap": true }
//! ```
//!
//! | Name          | Type | Default |
//! |---------------|------|---------|
//! | `tab_size`    | int  | 4       |
//! | `auto_indent` | bool | true    |
//! | `line_numbers`| bool | true    |
//! | `line_wrap`   | bool | false   |

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Never set from configuration; only `--ro` turns it on.
    #[serde(skip)]
    pub read_only: bool,
    pub line_numbers: bool,
    pub line_wrap: bool,
    pub tab_size: usize,
    pub auto_indent: bool,
}

impl Options {
    /// Indent width, never zero.
    #[inline]
    #[must_use]
    pub fn indent_width(&self) -> usize {
        self.tab_size.max(1)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            read_only: false,
            line_numbers: true,
            line_wrap: false,
            tab_size: 4,
            auto_indent: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = Options::default();
        assert!(o.line_numbers);
        assert!(o.auto_indent);
        assert!(!o.read_only);
        assert!(!o.line_wrap);
        assert_eq!(o.tab_size, 4);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let o: Options = serde_json::from_str(r#"{"tab_size": 2}"#).unwrap();
        assert_eq!(o.tab_size, 2);
        assert!(o.auto_indent);
    }

    #[test]
    fn read_only_is_not_configurable() {
        let o: Options = serde_json::from_str(r#"{"read_only": true}"#).unwrap();
        assert!(!o.read_only);
    }

    #[test]
    fn zero_tab_size_still_indents() {
        let o = Options {
            tab_size: 0,
            ..Options::default()
        };
        assert_eq!(o.indent_width(), 1);
    }
}
