//! Resolved quoting and separator rules for one parse run.

use crate::decode::matcher::MatcherKey;
use crate::options::{Options, Separator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub separator: char,
    pub single_quote: bool,
    pub backslash_escape: bool,
    pub multiline: bool,
    pub trim: bool,
    pub line_terminator: String,
}

impl Dialect {
    /// Resolve the options against the first eligible physical line.
    ///
    /// `Separator::Auto` is settled here, once; every later line of the run
    /// uses the same separator.
    pub fn resolve(options: &Options, sample: &str) -> Self {
        let separator = match options.separator {
            Separator::Char(c) => c,
            Separator::Auto => detect_separator(sample),
        };
        Self {
            separator,
            single_quote: options.allow_single_quote_enclosure,
            backslash_escape: options.allow_backslash_escape,
            multiline: options.allow_newline_in_quoted_field,
            trim: options.trim_data,
            line_terminator: options.line_terminator.clone(),
        }
    }

    pub fn matcher_key(&self) -> MatcherKey {
        MatcherKey {
            separator: self.separator,
            single_quote: self.single_quote,
            backslash_escape: self.backslash_escape,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            separator: ',',
            single_quote: false,
            backslash_escape: false,
            multiline: false,
            trim: false,
            line_terminator: String::from("\n"),
        }
    }
}

/// First `;` or tab in `sample`, `,` if neither occurs.
pub fn detect_separator(sample: &str) -> char {
    sample
        .bytes()
        .find(|&b| b == b';' || b == b'\t')
        .map(char::from)
        .unwrap_or(',')
}
