use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Field separator for a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Detect from the first eligible line: the first `;` or tab wins, `,` otherwise.
    #[default]
    Auto,
    Char(char),
}

impl From<char> for Separator {
    fn from(c: char) -> Self {
        Separator::Char(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// The first eligible line holds the column names and is not yielded as data.
    #[default]
    Present,
    /// Columns are named `Column1..ColumnN` and the first line is data.
    Absent,
}

/// What a lookup by an unknown header name returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingColumnPolicy {
    #[default]
    Error,
    Empty,
    Absent,
}

/// Equality used for header name lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderComparer {
    #[default]
    Ordinal,
    /// Unicode lower-case folding
    IgnoreCase,
    IgnoreAsciiCase,
}

impl HeaderComparer {
    /// Lookup key for `name`; two names are equal iff their keys are equal.
    pub fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            HeaderComparer::Ordinal => Cow::Borrowed(name),
            HeaderComparer::IgnoreCase => {
                if name.chars().any(char::is_uppercase) {
                    Cow::Owned(name.to_lowercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
            HeaderComparer::IgnoreAsciiCase => {
                if name.bytes().any(|b| b.is_ascii_uppercase()) {
                    Cow::Owned(name.to_ascii_lowercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
        }
    }
}

/// Predicate deciding whether a physical line is skipped before it can start a record.
///
/// Receives the raw line and its 1-based physical line index.
#[derive(Clone)]
pub struct SkipRow(Arc<dyn Fn(&str, usize) -> bool + Send + Sync>);

impl SkipRow {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, usize) -> bool + Send + Sync + 'static,
    {
        SkipRow(Arc::new(f))
    }

    pub fn matches(&self, line: &str, index: usize) -> bool {
        (self.0)(line, index)
    }
}

impl fmt::Debug for SkipRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SkipRow(..)")
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub separator: Separator,
    pub header_mode: HeaderMode,
    /// Number of leading physical lines ignored before anything else
    pub rows_to_skip: usize,
    pub skip_row: Option<SkipRow>,
    /// Trim whitespace around raw values before quote handling
    pub trim_data: bool,
    /// `\"` inside a quoted value is a literal quote
    pub allow_backslash_escape: bool,
    /// `'` may enclose a value the same way `"` does
    pub allow_single_quote_enclosure: bool,
    /// A quoted value left open at end of line continues on the next line
    pub allow_newline_in_quoted_field: bool,
    pub validate_column_count: bool,
    pub missing_column_policy: MissingColumnPolicy,
    /// Trim values returned by name lookups
    pub trim_result_on_access: bool,
    pub header_comparer: HeaderComparer,
    /// Groups of header names that resolve to the same column
    pub aliases: Vec<Vec<String>>,
    /// Joins continuation lines of a multiline value (default: `"\n"`)
    pub line_terminator: String,
}

impl Options {
    pub fn with_separator(mut self, separator: impl Into<Separator>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_skip_row<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize) -> bool + Send + Sync + 'static,
    {
        self.skip_row = Some(SkipRow::new(f));
        self
    }

    pub fn with_alias_group<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.push(group.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: Separator::Auto,
            header_mode: HeaderMode::Present,
            rows_to_skip: 0,
            skip_row: None,
            trim_data: false,
            allow_backslash_escape: false,
            allow_single_quote_enclosure: false,
            allow_newline_in_quoted_field: false,
            validate_column_count: false,
            missing_column_policy: MissingColumnPolicy::Error,
            trim_result_on_access: false,
            header_comparer: HeaderComparer::Ordinal,
            aliases: Vec::new(),
            line_terminator: String::from("\n"),
        }
    }
}
