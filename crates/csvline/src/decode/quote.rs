//! Quote parity, unquoting and quoting of raw field text.

use std::borrow::Cow;

use crate::decode::matcher::Matcher;
use crate::dialect::Dialect;

/// Whether `field` opens a quoted value whose closing quote has not been seen.
///
/// The field is open when it starts with a quote character and the run of
/// that character at its end (not counting the opening one) has even length.
/// With backslash escaping, a `\` right before the run escapes its first quote.
pub fn is_unterminated(field: &str, m: &Matcher) -> bool {
    let b = field.as_bytes();
    let Some((&open, rest)) = b.split_first() else {
        return false;
    };
    if !m.is_quote(open) {
        return false;
    }
    let run = rest.iter().rev().take_while(|&&c| c == open).count();
    let mut closing = run;
    if m.backslash_escape() && run > 0 && rest.len() > run && rest[rest.len() - run - 1] == b'\\' {
        closing -= 1;
    }
    closing % 2 == 0
}

/// Value of a raw field: trimmed if configured, enclosing quotes removed and
/// escaped quotes collapsed.
pub fn normalize<'a>(field: &'a str, dialect: &Dialect) -> Cow<'a, str> {
    let s = if dialect.trim { field.trim() } else { field };
    let b = s.as_bytes();
    if b.len() < 2 {
        return Cow::Borrowed(s);
    }
    let (first, last) = (b[0], b[b.len() - 1]);
    if first == b'"' && last == b'"' {
        let inner = &s[1..s.len() - 1];
        let mut value = Cow::Borrowed(inner);
        if inner.contains("\"\"") {
            value = Cow::Owned(inner.replace("\"\"", "\""));
        }
        if dialect.backslash_escape && value.contains("\\\"") {
            value = Cow::Owned(value.replace("\\\"", "\""));
        }
        return value;
    }
    if dialect.single_quote && first == b'\'' && last == b'\'' {
        return Cow::Borrowed(&s[1..s.len() - 1]);
    }
    Cow::Borrowed(s)
}

fn needs_quotes(value: &str, dialect: &Dialect) -> bool {
    if value.is_empty() {
        return false;
    }
    if dialect.trim && value.trim() != value {
        return true;
    }
    if dialect.single_quote && value.starts_with('\'') {
        return true;
    }
    value
        .chars()
        .any(|c| c == dialect.separator || c == '"' || c == '\r' || c == '\n')
}

/// Render `value` as a raw field that `normalize` maps back to `value`.
///
/// Quotes are doubled, never backslash-escaped, so with backslash escaping
/// enabled a value holding `\"` or ending in `\` does not survive the trip.
pub fn quote_field<'a>(value: &'a str, dialect: &Dialect) -> Cow<'a, str> {
    if !needs_quotes(value, dialect) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}
