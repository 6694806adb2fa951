use crate::decode::matcher::{Class, Matcher};
use crate::decode::quote::is_unterminated;

/// Byte range of one raw field inside its logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    fn between(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end - start,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    InQuote(u8),
    EscapeNext(u8),
}

#[inline]
#[cfg(feature = "perf_memchr")]
fn find_quote_stop(b: &[u8], from: usize, quote: u8, m: &Matcher) -> Option<usize> {
    let hay = &b[from..];
    let rel = if m.backslash_escape() {
        memchr::memchr2(quote, b'\\', hay)
    } else {
        memchr::memchr(quote, hay)
    };
    rel.map(|r| from + r)
}

#[inline]
#[cfg(not(feature = "perf_memchr"))]
fn find_quote_stop(b: &[u8], from: usize, quote: u8, m: &Matcher) -> Option<usize> {
    b[from..]
        .iter()
        .position(|&c| c == quote || m.class(c) == Class::Backslash)
        .map(|r| from + r)
}

/// Split one logical line into raw field spans.
///
/// Quotes and escape markers stay inside the spans; see `quote::normalize`.
pub fn split(line: &str, m: &Matcher) -> Vec<Span> {
    let mut out = Vec::new();
    split_into(line, m, &mut out);
    out
}

pub fn split_into(line: &str, m: &Matcher, out: &mut Vec<Span>) {
    out.clear();
    let b = line.as_bytes();
    let mut state = State::FieldStart;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        match state {
            State::FieldStart | State::Unquoted => {
                let ch = b[i];
                match m.class(ch) {
                    Class::Separator => {
                        if let Some(width) = m.separator_at(b, i) {
                            push_field(line, m, out, Span::between(start, i));
                            i += width;
                            start = i;
                            state = State::FieldStart;
                            continue;
                        }
                        state = State::Unquoted;
                    }
                    Class::Quote if state == State::FieldStart => {
                        state = State::InQuote(ch);
                    }
                    _ => state = State::Unquoted,
                }
                i += 1;
            }
            State::InQuote(q) => match find_quote_stop(b, i, q, m) {
                Some(j) if b[j] == q => {
                    state = State::Unquoted;
                    i = j + 1;
                }
                Some(j) => {
                    state = State::EscapeNext(q);
                    i = j + 1;
                }
                None => i = b.len(),
            },
            State::EscapeNext(q) => {
                // a multi-byte char leaves continuation bytes, which never match quote or escape
                state = State::InQuote(q);
                i += 1;
            }
        }
    }
    push_field(line, m, out, Span::between(start, b.len()));
}

/// Append a field, folding it into the previous one while that one is still
/// an open quoted value.
fn push_field(line: &str, m: &Matcher, out: &mut Vec<Span>, span: Span) {
    if let Some(prev) = out.last_mut() {
        if is_unterminated(prev.slice(line), m) {
            *prev = Span::between(prev.start, span.end());
            return;
        }
    }
    out.push(span);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::matcher::MatcherKey;

    fn matcher(separator: char, single_quote: bool, backslash_escape: bool) -> Matcher {
        Matcher::new(MatcherKey {
            separator,
            single_quote,
            backslash_escape,
        })
    }

    fn fields<'a>(line: &'a str, m: &Matcher) -> Vec<&'a str> {
        split(line, m).iter().map(|s| s.slice(line)).collect()
    }

    #[test]
    fn plain_fields() {
        let m = matcher(',', false, false);
        assert_eq!(fields("a,b,c", &m), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_fields_at_edges_and_between() {
        let m = matcher(',', false, false);
        assert_eq!(fields(",a,,b,", &m), vec!["", "a", "", "b", ""]);
        assert_eq!(fields("", &m), vec![""]);
        assert_eq!(fields(",", &m), vec!["", ""]);
    }

    #[test]
    fn separator_inside_quotes_is_literal() {
        let m = matcher(';', false, false);
        assert_eq!(fields("\"x;y\";z2", &m), vec!["\"x;y\"", "z2"]);
    }

    #[test]
    fn quote_after_field_start_is_literal() {
        let m = matcher(',', false, false);
        assert_eq!(fields("a\"b,c", &m), vec!["a\"b", "c"]);
    }

    #[test]
    fn doubled_quotes_before_separator_stay_in_field() {
        let m = matcher(',', false, false);
        assert_eq!(fields("\"a\"\"b,c\",d", &m), vec!["\"a\"\"b,c\"", "d"]);
        assert_eq!(fields("\"\"\"\",x", &m), vec!["\"\"\"\"", "x"]);
    }

    #[test]
    fn empty_quoted_field() {
        let m = matcher(',', false, false);
        assert_eq!(fields("\"\",a", &m), vec!["\"\"", "a"]);
    }

    #[test]
    fn unclosed_quote_runs_to_end() {
        let m = matcher(',', false, false);
        assert_eq!(fields("a,\"b,c", &m), vec!["a", "\"b,c"]);
    }

    #[test]
    fn backslash_escaped_quote_does_not_close() {
        let m = matcher(',', false, true);
        assert_eq!(fields("\"a\\\",b\",c", &m), vec!["\"a\\\",b\"", "c"]);
        let plain = matcher(',', false, false);
        assert_eq!(fields("\"a\\\",b\",c", &plain), vec!["\"a\\\"", "b\"", "c"]);
    }

    #[test]
    fn single_quotes_only_when_enabled() {
        let on = matcher(',', true, false);
        assert_eq!(fields("'a,b',c", &on), vec!["'a,b'", "c"]);
        let off = matcher(',', false, false);
        assert_eq!(fields("'a,b',c", &off), vec!["'a", "b'", "c"]);
    }

    #[test]
    fn quote_styles_do_not_close_each_other() {
        let m = matcher(',', true, false);
        assert_eq!(fields("\"it's,ok\",'say \"hi\", bye'", &m), vec![
            "\"it's,ok\"",
            "'say \"hi\", bye'"
        ]);
    }

    #[test]
    fn multibyte_content_and_separator() {
        let m = matcher('§', false, false);
        assert_eq!(fields("é§\"ü§ß\"§", &m), vec!["é", "\"ü§ß\"", ""]);
    }

    #[test]
    fn plain_field_count_is_separator_count_plus_one() {
        let m = matcher('\t', false, false);
        for line in ["x", "x\ty", "\t\t", "abc\tdef\tghi\t"] {
            let expected = line.matches('\t').count() + 1;
            let got = fields(line, &m);
            assert_eq!(got.len(), expected, "{line:?}");
            assert_eq!(got, line.split('\t').collect::<Vec<_>>());
        }
    }
}
