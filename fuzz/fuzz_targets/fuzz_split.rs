#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use arbitrary::Arbitrary;
use csvline::{Matcher, MatcherKey, is_unterminated, split};

#[derive(Arbitrary, Debug)]
struct Input {
    separator: char,
    single_quote: bool,
    backslash_escape: bool,
    line: String,
}

fuzz_target!(|input: Input| {
    if matches!(input.separator, '"' | '\'' | '\\') {
        return;
    }
    let m = Matcher::new(MatcherKey {
        separator: input.separator,
        single_quote: input.single_quote,
        backslash_escape: input.backslash_escape,
    });
    let line = input.line.as_str();
    let spans = split(line, &m);
    assert!(!spans.is_empty());

    // spans tile the line, one separator between neighbours
    let sep_len = input.separator.len_utf8();
    assert_eq!(spans[0].start, 0);
    for pair in spans.windows(2) {
        assert_eq!(pair[1].start, pair[0].end() + sep_len, "line: {line:?}");
        assert_eq!(&line[pair[0].end()..pair[1].start], input.separator.to_string());
    }
    assert_eq!(spans[spans.len() - 1].end(), line.len());

    for span in &spans[..spans.len() - 1] {
        assert!(!is_unterminated(span.slice(line), &m), "line: {line:?}");
    }
});
