#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use arbitrary::Arbitrary;
use csvline::{Dialect, normalize, quote_field};

#[derive(Arbitrary, Debug)]
struct Input {
    separator: char,
    single_quote: bool,
    value: String,
}

fuzz_target!(|input: Input| {
    if matches!(input.separator, '"' | '\'' | '\\') {
        return;
    }
    let dialect = Dialect {
        separator: input.separator,
        single_quote: input.single_quote,
        ..Dialect::default()
    };
    let quoted = quote_field(&input.value, &dialect);
    assert_eq!(normalize(&quoted, &dialect), input.value, "quoted: {quoted:?}");
});
