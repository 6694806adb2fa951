#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use arbitrary::Arbitrary;
use csvline::{HeaderMode, MissingColumnPolicy, Options, Separator, read_from_str};

#[derive(Arbitrary, Debug)]
struct Input {
    separator: Option<char>,
    headerless: bool,
    rows_to_skip: u8,
    trim_data: bool,
    backslash_escape: bool,
    single_quote: bool,
    multiline: bool,
    validate: bool,
    aliases: Vec<Vec<String>>,
    text: String,
}

fuzz_target!(|input: Input| {
    let options = Options {
        separator: input.separator.map_or(Separator::Auto, Separator::Char),
        header_mode: if input.headerless { HeaderMode::Absent } else { HeaderMode::Present },
        rows_to_skip: usize::from(input.rows_to_skip % 4),
        trim_data: input.trim_data,
        allow_backslash_escape: input.backslash_escape,
        allow_single_quote_enclosure: input.single_quote,
        allow_newline_in_quoted_field: input.multiline,
        validate_column_count: input.validate,
        missing_column_policy: MissingColumnPolicy::Absent,
        aliases: input.aliases,
        ..Options::default()
    };
    let mut last_index = 0;
    for record in read_from_str(&input.text, options) {
        let Ok(record) = record else { break };
        assert!(record.index() > last_index);
        last_index = record.index();
        let _ = record.values();
        for name in record.headers() {
            let _ = record.get(name);
        }
    }
});
