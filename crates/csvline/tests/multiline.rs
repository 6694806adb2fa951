use csvline::{HeaderMode, Options, read_lines};

fn multiline() -> Options {
    Options {
        allow_newline_in_quoted_field: true,
        ..Options::default().with_separator(',')
    }
}

#[test]
fn continuation_absorbs_several_lines() -> Result<(), Box<dyn std::error::Error>> {
    let lines = ["id,note", "1,\"first", "", "third\"", "2,plain"];
    let records: Vec<_> = read_lines(lines, multiline()).collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("note")?, Some("first\n\nthird"));
    assert_eq!(records[0].index(), 2);
    assert_eq!(records[0].raw(), "1,\"first\n\nthird\"");
    assert_eq!(records[1].get("id")?, Some("2"));
    assert_eq!(records[1].index(), 5);
    Ok(())
}

#[test]
fn separators_on_continuation_lines_stay_in_value() -> Result<(), Box<dyn std::error::Error>> {
    let lines = ["a,b,c", "\"x", "y,z\",2,3"];
    let records: Vec<_> = read_lines(lines, multiline()).collect::<Result<_, _>>()?;
    assert_eq!(records[0].values()?, vec!["x\ny,z", "2", "3"]);
    Ok(())
}

#[test]
fn unterminated_value_at_end_of_input_is_yielded() -> Result<(), Box<dyn std::error::Error>> {
    let lines = ["a,b", "1,\"never", "closed"];
    let records: Vec<_> = read_lines(lines, multiline()).collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].raw(), "1,\"never\nclosed");
    assert_eq!(records[0].get("b")?, Some("\"never\nclosed"));
    Ok(())
}

#[test]
fn disabled_multiline_keeps_lines_apart() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Options {
        header_mode: HeaderMode::Absent,
        ..Options::default().with_separator(',')
    };
    let records: Vec<_> = read_lines(["a,\"b", "c\",d"], opts).collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_index(1)?, "\"b");
    Ok(())
}

#[test]
fn custom_line_terminator_joins_continuations() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Options {
        line_terminator: "\r\n".to_string(),
        header_mode: HeaderMode::Absent,
        ..multiline()
    };
    let records: Vec<_> = read_lines(["\"a", "b\""], opts).collect::<Result<_, _>>()?;
    assert_eq!(records[0].get_index(0)?, "a\r\nb");
    Ok(())
}

#[test]
fn header_row_may_span_lines() -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<_> = read_lines(["\"first", "name\",age", "ann,3"], multiline()).collect::<Result<_, _>>()?;
    assert_eq!(records[0].headers(), ["first\nname", "age"]);
    assert_eq!(records[0].get("first\nname")?, Some("ann"));
    Ok(())
}

#[test]
fn escaped_quote_keeps_value_open() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Options {
        allow_backslash_escape: true,
        header_mode: HeaderMode::Absent,
        ..multiline()
    };
    let records: Vec<_> = read_lines(["\"a\\\"", "b\",c"], opts).collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].values()?, vec!["a\"\nb", "c"]);
    Ok(())
}
