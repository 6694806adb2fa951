use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use assert_cmd::Command;
use tempfile::NamedTempFile;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("csvline"))
}

#[test]
fn help_works() -> Result<(), Box<dyn std::error::Error>> {
    bin().arg("--help").assert().success().stdout(predicate::str::contains("--multiline"));
    Ok(())
}

#[test]
fn prints_one_object_per_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut tmp = NamedTempFile::new()?;
    write!(tmp, "id;name\n1;\"Smith; John\"\n2;Doe\n")?;

    let output = bin().arg(tmp.path()).output()?;
    assert!(output.status.success());
    let out = String::from_utf8(output.stdout)?;
    let rows: Vec<serde_json::Value> = out.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    assert_eq!(
        rows,
        vec![
            serde_json::json!({"id": "1", "name": "Smith; John"}),
            serde_json::json!({"id": "2", "name": "Doe"}),
        ]
    );
    Ok(())
}

#[test]
fn array_output_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let output = bin()
        .args(["--array", "--multiline", "--separator", ","])
        .write_stdin("a,b\n\"one\ntwo\",3\n")
        .output()?;
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(v, serde_json::json!([{"a": "one\ntwo", "b": "3"}]));
    Ok(())
}

#[test]
fn headerless_input_gets_synthesized_columns() -> Result<(), Box<dyn std::error::Error>> {
    let output = bin().args(["--no-header", "--separator", "tab"]).write_stdin("x\ty\n").output()?;
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(v, serde_json::json!({"Column1": "x", "Column2": "y"}));
    Ok(())
}

#[test]
fn comment_lines_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let output = bin()
        .args(["--comment", "#"])
        .write_stdin("# exported\nid,full_name\n# note\n7,Ann\n")
        .output()?;
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(v, serde_json::json!({"id": "7", "full_name": "Ann"}));
    Ok(())
}

#[test]
fn ambiguous_alias_group_fails() -> Result<(), Box<dyn std::error::Error>> {
    bin()
        .args(["--alias", "id;key"])
        .write_stdin("id,key\n1,2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("alias group: id;key"));
    Ok(())
}

#[test]
fn duplicate_header_fails() -> Result<(), Box<dyn std::error::Error>> {
    bin()
        .write_stdin("a,a,b\n1,2,3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate"));
    Ok(())
}

#[test]
fn rejects_multi_character_separator() -> Result<(), Box<dyn std::error::Error>> {
    bin().args(["--separator", ";;"]).write_stdin("a\n").assert().failure();
    Ok(())
}
