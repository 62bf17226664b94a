mod common;

use std::cell::RefCell;

use common::{Person, age_parser, name_parser};
use csvparser::{CsvParser, Error, RowError};

#[test]
fn after_row_hook_sees_every_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut middle_aged = Vec::new();
    let input = b"\nname,age\nfrank,13\nrita, 40\nrobert, 25\nanabelle,70";
    let people = CsvParser::from_bytes(input)
        .add_column_parser("name", name_parser)
        .add_column_parser("age", age_parser)
        .with_hook(|p: &Person| {
            if p.school == "middle school" {
                middle_aged.push(p.clone());
            }
        })
        .parse()?;

    assert_eq!(
        people,
        vec![
            Person::new("frank", 13, "new school"),
            Person::new("rita", 40, "middle school"),
            Person::new("robert", 25, "middle school"),
            Person::new("anabelle", 70, "old school"),
        ]
    );
    assert_eq!(
        middle_aged,
        vec![
            Person::new("rita", 40, "middle school"),
            Person::new("robert", 25, "middle school"),
        ]
    );
    Ok(())
}

#[test]
fn after_row_hook_skips_failed_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut seen = Vec::new();
    let people = CsvParser::from_bytes(b"name,age\nfrank,13\nrita,170\nanabelle,70\n")
        .add_column_parser("name", name_parser)
        .add_column_parser("age", age_parser)
        .with_hook(|p: &Person| seen.push(p.name.clone()))
        .parse()?;
    assert_eq!(people.len(), 2);
    assert_eq!(seen, vec!["frank", "anabelle"]);
    Ok(())
}

#[test]
fn error_hook_gets_the_raw_row() -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = Vec::new();
    let people = CsvParser::from_bytes(b"name,age\nfrank,13\n rita , 170\nbob,x\n")
        .add_column_parser("name", name_parser)
        .add_column_parser("age", age_parser)
        .on_parse_error(|row, err| failures.push((row.to_vec(), err.to_string())))
        .parse()?;
    assert_eq!(people, vec![Person::new("frank", 13, "new school")]);
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].0, vec![" rita ", " 170"]);
    assert_eq!(failures[0].1, "impossible age");
    assert_eq!(failures[1].0, vec!["bob", "x"]);
    assert_eq!(failures[1].1, "invalid digit found in string");
    Ok(())
}

#[test]
fn error_hook_runs_before_termination() {
    let mut failures = Vec::new();
    let err = CsvParser::from_bytes(b"name,age\nrita,170\nfrank,13\n")
        .add_column_parser("name", name_parser)
        .add_column_parser("age", age_parser)
        .terminate_on_parsing_error()
        .on_parse_error(|row, err| {
            assert!(matches!(err, RowError::Column { header, .. } if header == "age"));
            failures.push(row.join(","));
        })
        .parse()
        .unwrap_err();
    assert!(matches!(err, Error::RowParse { row: 1, .. }));
    assert_eq!(failures, vec!["rita,170"]);
}

#[test]
fn lifecycle_hooks_bracket_the_decode() -> Result<(), Box<dyn std::error::Error>> {
    let events = RefCell::new(Vec::new());
    CsvParser::from_bytes(b"name,age\nfrank,13\nrita,170\n")
        .add_column_parser("name", |v: &str, p: &mut Person| {
            events.borrow_mut().push(format!("name:{v}"));
            name_parser(v, p)
        })
        .add_column_parser("age", age_parser)
        .on_start(|| events.borrow_mut().push("start".to_string()))
        .with_hook(|p: &Person| events.borrow_mut().push(format!("row:{}", p.name)))
        .on_parse_error(|row, _| events.borrow_mut().push(format!("error:{}", row[0])))
        .on_finish(|| events.borrow_mut().push("finish".to_string()))
        .parse()?;
    assert_eq!(
        events.into_inner(),
        vec!["start", "name:frank", "row:frank", "name:rita", "error:rita", "finish"]
    );
    Ok(())
}

#[test]
fn finish_fires_on_terminating_error() {
    let mut started = 0;
    let mut finished = 0;
    let result = CsvParser::from_bytes(b"name,age\nrita,170\n")
        .add_column_parser("name", name_parser)
        .add_column_parser("age", age_parser)
        .terminate_on_parsing_error()
        .on_start(|| started += 1)
        .on_finish(|| finished += 1)
        .parse();
    assert!(result.is_err());
    assert_eq!((started, finished), (1, 1));
}

#[test]
fn finish_fires_when_headers_fail() {
    let mut finished = 0;
    let result = CsvParser::from_bytes(b"name,age\n")
        .add_column_parser("name", name_parser)
        .on_finish(|| finished += 1)
        .parse();
    assert!(matches!(result, Err(Error::UnparsableHeader { .. })));
    assert_eq!(finished, 1);
}
