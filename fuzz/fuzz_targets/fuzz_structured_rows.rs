#![no_main]
use arbitrary::Arbitrary;
use csvparser::{BoxError, CsvParser, Error};
use libfuzzer_sys::fuzz_target;

const HEADERS: [&str; 3] = ["x", "y", "z"];

#[derive(Arbitrary, Debug)]
struct Input {
    rows: Vec<Vec<String>>,
    terminate: bool,
}

#[derive(Default, Debug)]
struct Cells(Vec<String>);

fn push(v: &str, c: &mut Cells) -> Result<(), BoxError> {
    if v.contains('!') {
        return Err("bang".into());
    }
    c.0.push(v.to_string());
    Ok(())
}

fuzz_target!(|input: Input| {
    let total = input.rows.len();
    let good = input
        .rows
        .iter()
        .filter(|r| r.len() == HEADERS.len() && !r.iter().any(|c| c.contains('!')))
        .count();

    let mut after = 0usize;
    let mut errors = 0usize;
    let result = CsvParser::with_headers(input.rows.into_iter(), HEADERS)
        .add_column_parser("x", push)
        .add_column_parser("y", push)
        .add_column_parser("z", push)
        .terminate_on_error(input.terminate)
        .with_hook(|_: &Cells| after += 1)
        .on_parse_error(|_, _| errors += 1)
        .parse();

    match result {
        Ok(records) => {
            assert_eq!(records.len(), good);
            assert_eq!(after, good);
            assert_eq!(errors, total - good);
            assert!(records.iter().all(|c| c.0.len() == HEADERS.len()));
        }
        Err(Error::RowParse { row, .. }) => {
            assert!(input.terminate);
            assert_eq!(errors, 1);
            assert!(row >= 1 && row <= total);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
});
