#![no_main]
use csvparser::{BoxError, CsvParser};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Row {
    a: String,
    b: i64,
}

fn a(v: &str, r: &mut Row) -> Result<(), BoxError> {
    r.a = v.to_string();
    Ok(())
}

fn b(v: &str, r: &mut Row) -> Result<(), BoxError> {
    r.b = v.trim().parse()?;
    Ok(())
}

fn decode_with_headers(data: &[u8], terminate: bool) -> Option<Vec<(String, i64)>> {
    CsvParser::from_bytes_with_headers(data, ["a", "b"])
        .add_column_parser("a", a)
        .add_column_parser("b", b)
        .terminate_on_error(terminate)
        .parse()
        .ok()
        .map(|rows: Vec<Row>| rows.into_iter().map(|r| (r.a, r.b)).collect())
}

fuzz_target!(|data: &[u8]| {
    let mut after = 0usize;
    let result = CsvParser::from_bytes(data)
        .add_column_parser("a", a)
        .add_column_parser("b", b)
        .with_hook(|_: &Row| after += 1)
        .parse();
    if let Ok(rows) = result {
        assert_eq!(rows.len(), after);
        assert!(rows.iter().all(|r| r.a.len() <= data.len()));
    }

    // a strict decode that succeeds saw no failing row, so skipping changes nothing
    if let Some(strict) = decode_with_headers(data, true) {
        let lenient = decode_with_headers(data, false).expect("lenient decode after strict success");
        assert_eq!(strict, lenient);
    }
});
