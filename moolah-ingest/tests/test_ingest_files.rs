use std::path::PathBuf;

use moolah_ingest::{ingest_files, FieldSynonyms};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[test]
fn test_merges_files_in_input_order() {
    let outcome = ingest_files(
        &[fixture("statement_amex.csv"), fixture("statement_capone.csv")],
        &FieldSynonyms::default(),
    )
    .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(outcome.transactions.len(), 5);

    // File order, then row order within each file.
    assert_eq!(outcome.transactions[0].description, "Netflix");
    assert_eq!(outcome.transactions[0].amount, -15.99);
    assert_eq!(outcome.transactions[3].description, "Electronics Store");
    assert_eq!(outcome.transactions[3].amount, -200.0);
    assert_eq!(outcome.transactions[4].description, "Employer Payroll");
    assert_eq!(outcome.transactions[4].amount, 1250.0);
}

#[test]
fn test_partial_success_is_not_an_error() {
    let outcome = ingest_files(
        &[fixture("unrecognized.csv"), fixture("statement_amex.csv")],
        &FieldSynonyms::default(),
    )
    .unwrap();

    assert_eq!(outcome.transactions.len(), 3);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("could not identify required fields"));
}

#[test]
fn test_all_files_unusable_is_batch_failure() {
    let err = ingest_files(&[fixture("unrecognized.csv")], &FieldSynonyms::default()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("could not extract any valid transactions"));
    assert!(msg.contains("Foo, Bar"));
}
