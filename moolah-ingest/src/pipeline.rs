//! Multi-file ingestion driver.
//!
//! Each file is decoded independently: header row in, field mapping
//! derived once, every data row parsed on its own. Bad rows and bad
//! files are demoted to warnings; the only fatal condition is zero
//! usable transactions across the entire batch.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use moolah_core::Transaction;

use crate::fields::FieldSynonyms;
use crate::row::{RawRow, RowParser};

/// Result of ingesting a single file. Never an error; an unusable file
/// just carries warnings and no transactions.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Merged result across all files, in file/row order. The stable order
/// keeps first-seen tie-breaks in the aggregation deterministic.
#[derive(Debug)]
pub struct IngestOutcome {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Ingest a batch of CSV files. Partial success is success; an `Err` is
/// returned only when no file yielded any usable transaction, with the
/// accumulated per-file reasons in the message.
pub fn ingest_files<P: AsRef<Path>>(
    paths: &[P],
    synonyms: &FieldSynonyms,
) -> Result<IngestOutcome> {
    let parser = RowParser::new()?;
    let mut transactions = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let name = path.display().to_string();
        match File::open(path).with_context(|| format!("opening {}", path.display())) {
            Ok(file) => {
                let outcome = ingest_reader(&name, file, synonyms, &parser);
                transactions.extend(outcome.transactions);
                warnings.extend(outcome.warnings);
            }
            Err(e) => warnings.push(format!("could not read \"{name}\": {e:#}")),
        }
    }

    if transactions.is_empty() {
        bail!(
            "could not extract any valid transactions from the supplied file(s). {}",
            warnings.join(" ")
        );
    }

    Ok(IngestOutcome {
        transactions,
        warnings,
    })
}

/// Ingest one already-opened CSV stream. First row is the header; empty
/// lines are skipped; each data row is parsed independently so a single
/// bad row cannot sink the file.
pub fn ingest_reader<R: Read>(
    name: &str,
    reader: R,
    synonyms: &FieldSynonyms,
    parser: &RowParser,
) -> FileOutcome {
    let mut outcome = FileOutcome::default();

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(|s| s.trim().to_string()).collect(),
        Err(e) => {
            outcome.warnings.push(format!("csv error in \"{name}\": {e}"));
            return outcome;
        }
    };

    let Some(mapping) = synonyms.detect(&headers) else {
        outcome.warnings.push(format!(
            "could not identify required fields in \"{name}\": a date column, a description \
             column, and either an amount column or a debit/credit pair are required \
             (headers found: {})",
            headers.join(", ")
        ));
        return outcome;
    };

    let mut rejected: Vec<String> = Vec::new();
    let mut data_rows = 0usize;

    for (index, record) in rdr.records().enumerate() {
        let row_number = index + 1;
        match record {
            Ok(record) => {
                if record.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                data_rows += 1;
                let raw: RawRow = headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(|cell| cell.to_string()))
                    .collect();
                match parser.parse_row(&raw, &mapping) {
                    Ok(t) => outcome.transactions.push(t),
                    Err(e) => rejected.push(format!("row {row_number}: {e}")),
                }
            }
            // Structural decode error on one record; the rest of the file
            // is still attempted.
            Err(e) => {
                data_rows += 1;
                rejected.push(format!("row {row_number}: csv error: {e}"));
            }
        }
    }

    if !rejected.is_empty() {
        let shown = rejected.iter().take(5).cloned().collect::<Vec<_>>().join("; ");
        let summary = if rejected.len() <= 5 {
            format!("skipped {} row(s) in \"{name}\" ({shown})", rejected.len())
        } else {
            format!(
                "skipped {} row(s) in \"{name}\" (first 5: {shown} ...)",
                rejected.len()
            )
        };
        outcome.warnings.push(summary);
    }

    if data_rows == 0 {
        outcome
            .warnings
            .push(format!("\"{name}\" has no data rows"));
    } else if outcome.transactions.is_empty() {
        outcome
            .warnings
            .push(format!("no usable transactions in \"{name}\""));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(csv_text: &str) -> FileOutcome {
        let parser = RowParser::new().unwrap();
        ingest_reader(
            "test.csv",
            csv_text.as_bytes(),
            &FieldSynonyms::default(),
            &parser,
        )
    }

    #[test]
    fn test_single_file_happy_path() {
        let outcome = run(
            "Date,Description,Amount,Category\n\
             01/15/2024,Netflix,15.99,Entertainment\n\
             01/20/2024,Payroll Deposit,2000.00,Income\n",
        );
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.transactions[0].amount, -15.99);
        assert_eq!(outcome.transactions[1].amount, 2000.0);
    }

    #[test]
    fn test_bad_rows_skipped_not_fatal() {
        let outcome = run(
            "Date,Description,Amount\n\
             01/15/2024,Netflix,15.99\n\
             not-a-date,Rent,900\n\
             01/16/2024,,12.00\n\
             01/17/2024,Coffee,3.50\n",
        );
        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("skipped 2 row(s)"));
        assert!(outcome.warnings[0].contains("unparsable date"));
        assert!(outcome.warnings[0].contains("empty description"));
    }

    #[test]
    fn test_row_error_summary_truncates_after_five() {
        let mut csv_text = String::from("Date,Description,Amount\n");
        for i in 0..8 {
            csv_text.push_str(&format!("bad-date-{i},Shop,1.00\n"));
        }
        let outcome = run(&csv_text);
        assert!(outcome.transactions.is_empty());
        let summary = outcome
            .warnings
            .iter()
            .find(|w| w.contains("skipped 8 row(s)"))
            .unwrap();
        assert!(summary.contains("first 5"));
        assert!(summary.contains("row 5"));
        assert!(!summary.contains("row 6"));
    }

    #[test]
    fn test_unrecognized_headers_reject_file_with_header_list() {
        let outcome = run("Foo,Bar,Baz\n1,2,3\n");
        assert!(outcome.transactions.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("could not identify required fields"));
        assert!(outcome.warnings[0].contains("Foo, Bar, Baz"));
    }

    #[test]
    fn test_header_only_file_reported_empty() {
        let outcome = run("Date,Description,Amount\n");
        assert!(outcome.transactions.is_empty());
        assert!(outcome.warnings.iter().any(|w| w.contains("no data rows")));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let outcome = run(
            "Date,Description,Amount\n\
             01/15/2024,Netflix,15.99\n\
             ,,\n\
             01/17/2024,Coffee,3.50\n",
        );
        assert_eq!(outcome.transactions.len(), 2);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    }

    #[test]
    fn test_per_file_mappings_are_independent() {
        let parser = RowParser::new().unwrap();
        let synonyms = FieldSynonyms::default();
        let a = ingest_reader(
            "a.csv",
            "Date,Description,Amount\n01/15/2024,Netflix,15.99\n".as_bytes(),
            &synonyms,
            &parser,
        );
        let b = ingest_reader(
            "b.csv",
            "Transaction Date,Merchant,Debit,Credit\n02/10/2024,Electronics Store,$200.00,\n"
                .as_bytes(),
            &synonyms,
            &parser,
        );
        assert_eq!(a.transactions[0].amount, -15.99);
        assert_eq!(b.transactions[0].amount, -200.0);
    }

    #[test]
    fn test_batch_fails_when_all_files_unusable() {
        let err = ingest_files(
            &["/definitely/not/a/real/path.csv"],
            &FieldSynonyms::default(),
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("could not extract any valid transactions"));
        assert!(msg.contains("path.csv"));
    }
}
