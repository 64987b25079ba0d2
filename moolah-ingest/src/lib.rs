//! moolah-ingest: schema-free ingestion of bank CSV exports.
//!
//! Banks agree on nothing: column names, date formats, and the sign
//! convention for debits all vary per export. This crate detects which
//! columns play which role, normalizes dates and amounts, and produces
//! the bank-agnostic [`moolah_core::Transaction`] stream the aggregation
//! engine consumes.

pub mod dates;
pub mod fields;
pub mod pipeline;
pub mod row;

pub use dates::parse_date;
pub use fields::{detect_source, FieldMapping, FieldSynonyms, SourceKind};
pub use pipeline::{ingest_files, ingest_reader, FileOutcome, IngestOutcome};
pub use row::{RawRow, RowError, RowParser};
