//! Normalized transaction types (bank-agnostic).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized output of the ingestion pipeline. Immutable once built:
/// every derived statistic is recomputed from a fresh list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date, serialized as YYYY-MM-DD. No time component.
    pub date: NaiveDate,
    /// Non-empty, trimmed. Rows without a description are rejected upstream.
    pub description: String,
    /// Free text; empty string means the source had no category column.
    pub category: String,
    /// Negative = outflow/expense, positive = inflow/income.
    /// The sign is resolved during row parsing, not taken raw from the CSV.
    pub amount: f64,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }
}

/// Inclusive date span covered by a transaction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Min/max over all transaction dates; `None` for an empty set.
    pub fn of(transactions: &[Transaction]) -> Option<DateRange> {
        let start_date = transactions.iter().map(|t| t.date).min()?;
        let end_date = transactions.iter().map(|t| t.date).max()?;
        Some(DateRange { start_date, end_date })
    }

    /// Number of calendar days covered, never below 1.
    pub fn days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(1)
    }

    /// Number of calendar months touched, never below 1.
    pub fn months(&self) -> i64 {
        use chrono::Datelike;
        let span = (self.end_date.year() as i64 - self.start_date.year() as i64) * 12
            + (self.end_date.month() as i64 - self.start_date.month() as i64)
            + 1;
        span.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(date: &str, amount: f64) -> Transaction {
        Transaction {
            date: date.parse().unwrap(),
            description: "Test".to_string(),
            category: String::new(),
            amount,
        }
    }

    #[test]
    fn test_serializes_date_as_iso_string() {
        let t = txn("2024-01-15", -15.99);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["amount"], -15.99);
    }

    #[test]
    fn test_date_range_spans() {
        let txns = vec![txn("2024-01-15", -1.0), txn("2024-03-02", -1.0)];
        let range = DateRange::of(&txns).unwrap();
        assert_eq!(range.days(), 48);
        assert_eq!(range.months(), 3);
    }

    #[test]
    fn test_date_range_single_day_floors_at_one() {
        let txns = vec![txn("2024-01-15", -1.0)];
        let range = DateRange::of(&txns).unwrap();
        assert_eq!(range.days(), 1);
        assert_eq!(range.months(), 1);
    }

    #[test]
    fn test_date_range_empty() {
        assert_eq!(DateRange::of(&[]), None);
    }
}
