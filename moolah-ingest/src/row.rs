//! Per-row normalization: one raw CSV row plus a field mapping in, one
//! signed [`Transaction`] out, or a rejection reason.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use moolah_core::Transaction;
use regex::Regex;

use crate::dates::parse_date;
use crate::fields::FieldMapping;

/// One decoded CSV row, keyed by original header name.
pub type RawRow = HashMap<String, String>;

/// Why a row was rejected. Rejections are diagnostics, never errors:
/// the pipeline summarizes them and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    MissingDescription,
    BadDate(String),
    BadAmount(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::MissingDescription => write!(f, "empty description"),
            RowError::BadDate(raw) => write!(f, "unparsable date {raw:?}"),
            RowError::BadAmount(raw) => write!(f, "unparsable amount {raw:?}"),
        }
    }
}

/// Description keywords that mark an unsigned amount as likely income.
const INCOME_KEYWORDS: &[&str] = &["payment", "deposit", "credit", "refund", "transfer from"];

pub struct RowParser {
    currency_re: Regex,
}

impl RowParser {
    pub fn new() -> Result<RowParser> {
        // Dollar signs, thousands separators, and stray whitespace are the
        // only locale noise handled.
        let currency_re = Regex::new(r"[$,\s]")?;
        Ok(RowParser { currency_re })
    }

    /// Normalize one row. All failures become a [`RowError`]; this never
    /// panics on malformed input.
    pub fn parse_row(&self, row: &RawRow, mapping: &FieldMapping) -> Result<Transaction, RowError> {
        let description = row
            .get(&mapping.description_field)
            .map(|s| s.trim())
            .unwrap_or("");
        if description.is_empty() {
            return Err(RowError::MissingDescription);
        }

        let category = mapping
            .category_field
            .as_ref()
            .and_then(|f| row.get(f))
            .map(|s| s.trim())
            .unwrap_or("");

        let amount = if mapping.has_debit_credit_pair {
            self.resolve_pair(row, mapping)
        } else {
            self.resolve_single(row, mapping, description)?
        };

        let date_raw = row
            .get(&mapping.date_field)
            .map(|s| s.trim())
            .unwrap_or("");
        let date = parse_date(date_raw).ok_or_else(|| RowError::BadDate(date_raw.to_string()))?;

        Ok(Transaction {
            date,
            description: description.to_string(),
            category: category.to_string(),
            amount,
        })
    }

    /// Split debit/credit columns are already signed by position: a debit
    /// value is an outflow, a credit value an inflow, neither means zero.
    /// The sign cascade never applies here.
    fn resolve_pair(&self, row: &RawRow, mapping: &FieldMapping) -> f64 {
        let cell = |field: &Option<String>| {
            field
                .as_ref()
                .and_then(|f| row.get(f))
                .and_then(|raw| self.parse_money(raw))
                .unwrap_or(0.0)
        };

        let debit = cell(&mapping.debit_field);
        let credit = cell(&mapping.credit_field);

        if debit > 0.0 {
            -debit
        } else if credit > 0.0 {
            credit
        } else {
            0.0
        }
    }

    /// Single amount column: parse as-is, then run the sign cascade.
    ///
    /// 1. A transaction-type cell containing the debit indicator forces
    ///    negative; containing "credit"/"deposit" forces positive.
    /// 2. With no type column at all, fall back to description keywords:
    ///    income-like rows keep their sign, everything else positive
    ///    flips negative (expense-by-default). Best effort; banks that
    ///    label types `DR`/`CR` silently take this fallback too.
    fn resolve_single(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        description: &str,
    ) -> Result<f64, RowError> {
        let raw = mapping
            .amount_field
            .as_ref()
            .and_then(|f| row.get(f))
            .map(|s| s.trim())
            .unwrap_or("");
        // Papa-style leniency: a missing amount cell is zero, a present
        // but garbled one is a rejection.
        let mut amount = if raw.is_empty() {
            0.0
        } else {
            self.parse_money(raw)
                .ok_or_else(|| RowError::BadAmount(raw.to_string()))?
        };

        if let Some(type_field) = &mapping.transaction_type_field {
            let type_value = row
                .get(type_field)
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default();
            let indicator = mapping.debit_indicator.to_lowercase();
            if !indicator.is_empty() && type_value.contains(&indicator) {
                amount = -amount.abs();
            } else if type_value.contains("credit") || type_value.contains("deposit") {
                amount = amount.abs();
            }
        } else {
            let desc = description.to_lowercase();
            let likely_income = INCOME_KEYWORDS.iter().any(|kw| desc.contains(kw));
            if !likely_income && amount > 0.0 {
                amount = -amount;
            }
        }

        Ok(amount)
    }

    fn parse_money(&self, raw: &str) -> Option<f64> {
        let cleaned = self.currency_re.replace_all(raw, "");
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok()
    }
}
