//! Column-role detection for headerful bank CSVs.
//!
//! Matching is case-insensitive, trimmed, exact membership. Each synonym
//! list is a priority order: the first name present among the headers
//! wins for that role.

use serde::Serialize;

/// Ranked synonym lists for each column role, injectable so tests and
/// the config file can supply custom sets. `Default` carries the stock
/// lists observed across real bank exports.
#[derive(Debug, Clone)]
pub struct FieldSynonyms {
    pub date: Vec<String>,
    pub description: Vec<String>,
    /// Unified signed-amount columns only. Split debit/credit columns
    /// live in `debit` / `credit` below.
    pub amount: Vec<String>,
    pub category: Vec<String>,
    pub transaction_type: Vec<String>,
    pub debit: Vec<String>,
    pub credit: Vec<String>,
}

fn list(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldSynonyms {
    fn default() -> Self {
        FieldSynonyms {
            date: list(&[
                "date",
                "transaction date",
                "posting date",
                "trans date",
                "transaction_date",
                "txn_date",
                "post_date",
                "posted date",
                "statement date",
                "purchase date",
            ]),
            description: list(&[
                "description",
                "transaction description",
                "merchant",
                "payee",
                "details",
                "transaction_description",
                "desc",
                "name",
                "transaction",
                "memo",
                "notes",
                "reference",
                "vendor",
            ]),
            amount: list(&[
                "amount",
                "transaction amount",
                "payment amount",
                "transaction_amount",
                "txn_amount",
                "charge amount",
            ]),
            category: list(&[
                "category",
                "merchant category",
                "type",
                "category_name",
                "merchant_category",
                "transaction_category",
                "expense category",
                "spending category",
                "transaction type",
            ]),
            transaction_type: list(&[
                "transaction type",
                "type",
                "trans type",
                "transaction_type",
                "txn_type",
                "trans_type",
                "debit/credit",
                "entry type",
            ]),
            debit: list(&[
                "debit",
                "withdrawal",
                "withdrawals",
                "debit amount",
                "withdrawal amount",
                "payment",
                "charge",
                "charges",
                "expense",
            ]),
            credit: list(&[
                "credit",
                "deposit",
                "deposits",
                "credit amount",
                "deposit amount",
                "refund",
                "refunds",
                "inflow",
                "income",
            ]),
        }
    }
}

/// Per-file resolution of which raw columns supply each role. Computed
/// once from the header row; different files may map differently.
/// Field names keep the original header casing for row lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    pub date_field: String,
    pub description_field: String,
    /// Present iff `has_debit_credit_pair` is false.
    pub amount_field: Option<String>,
    pub category_field: Option<String>,
    pub transaction_type_field: Option<String>,
    pub debit_field: Option<String>,
    pub credit_field: Option<String>,
    pub has_debit_credit_pair: bool,
    /// Substring that marks a row as a debit in the transaction-type
    /// column. Case-folded on use.
    pub debit_indicator: String,
}

impl FieldSynonyms {
    /// Detect column roles for one file. `None` means the file cannot be
    /// processed at all: a date column, a description column, and an
    /// amount strategy are all mandatory.
    pub fn detect(&self, headers: &[String]) -> Option<FieldMapping> {
        // (lowercased, original) pairs; lookups are case-insensitive but
        // the mapping must return original casing.
        let folded: Vec<(String, &String)> = headers
            .iter()
            .map(|h| (h.trim().to_lowercase(), h))
            .collect();

        let find = |candidates: &[String]| -> Option<String> {
            for candidate in candidates {
                let wanted = candidate.trim().to_lowercase();
                if let Some((_, original)) = folded.iter().find(|(lower, _)| *lower == wanted) {
                    return Some((*original).clone());
                }
            }
            None
        };

        let date_field = find(&self.date)?;
        let description_field = find(&self.description)?;
        let mut amount_field = find(&self.amount);
        let category_field = find(&self.category);
        let transaction_type_field = find(&self.transaction_type);

        let debit_field = find(&self.debit);
        let credit_field = find(&self.credit);

        let mut has_debit_credit_pair = false;
        if amount_field.is_none() {
            match (&debit_field, &credit_field) {
                // Both halves present: amounts are split across two columns.
                (Some(_), Some(_)) => has_debit_credit_pair = true,
                // A lone debit-like or credit-like column still works as a
                // single amount source; the sign cascade sorts it out.
                (Some(d), None) => amount_field = Some(d.clone()),
                (None, Some(c)) => amount_field = Some(c.clone()),
                (None, None) => return None,
            }
        }

        Some(FieldMapping {
            date_field,
            description_field,
            amount_field: if has_debit_credit_pair { None } else { amount_field },
            category_field,
            transaction_type_field,
            debit_field,
            credit_field,
            has_debit_credit_pair,
            debit_indicator: "Debit".to_string(),
        })
    }
}

/// Best-effort guess at which bank produced a header set. Diagnostic
/// only; never gates processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    Amex,
    Chase,
    CapitalOne,
    BankStatement,
    General,
    Unknown,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Amex => "AMEX",
            SourceKind::Chase => "Chase",
            SourceKind::CapitalOne => "Capital One",
            SourceKind::BankStatement => "Bank Statement",
            SourceKind::General => "General",
            SourceKind::Unknown => "Unknown",
        }
    }
}

/// Classify a header set against known export layouts.
pub fn detect_source(headers: &[String]) -> SourceKind {
    let set: std::collections::HashSet<String> =
        headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let has = |name: &str| set.contains(name);

    if has("date") && has("description") && (has("amount") || has("debit")) {
        return SourceKind::Amex;
    }

    if has("transaction date") && has("description") && has("amount") {
        return SourceKind::Chase;
    }

    if (has("account number")
        && has("transaction description")
        && has("transaction date")
        && has("transaction amount"))
        || (has("transaction date")
            && has("transaction description")
            && has("debit")
            && has("credit"))
    {
        return SourceKind::CapitalOne;
    }

    if (has("posting date") && has("description") && (has("withdrawals") || has("deposits")))
        || (has("date") && has("payee") && (has("debit") || has("credit")))
    {
        return SourceKind::BankStatement;
    }

    let date_like = has("date") || has("transaction date") || has("posting date");
    let desc_like =
        has("description") || has("payee") || has("merchant") || has("transaction");
    let amount_like =
        has("amount") || has("debit") || has("credit") || has("transaction amount");
    if date_like && desc_like && amount_like {
        return SourceKind::General;
    }

    SourceKind::Unknown
}
