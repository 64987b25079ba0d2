//! Derived-statistics output types.
//!
//! `Statistics` is the JSON contract consumed by the dashboard layer,
//! hence the camelCase field names on the wire.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use moolah_core::DateRange;
use serde::Serialize;

pub const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Weekday labels in day-of-week output order.
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// How many categories to keep before folding the rest into "Other".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakdownProfile {
    #[default]
    Default,
    Expanded,
}

impl BreakdownProfile {
    pub fn top_categories(&self) -> usize {
        match self {
            BreakdownProfile::Default => 4,
            BreakdownProfile::Expanded => 6,
        }
    }
}

/// One point of the monthly spending trend. `date` is the sortable
/// `YYYY-MM` bucket key; use [`month_label`] for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMerchant {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargestExpense {
    pub description: String,
    /// Absolute value of the single largest outflow.
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySpending {
    pub day: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringPayment {
    pub description: String,
    pub amount: f64,
    /// Month abbreviations the charge appeared in, calendar-ordered and
    /// deduplicated, e.g. "Jan, Feb, Mar".
    pub months: String,
}

/// Per-month category outflow totals for stacked charts. Serializes as
/// `{"date": "2024-01", "<category>": <amount>, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrendPoint {
    pub date: String,
    #[serde(flatten)]
    pub categories: BTreeMap<String, f64>,
}

/// Everything the presentation layer renders, recomputed from scratch on
/// each ingestion. An empty transaction list yields the default: zeros
/// and empty lists, never an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_spent: f64,
    pub total_income: f64,
    pub avg_monthly_spend: f64,
    pub avg_daily_spend: f64,
    pub date_range: Option<DateRange>,
    pub top_merchant: Option<TopMerchant>,
    pub largest_expense: Option<LargestExpense>,
    pub monthly_spending: Vec<MonthlyPoint>,
    pub category_breakdown: Vec<CategorySlice>,
    pub has_category_data: bool,
    pub category_trend: Vec<CategoryTrendPoint>,
    pub avg_spending_by_day_of_week: Vec<DaySpending>,
    pub recurring_payments: Vec<RecurringPayment>,
    pub month_over_month_change: f64,
    pub year_over_year_change: f64,
}

/// Display label for a `YYYY-MM` bucket key, e.g. "Jan 2024". Labels are
/// presentation-only; sorting always happens on the key.
pub fn month_label(key: &str) -> String {
    if let Some((year, month)) = key.split_once('-') {
        if let Ok(m) = month.parse::<usize>() {
            if (1..=12).contains(&m) {
                return format!("{} {}", MONTH_ABBREV[m - 1], year);
            }
        }
    }
    key.to_string()
}
