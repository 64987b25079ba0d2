//! moolah-stats: the aggregation engine.
//!
//! A pure batch transform from a normalized transaction list to the full
//! derived-statistics bundle the presentation layer renders. No state,
//! no persistence: every call recomputes from scratch.

pub mod engine;
pub mod types;

pub use engine::{aggregate, aggregate_with};
pub use types::{
    month_label, BreakdownProfile, CategorySlice, CategoryTrendPoint, DaySpending,
    LargestExpense, MonthlyPoint, RecurringPayment, Statistics, TopMerchant,
};
