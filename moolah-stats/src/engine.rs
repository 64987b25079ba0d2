//! Single-pass aggregation over the normalized transaction list.
//!
//! Determinism rules: transactions are consumed in input order, and the
//! "find the max" reductions (top merchant, largest expense) keep the
//! first-seen entry on an exact tie. Period buckets are keyed by
//! sortable `YYYY-MM` / `YYYY` strings, never by display labels.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use moolah_core::{DateRange, Transaction};

use crate::types::{
    BreakdownProfile, CategorySlice, CategoryTrendPoint, DaySpending, LargestExpense,
    MonthlyPoint, RecurringPayment, Statistics, TopMerchant, DAY_LABELS, MONTH_ABBREV,
};

/// Outflows must recur in at least this many distinct calendar months to
/// count as a recurring payment.
const RECURRING_MONTH_THRESHOLD: usize = 3;

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Aggregate with the default breakdown profile (top 4 categories).
pub fn aggregate(transactions: &[Transaction]) -> Statistics {
    aggregate_with(transactions, BreakdownProfile::Default)
}

/// Pure function of the transaction list: same input, bit-identical
/// output. An empty list yields zeroed statistics.
pub fn aggregate_with(transactions: &[Transaction], profile: BreakdownProfile) -> Statistics {
    let Some(date_range) = DateRange::of(transactions) else {
        return Statistics {
            avg_spending_by_day_of_week: zero_day_rows(),
            ..Statistics::default()
        };
    };

    let mut total_spent = 0.0;
    let mut total_income = 0.0;
    // (first-seen input index, running total) per key; the index is the
    // tie-break for the max reductions below.
    let mut merchant_totals: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut category_totals: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut monthly_outflow: BTreeMap<String, f64> = BTreeMap::new();
    let mut yearly_outflow: BTreeMap<i32, f64> = BTreeMap::new();
    let mut trend: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut day_totals = [(0.0_f64, 0_usize); 7];
    let mut recurring: HashMap<(&str, i64), BTreeSet<(i32, u32)>> = HashMap::new();
    let mut largest_expense: Option<LargestExpense> = None;

    for (index, t) in transactions.iter().enumerate() {
        let amount = t.amount.abs();
        if !t.is_outflow() {
            total_income += amount;
            continue;
        }

        total_spent += amount;

        let key = month_key(t.date);
        *monthly_outflow.entry(key.clone()).or_insert(0.0) += amount;
        *yearly_outflow.entry(t.date.year()).or_insert(0.0) += amount;

        merchant_totals
            .entry(t.description.as_str())
            .or_insert((index, 0.0))
            .1 += amount;

        if !t.category.is_empty() {
            category_totals
                .entry(t.category.as_str())
                .or_insert((index, 0.0))
                .1 += amount;
        }

        let trend_category = if t.category.is_empty() {
            "Uncategorized"
        } else {
            t.category.as_str()
        };
        *trend
            .entry(key)
            .or_default()
            .entry(trend_category.to_string())
            .or_insert(0.0) += amount;

        // Cent-exact amount match; two charges in the same month count
        // that month once.
        recurring
            .entry((t.description.as_str(), to_cents(amount)))
            .or_default()
            .insert((t.date.year(), t.date.month()));

        let strictly_larger = largest_expense
            .as_ref()
            .is_none_or(|current| amount > current.amount);
        if strictly_larger {
            largest_expense = Some(LargestExpense {
                description: t.description.clone(),
                amount,
                date: t.date,
            });
        }

        let day = t.date.weekday().num_days_from_sunday() as usize;
        day_totals[day].0 += amount;
        day_totals[day].1 += 1;
    }

    let top_merchant = merchant_totals
        .iter()
        .map(|(name, (first_seen, total))| (*first_seen, *name, *total))
        .fold(None::<(usize, &str, f64)>, |best, candidate| match best {
            None => Some(candidate),
            Some(best) => {
                if candidate.2 > best.2 || (candidate.2 == best.2 && candidate.0 < best.0) {
                    Some(candidate)
                } else {
                    Some(best)
                }
            }
        })
        .map(|(_, name, amount)| TopMerchant {
            name: name.to_string(),
            amount,
        });

    let has_category_data = !category_totals.is_empty();
    let category_breakdown = if has_category_data {
        let mut ranked: Vec<(usize, &str, f64)> = category_totals
            .iter()
            .map(|(name, (first_seen, total))| (*first_seen, *name, *total))
            .collect();
        ranked.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let keep = profile.top_categories();
        let mut slices: Vec<CategorySlice> = ranked
            .iter()
            .take(keep)
            .map(|(_, name, value)| CategorySlice {
                name: name.to_string(),
                value: *value,
            })
            .collect();
        let other: f64 = ranked.iter().skip(keep).map(|(_, _, value)| value).sum();
        if other > 0.0 {
            slices.push(CategorySlice {
                name: "Other".to_string(),
                value: other,
            });
        }
        slices
    } else {
        // Display fallback, not a data-quality signal.
        vec![CategorySlice {
            name: "Uncategorized".to_string(),
            value: total_spent,
        }]
    };

    let monthly_spending = monthly_outflow
        .iter()
        .map(|(date, amount)| MonthlyPoint {
            date: date.clone(),
            amount: *amount,
        })
        .collect();

    let category_trend = trend
        .into_iter()
        .map(|(date, categories)| CategoryTrendPoint { date, categories })
        .collect();

    let avg_spending_by_day_of_week = DAY_LABELS
        .iter()
        .zip(day_totals)
        .map(|(day, (total, count))| DaySpending {
            day: day.to_string(),
            amount: if count > 0 { total / count as f64 } else { 0.0 },
        })
        .collect();

    let mut recurring_ranked: Vec<(i64, RecurringPayment)> = recurring
        .into_iter()
        .filter(|(_, months)| months.len() >= RECURRING_MONTH_THRESHOLD)
        .map(|((description, cents), months)| {
            let month_numbers: BTreeSet<u32> = months.iter().map(|(_, m)| *m).collect();
            let labels: Vec<&str> = month_numbers
                .iter()
                .map(|m| MONTH_ABBREV[(*m - 1) as usize])
                .collect();
            (
                cents,
                RecurringPayment {
                    description: description.to_string(),
                    amount: cents as f64 / 100.0,
                    months: labels.join(", "),
                },
            )
        })
        .collect();
    recurring_ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.description.cmp(&b.1.description)));
    let recurring_payments = recurring_ranked.into_iter().map(|(_, p)| p).collect();

    Statistics {
        total_spent,
        total_income,
        avg_monthly_spend: total_spent / date_range.months() as f64,
        avg_daily_spend: total_spent / date_range.days() as f64,
        date_range: Some(date_range),
        top_merchant,
        largest_expense,
        monthly_spending,
        category_breakdown,
        has_category_data,
        category_trend,
        avg_spending_by_day_of_week,
        recurring_payments,
        month_over_month_change: trailing_delta(monthly_outflow.values()),
        year_over_year_change: trailing_delta(yearly_outflow.values()),
    }
}

fn zero_day_rows() -> Vec<DaySpending> {
    DAY_LABELS
        .iter()
        .map(|day| DaySpending {
            day: day.to_string(),
            amount: 0.0,
        })
        .collect()
}

/// Percentage change between the two most recent period buckets. Zero if
/// fewer than two buckets exist or the prior total is zero.
fn trailing_delta<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let values: Vec<f64> = values.copied().collect();
    if values.len() < 2 {
        return 0.0;
    }
    let current = values[values.len() - 1];
    let previous = values[values.len() - 2];
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}
