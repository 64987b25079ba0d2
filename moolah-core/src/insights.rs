//! Payload types for the external AI-insight consumer.
//!
//! The core hands the consumer the full transaction list plus the computed
//! date range and expects a list of structured insights back. Nothing here
//! interprets the content; these types only pin down the JSON shape at
//! the boundary.

use serde::{Deserialize, Serialize};

use crate::transaction::{DateRange, Transaction};

/// Request body handed to the insight consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRequest {
    pub transactions: Vec<Transaction>,
    pub date_range: DateRange,
}

impl InsightRequest {
    /// Build a request from a transaction list. `None` if the list is
    /// empty (the consumer rejects empty submissions anyway).
    pub fn from_transactions(transactions: &[Transaction]) -> Option<InsightRequest> {
        let date_range = DateRange::of(transactions)?;
        Some(InsightRequest {
            transactions: transactions.to_vec(),
            date_range,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCategory {
    #[serde(rename = "spending_pattern")]
    SpendingPattern,
    #[serde(rename = "savings_opportunity")]
    SavingsOpportunity,
    #[serde(rename = "risk_alert")]
    RiskAlert,
    #[serde(rename = "behavioral_pattern")]
    BehavioralPattern,
    #[serde(rename = "optimization")]
    Optimization,
}

/// One insight record as returned by the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub category: InsightCategory,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_includes_date_range() {
        let txns = vec![
            Transaction {
                date: "2024-01-15".parse().unwrap(),
                description: "Netflix".to_string(),
                category: String::new(),
                amount: -15.99,
            },
            Transaction {
                date: "2024-02-20".parse().unwrap(),
                description: "Grocery Store".to_string(),
                category: String::new(),
                amount: -82.13,
            },
        ];

        let req = InsightRequest::from_transactions(&txns).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["date_range"]["start_date"], "2024-01-15");
        assert_eq!(json["date_range"]["end_date"], "2024-02-20");
        assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_transactions_yield_no_request() {
        assert!(InsightRequest::from_transactions(&[]).is_none());
    }

    #[test]
    fn test_insight_response_shape() {
        let raw = r#"{
            "insights": [{
                "title": "Subscription creep",
                "category": "savings_opportunity",
                "description": "Three streaming services bill every month.",
                "recommendation": "Cancel the ones you have not used in 30 days."
            }]
        }"#;

        let parsed: InsightResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.insights.len(), 1);
        assert_eq!(
            parsed.insights[0].category,
            InsightCategory::SavingsOpportunity
        );
    }
}
