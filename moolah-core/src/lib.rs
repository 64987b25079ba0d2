//! moolah-core: shared value types for the Moolah spending analyzer.

pub mod format;
pub mod insights;
pub mod transaction;

pub use format::format_dollar;
pub use insights::{Insight, InsightCategory, InsightRequest, InsightResponse};
pub use transaction::{DateRange, Transaction};
