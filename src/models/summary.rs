//! Derived, non-persisted view models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Transaction;

/// Spending (or earning) grouped under one category string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    /// Category string exactly as stored on the transactions.
    pub category: String,
    /// Sum of the group's amounts.
    pub amount: Decimal,
    /// Share of the overall total, in `[0, 100]`.
    pub percentage: Decimal,
    /// Number of transactions in the group.
    pub count: usize,
}

/// Transactions that fall on the same local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateBucket {
    /// Local calendar day shared by every transaction in the bucket.
    pub day: NaiveDate,
    /// Display label: "Today", "Yesterday" or an absolute date.
    pub label: String,
    /// Bucket members in their original relative order.
    pub transactions: Vec<Transaction>,
}
