//! Monthly budget model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly expense ceiling used when none has been set.
pub const DEFAULT_BUDGET_LIMIT: Decimal = Decimal::from_parts(500_000, 0, 0, false, 0);

/// Fraction of the limit at which spending counts as approaching it.
pub const BUDGET_WARNING_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// A session-scoped monthly expense ceiling.
///
/// The limit is never persisted and resets to [`DEFAULT_BUDGET_LIMIT`]
/// on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Budget {
    /// Monthly expense ceiling. Zero or negative values are accepted and
    /// treated as "no meaningful limit" by the progress calculation.
    pub limit: Decimal,
}

impl Budget {
    /// Creates a budget with the given limit.
    #[inline]
    #[must_use]
    pub const fn new(limit: Decimal) -> Self {
        Self { limit }
    }
}

impl Default for Budget {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_LIMIT)
    }
}

/// Budget metrics for the current month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// The limit in effect.
    pub limit: Decimal,
    /// Expense total for the month.
    pub spent: Decimal,
    /// `limit - spent`, negative once over budget.
    pub remaining: Decimal,
    /// `spent / limit` clamped to `[0, 1]`.
    pub progress: Decimal,
    /// Spending strictly exceeds the limit.
    pub over_budget: bool,
    /// Spending reached the warning threshold.
    pub approaching_budget: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_five_hundred_thousand() {
        assert_eq!(Budget::default().limit, Decimal::from(500_000));
    }

    #[test]
    fn warning_threshold_is_eighty_percent() {
        assert_eq!(BUDGET_WARNING_THRESHOLD, Decimal::new(8, 1));
    }

    #[test]
    fn budget_status_serializes_camel_case() {
        let status = BudgetStatus {
            limit: Decimal::from(1000),
            spent: Decimal::from(850),
            remaining: Decimal::from(150),
            progress: Decimal::new(85, 2),
            over_budget: false,
            approaching_budget: true,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"overBudget\":false"));
        assert!(json.contains("\"approachingBudget\":true"));
    }
}
