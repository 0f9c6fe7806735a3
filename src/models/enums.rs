//! Enumeration types for constrained values.

use serde::{Deserialize, Serialize};

/// Direction of a money movement.
///
/// Amounts are always stored as positive values; the direction lives
/// here instead of in the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionType {
    /// Both directions, income first.
    pub const ALL: [Self; 2] = [Self::Income, Self::Expense];

    /// Returns the stored name (`INCOME` or `EXPENSE`).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl core::fmt::Display for TransactionType {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date window selected in a filtering view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateFilterMode {
    /// No date restriction.
    #[default]
    All,
    /// The current ISO week, Monday through Sunday.
    ThisWeek,
    /// The current calendar month.
    ThisMonth,
    /// A caller-supplied inclusive range.
    Custom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_serde_uses_stored_names() {
        let variants = [
            (TransactionType::Income, r#""INCOME""#),
            (TransactionType::Expense, r#""EXPENSE""#),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            let deserialized: TransactionType = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, variant);
        }
    }

    #[test]
    fn transaction_type_display_matches_serde() {
        assert_eq!(TransactionType::Income.to_string(), "INCOME");
        assert_eq!(TransactionType::Expense.to_string(), "EXPENSE");
    }

    #[test]
    fn date_filter_mode_defaults_to_all() {
        assert_eq!(DateFilterMode::default(), DateFilterMode::All);
    }

    #[test]
    fn date_filter_mode_serde() {
        let json = serde_json::to_string(&DateFilterMode::ThisWeek).unwrap();
        assert_eq!(json, r#""THIS_WEEK""#);
        let back: DateFilterMode = serde_json::from_str(r#""CUSTOM""#).unwrap();
        assert_eq!(back, DateFilterMode::Custom);
    }

    #[test]
    fn invalid_transaction_type_fails() {
        let result = serde_json::from_str::<TransactionType>(r#""transfer""#);
        assert!(result.is_err());
    }
}
