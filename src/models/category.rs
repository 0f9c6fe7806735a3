//! Static category catalog.
//!
//! The catalog is closed and process-wide. Transactions store the
//! category as a plain string, so lookups here never fail: names that
//! are not in the catalog resolve to [`Category::OtherExpense`].

use serde::{Deserialize, Serialize};

use super::TransactionType;

/// A catalog entry: a named classification with a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Restaurants and groceries.
    #[serde(rename = "Food & Dining")]
    Food,
    /// Fuel, fares and parking.
    #[serde(rename = "Transportation")]
    Transport,
    /// General purchases.
    #[serde(rename = "Shopping")]
    Shopping,
    /// Rent and utilities.
    #[serde(rename = "Bills & Utilities")]
    Bills,
    /// Leisure spending.
    #[serde(rename = "Entertainment")]
    Entertainment,
    /// Medical costs.
    #[serde(rename = "Healthcare")]
    Healthcare,
    /// Tuition and courses.
    #[serde(rename = "Education")]
    Education,
    /// Catch-all expense entry.
    #[serde(rename = "Other Expenses")]
    OtherExpense,
    /// Employment income.
    #[serde(rename = "Salary")]
    Salary,
    /// Contract work.
    #[serde(rename = "Freelance")]
    Freelance,
    /// Business revenue.
    #[serde(rename = "Business")]
    Business,
    /// Dividends and gains.
    #[serde(rename = "Investments")]
    Investments,
    /// Catch-all income entry.
    #[serde(rename = "Other Income")]
    OtherIncome,
}

impl Category {
    /// Every catalog entry, expenses first.
    pub const ALL: [Self; 13] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Bills,
        Self::Entertainment,
        Self::Healthcare,
        Self::Education,
        Self::OtherExpense,
        Self::Salary,
        Self::Freelance,
        Self::Business,
        Self::Investments,
        Self::OtherIncome,
    ];

    /// Display name, unique across the catalog.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transportation",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills & Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::OtherExpense => "Other Expenses",
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Business => "Business",
            Self::Investments => "Investments",
            Self::OtherIncome => "Other Income",
        }
    }

    /// Direction the entry is offered for.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> TransactionType {
        match self {
            Self::Food
            | Self::Transport
            | Self::Shopping
            | Self::Bills
            | Self::Entertainment
            | Self::Healthcare
            | Self::Education
            | Self::OtherExpense => TransactionType::Expense,
            Self::Salary
            | Self::Freelance
            | Self::Business
            | Self::Investments
            | Self::OtherIncome => TransactionType::Income,
        }
    }

    /// Entries offered for the given direction, in catalog order.
    #[inline]
    pub fn for_kind(kind: TransactionType) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |cat| cat.kind() == kind)
    }

    /// Expense entries.
    #[inline]
    #[must_use]
    pub fn expense() -> Vec<Self> {
        Self::for_kind(TransactionType::Expense).collect()
    }

    /// Income entries.
    #[inline]
    #[must_use]
    pub fn income() -> Vec<Self> {
        Self::for_kind(TransactionType::Income).collect()
    }

    /// Exact, case-sensitive lookup by display name.
    #[inline]
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cat| cat.name() == name)
    }

    /// Resolves a stored category string for display. Unknown names map
    /// to [`Category::OtherExpense`].
    #[inline]
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::lookup(name).unwrap_or(Self::OtherExpense)
    }

    /// The catch-all entry for a direction.
    #[inline]
    #[must_use]
    pub const fn default_for(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => Self::OtherIncome,
            TransactionType::Expense => Self::OtherExpense,
        }
    }
}

impl core::fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn expense_catalog_has_eight_entries() {
        let categories = Category::expense();
        assert_eq!(categories.len(), 8);
        assert!(categories.iter().all(|c| c.kind() == TransactionType::Expense));
    }

    #[test]
    fn income_catalog_has_five_entries() {
        let categories = Category::income();
        assert_eq!(categories.len(), 5);
        assert!(categories.iter().all(|c| c.kind() == TransactionType::Income));
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn lookup_known_names() {
        assert_eq!(Category::lookup("Food & Dining"), Some(Category::Food));
        assert_eq!(Category::lookup("Salary"), Some(Category::Salary));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Category::lookup("food & dining"), None);
        assert_eq!(Category::resolve("food & dining"), Category::OtherExpense);
    }

    #[test]
    fn resolve_unknown_falls_back_to_other_expense() {
        assert_eq!(Category::resolve("Pets"), Category::OtherExpense);
        assert_eq!(Category::resolve(""), Category::OtherExpense);
    }

    #[test]
    fn default_for_each_direction() {
        assert_eq!(
            Category::default_for(TransactionType::Income),
            Category::OtherIncome
        );
        assert_eq!(
            Category::default_for(TransactionType::Expense),
            Category::OtherExpense
        );
    }

    #[test]
    fn serde_uses_display_names() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }
}
