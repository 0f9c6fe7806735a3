//! Query engine: declarative filters and the lookups built on them.
//!
//! Every function here is pure over a slice of transactions. Results
//! that are lists come back ordered by `date` descending, with equal
//! dates ordered by ascending `id`.

use core::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DateFilterMode, Transaction, TransactionType};
use crate::period::{Calendar, DateRange};

/// Number of transactions shown in the "recent" list by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Composable filter for selecting transactions.
///
/// Use builder-style methods to chain criteria. All conditions are
/// combined: a transaction must satisfy every set criterion to pass.
///
/// # Examples
///
/// ```
/// use spendwise::models::TransactionType;
/// use spendwise::query::TransactionFilter;
///
/// let filter = TransactionFilter::new()
///     .kind(TransactionType::Expense)
///     .category("Food & Dining")
///     .search("lunch");
/// assert!(!filter.is_unrestricted());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Direction.
    pub kind: Option<TransactionType>,
    /// Category string (exact match).
    pub category: Option<String>,
    /// Inclusive date bounds.
    pub date_range: Option<DateRange>,
    /// Description or category substring (case-insensitive).
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Creates an empty filter that matches all transactions.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transaction.
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Transactions of one direction.
    #[inline]
    #[must_use]
    pub fn by_type(kind: TransactionType) -> Self {
        Self::new().kind(kind)
    }

    /// Transactions with exactly this category string.
    #[inline]
    #[must_use]
    pub fn by_category<C: Into<String>>(category: C) -> Self {
        Self::new().category(category)
    }

    /// Transactions dated within `range`.
    #[inline]
    #[must_use]
    pub fn by_date_range(range: DateRange) -> Self {
        Self::new().date_range(range)
    }

    /// Transactions of one direction dated within `range`.
    #[inline]
    #[must_use]
    pub fn by_type_and_date_range(kind: TransactionType, range: DateRange) -> Self {
        Self::new().kind(kind).date_range(range)
    }

    /// Transactions whose description or category contains `needle`.
    #[inline]
    #[must_use]
    pub fn by_search<T: Into<String>>(needle: T) -> Self {
        Self::new().search(needle)
    }

    /// Restricts to one direction.
    #[inline]
    #[must_use]
    pub const fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to an exact category string.
    #[inline]
    #[must_use]
    pub fn category<C: Into<String>>(mut self, category: C) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to an inclusive date range.
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Restricts to transactions whose description or category contains
    /// the given substring (case-insensitive). An empty needle matches
    /// everything.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, needle: T) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Returns `true` if no criterion is set.
    #[inline]
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.kind.is_none()
            && self.category.is_none()
            && self.date_range.is_none()
            && self.search.is_none()
    }

    /// Returns `true` if the transaction satisfies all set criteria.
    #[inline]
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_kind(tx)
            && self.matches_category(tx)
            && self.matches_date(tx)
            && self.matches_search(tx)
    }

    /// Checks direction criteria.
    fn matches_kind(&self, tx: &Transaction) -> bool {
        self.kind.is_none_or(|kind| tx.kind == kind)
    }

    /// Checks category criteria.
    fn matches_category(&self, tx: &Transaction) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| tx.category == *category)
    }

    /// Checks date range criteria.
    fn matches_date(&self, tx: &Transaction) -> bool {
        self.date_range.is_none_or(|range| range.contains(tx.date))
    }

    /// Checks search criteria.
    fn matches_search(&self, tx: &Transaction) -> bool {
        self.search.as_ref().is_none_or(|needle| {
            let needle_lower = needle.to_lowercase();
            tx.description.to_lowercase().contains(&needle_lower)
                || tx.category.to_lowercase().contains(&needle_lower)
        })
    }
}

/// Session filter state of a transaction list view.
///
/// Created with defaults when the view opens, mutated by user
/// interaction and discarded with the view.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Free-text search; blank means no search.
    pub search_query: String,
    /// Direction filter.
    pub kind: Option<TransactionType>,
    /// Category filter (exact match).
    pub category: Option<String>,
    /// Date window.
    pub date_filter_mode: DateFilterMode,
    /// Start of a custom window.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub custom_start: Option<DateTime<Utc>>,
    /// End of a custom window.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub custom_end: Option<DateTime<Utc>>,
}

impl FilterState {
    /// Returns `true` if any criterion differs from the defaults.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Resolves the state into a concrete filter against `calendar`.
    ///
    /// A blank search is ignored, and a custom window missing either
    /// bound does not restrict dates.
    #[inline]
    #[must_use]
    pub fn to_filter(&self, calendar: &Calendar) -> TransactionFilter {
        let date_range = match self.date_filter_mode {
            DateFilterMode::Custom => self
                .custom_start
                .zip(self.custom_end)
                .map(|(start, end)| DateRange::new(start, end)),
            mode @ (DateFilterMode::All | DateFilterMode::ThisWeek | DateFilterMode::ThisMonth) => {
                calendar.range_for(mode)
            }
        };
        let search = (!self.search_query.trim().is_empty()).then(|| self.search_query.clone());
        TransactionFilter {
            kind: self.kind,
            category: self.category.clone(),
            date_range,
            search,
        }
    }

    /// Selects the transactions this state lets through.
    #[inline]
    #[must_use]
    pub fn apply(&self, transactions: &[Transaction], calendar: &Calendar) -> Vec<Transaction> {
        select(transactions, &self.to_filter(calendar))
    }
}

/// Display ordering: newest `date` first, then ascending `id`.
#[inline]
#[must_use]
pub fn display_order(a: &Transaction, b: &Transaction) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id))
}

/// Sorts transactions into display order in place.
#[inline]
pub fn sort_for_display(transactions: &mut [Transaction]) {
    transactions.sort_by(display_order);
}

/// Returns the transactions matching `filter`, in display order.
#[inline]
#[must_use]
pub fn select(transactions: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    let mut selected: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect();
    sort_for_display(&mut selected);
    selected
}

/// Number of transactions matching `filter`.
#[inline]
#[must_use]
pub fn count(transactions: &[Transaction], filter: &TransactionFilter) -> usize {
    transactions.iter().filter(|tx| filter.matches(tx)).count()
}

/// Sums the amounts of all transactions in the slice.
///
/// Saturates at [`Decimal::MAX`] instead of overflowing.
#[inline]
#[must_use]
pub fn sum(transactions: &[Transaction]) -> Decimal {
    saturating_total(transactions.iter())
}

/// Saturating sum of `amount` over `transactions`.
fn saturating_total<'tx, I: Iterator<Item = &'tx Transaction>>(transactions: I) -> Decimal {
    transactions.fold(Decimal::ZERO, |total, tx| total.saturating_add(tx.amount))
}

/// Sum of `amount` over transactions of `kind` dated within `range`.
///
/// Returns zero when nothing matches and saturates at [`Decimal::MAX`].
#[inline]
#[must_use]
pub fn total_by_type_and_date_range(
    transactions: &[Transaction],
    kind: TransactionType,
    range: DateRange,
) -> Decimal {
    saturating_total(
        transactions
            .iter()
            .filter(|tx| tx.kind == kind && range.contains(tx.date)),
    )
}

/// The expense with the largest amount; the lowest `id` wins ties.
#[inline]
#[must_use]
pub fn highest_expense(transactions: &[Transaction]) -> Option<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.is_expense())
        .max_by(|a, b| a.amount.cmp(&b.amount).then_with(|| b.id.cmp(&a.id)))
        .cloned()
}

/// The category string used by the most transactions of `kind`.
///
/// Counts transactions, not amounts. Ties go to the lexicographically
/// smallest category.
#[inline]
#[must_use]
pub fn most_used_category(transactions: &[Transaction], kind: TransactionType) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        *counts.entry(tx.category.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(cat_a, count_a), (cat_b, count_b)| {
            count_a.cmp(count_b).then_with(|| cat_b.cmp(cat_a))
        })
        .map(|(category, _count)| category.to_owned())
}

/// The first `limit` transactions in display order.
#[inline]
#[must_use]
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut all = select(transactions, &TransactionFilter::all());
    all.truncate(limit);
    all
}
