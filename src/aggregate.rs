//! Aggregation engine: scalar and grouped metrics over query results.
//!
//! Nothing here fails. Empty inputs produce zero or empty results, and
//! out-of-range inputs such as a non-positive budget limit are clamped.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    BUDGET_WARNING_THRESHOLD, BudgetStatus, CategorySpending, DateBucket, DateFilterMode,
    Transaction, TransactionType,
};
use crate::period::{Calendar, DateRange};
use crate::query;

/// Income minus expense. May be negative.
#[inline]
#[must_use]
pub fn balance(income: Decimal, expense: Decimal) -> Decimal {
    income.saturating_sub(expense)
}

/// Total of `kind` over the calendar month containing the reference time.
#[inline]
#[must_use]
pub fn monthly_total(
    transactions: &[Transaction],
    kind: TransactionType,
    calendar: &Calendar,
) -> Decimal {
    query::total_by_type_and_date_range(transactions, kind, calendar.this_month())
}

/// Share of the limit already spent, clamped to `[0, 1]`.
///
/// A limit of zero or below yields `0`. A ratio too large to represent
/// saturates at `1`.
#[must_use]
pub fn budget_progress(spent: Decimal, limit: Decimal) -> Decimal {
    if limit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    spent
        .checked_div(limit)
        .map_or(Decimal::ONE, |ratio| ratio.clamp(Decimal::ZERO, Decimal::ONE))
}

/// Spending strictly exceeds the limit.
#[inline]
#[must_use]
pub fn is_over_budget(spent: Decimal, limit: Decimal) -> bool {
    spent > limit
}

/// Spending reached the warning share of the limit.
///
/// Independent of [`is_over_budget`]: both hold once spending passes
/// the limit.
#[inline]
#[must_use]
pub fn is_approaching_budget(spent: Decimal, limit: Decimal) -> bool {
    limit
        .checked_mul(BUDGET_WARNING_THRESHOLD)
        .is_some_and(|threshold| spent >= threshold)
}

/// `limit - spent`, negative once over budget.
#[inline]
#[must_use]
pub fn remaining_budget(limit: Decimal, spent: Decimal) -> Decimal {
    limit.saturating_sub(spent)
}

/// All budget metrics for one spending figure.
#[inline]
#[must_use]
pub fn budget_status(limit: Decimal, spent: Decimal) -> BudgetStatus {
    BudgetStatus {
        limit,
        spent,
        remaining: remaining_budget(limit, spent),
        progress: budget_progress(spent, limit),
        over_budget: is_over_budget(spent, limit),
        approaching_budget: is_approaching_budget(spent, limit),
    }
}

/// Share of `total` taken by `amount`, in percent. Zero when `total` is zero.
#[must_use]
pub fn percentage(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Groups transactions by category string.
///
/// Groups are sorted by amount descending, then by category name.
/// Percentages are taken against `total`, which callers normally pass
/// as the sum of the same slice.
#[must_use]
pub fn category_breakdown(transactions: &[Transaction], total: Decimal) -> Vec<CategorySpending> {
    let mut groups: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for tx in transactions {
        let entry = groups.entry(tx.category.as_str()).or_default();
        entry.0 = entry.0.saturating_add(tx.amount);
        entry.1 += 1;
    }

    let mut breakdown: Vec<CategorySpending> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategorySpending {
            category: category.to_owned(),
            amount,
            percentage: percentage(amount, total),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// Category breakdown of `kind` within `range`, against its own total.
#[must_use]
pub fn category_breakdown_for(
    transactions: &[Transaction],
    kind: TransactionType,
    range: DateRange,
) -> Vec<CategorySpending> {
    let matching: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.kind == kind && range.contains(tx.date))
        .cloned()
        .collect();
    category_breakdown(&matching, query::sum(&matching))
}

/// Date window summarised by the statistics view.
///
/// `ThisWeek` selects the current week; every other mode falls back to
/// the current month.
#[inline]
#[must_use]
pub fn statistics_range(period: DateFilterMode, calendar: &Calendar) -> DateRange {
    match period {
        DateFilterMode::ThisWeek => calendar.this_week(),
        DateFilterMode::All | DateFilterMode::ThisMonth | DateFilterMode::Custom => {
            calendar.this_month()
        }
    }
}

/// Partitions transactions into local calendar days.
///
/// Buckets appear in the order their first member appears, and members
/// keep their relative order, so a date-descending input yields
/// newest-first buckets.
#[must_use]
pub fn group_by_day(transactions: &[Transaction], calendar: &Calendar) -> Vec<DateBucket> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut buckets: Vec<DateBucket> = Vec::new();
    for tx in transactions {
        let day = calendar.local_day(tx.date);
        let position = *index.entry(day).or_insert_with(|| {
            buckets.push(DateBucket {
                day,
                label: calendar.day_label(day),
                transactions: Vec::new(),
            });
            buckets.len() - 1
        });
        if let Some(bucket) = buckets.get_mut(position) {
            bucket.transactions.push(tx.clone());
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone as _, Utc};

    use super::*;
    use crate::models::TransactionId;

    fn ts(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn expense(id: i64, amount: i64, category: &str, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            amount: Decimal::from(amount),
            category: category.to_owned(),
            kind: TransactionType::Expense,
            description: String::new(),
            date,
            created_at: date,
        }
    }

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn balance_may_be_negative() {
        assert_eq!(balance(dec(100), dec(250)), dec(-150));
    }

    #[test]
    fn balance_saturates() {
        assert_eq!(balance(Decimal::MIN, Decimal::MAX), Decimal::MIN);
    }

    #[test]
    fn breakdown_group_saturates() {
        let date = ts(1000);
        let mut txs = vec![expense(1, 0, "Shopping", date), expense(2, 0, "Shopping", date)];
        for item in &mut txs {
            item.amount = Decimal::MAX;
        }
        let breakdown = category_breakdown(&txs, Decimal::MAX);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.first().map(|group| group.amount), Some(Decimal::MAX));
        assert_eq!(breakdown.first().map(|group| group.count), Some(2));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(budget_progress(dec(500), dec(1000)), Decimal::new(5, 1));
        assert_eq!(budget_progress(dec(5000), dec(1000)), Decimal::ONE);
        assert_eq!(budget_progress(dec(-5), dec(1000)), Decimal::ZERO);
    }

    #[test]
    fn progress_with_non_positive_limit_is_zero() {
        assert_eq!(budget_progress(dec(100), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(budget_progress(dec(100), dec(-10)), Decimal::ZERO);
    }

    #[test]
    fn progress_saturates_on_overflow() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(budget_progress(Decimal::MAX, tiny), Decimal::ONE);
    }

    #[test]
    fn budget_flags_below_threshold() {
        let status = budget_status(dec(1000), dec(850));
        assert!(status.approaching_budget);
        assert!(!status.over_budget);
        assert_eq!(status.remaining, dec(150));
        assert_eq!(status.progress, Decimal::new(85, 2));
    }

    #[test]
    fn budget_flags_over_limit_are_both_set() {
        let status = budget_status(dec(1000), dec(1050));
        assert!(status.approaching_budget);
        assert!(status.over_budget);
        assert_eq!(status.remaining, dec(-50));
        assert_eq!(status.progress, Decimal::ONE);
    }

    #[test]
    fn approaching_starts_at_threshold() {
        assert!(is_approaching_budget(dec(800), dec(1000)));
        assert!(!is_approaching_budget(dec(799), dec(1000)));
        assert!(!is_over_budget(dec(1000), dec(1000)));
    }

    #[test]
    fn breakdown_groups_and_computes_percentages() {
        let txs = vec![
            expense(1, 100, "Food", ts(1)),
            expense(2, 150, "Food", ts(2)),
            expense(3, 150, "Transport", ts(3)),
        ];
        let breakdown = category_breakdown(&txs, dec(400));
        assert_eq!(breakdown.len(), 2);
        let food = &breakdown[0];
        assert_eq!(food.category, "Food");
        assert_eq!(food.amount, dec(250));
        assert_eq!(food.percentage, Decimal::new(625, 1));
        assert_eq!(food.count, 2);
        assert_eq!(breakdown[1].percentage, Decimal::new(375, 1));
    }

    #[test]
    fn breakdown_percentages_sum_to_hundred() {
        let txs = vec![
            expense(1, 1, "A", ts(1)),
            expense(2, 1, "B", ts(2)),
            expense(3, 1, "C", ts(3)),
        ];
        let total: Decimal = category_breakdown(&txs, dec(3))
            .iter()
            .map(|group| group.percentage)
            .sum();
        assert!((total - Decimal::ONE_HUNDRED).abs() < Decimal::new(1, 6));
    }

    #[test]
    fn breakdown_ties_sort_by_name() {
        let txs = vec![expense(1, 10, "Zoo", ts(1)), expense(2, 10, "Art", ts(2))];
        let names: Vec<String> = category_breakdown(&txs, dec(20))
            .into_iter()
            .map(|group| group.category)
            .collect();
        assert_eq!(names, vec!["Art".to_owned(), "Zoo".to_owned()]);
    }

    #[test]
    fn breakdown_with_zero_total_has_zero_percentages() {
        let txs = vec![expense(1, 10, "Food", ts(1))];
        let breakdown = category_breakdown(&txs, Decimal::ZERO);
        assert_eq!(breakdown[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn breakdown_keeps_unknown_categories() {
        let txs = vec![expense(1, 10, "Not In Catalog", ts(1))];
        assert_eq!(category_breakdown(&txs, dec(10))[0].category, "Not In Catalog");
    }

    #[test]
    fn breakdown_for_kind_and_range() {
        let mut txs = vec![
            expense(1, 100, "Food", ts(1000)),
            expense(2, 300, "Rent", ts(9000)),
        ];
        txs.push(Transaction {
            kind: TransactionType::Income,
            ..expense(3, 900, "Salary", ts(1500))
        });
        let breakdown =
            category_breakdown_for(&txs, TransactionType::Expense, DateRange::new(ts(0), ts(2000)));
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn statistics_range_falls_back_to_month() {
        let calendar = Calendar::utc(Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap());
        assert_eq!(
            statistics_range(DateFilterMode::ThisWeek, &calendar),
            calendar.this_week()
        );
        assert_eq!(
            statistics_range(DateFilterMode::Custom, &calendar),
            calendar.this_month()
        );
        assert_eq!(
            statistics_range(DateFilterMode::All, &calendar),
            calendar.this_month()
        );
    }

    #[test]
    fn group_by_day_preserves_order() {
        let calendar = Calendar::utc(Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap());
        let today = Utc.with_ymd_and_hms(2024, 3, 13, 9, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 3, 12, 22, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        let txs = vec![
            expense(1, 1, "A", today),
            expense(2, 1, "B", yesterday),
            expense(3, 1, "C", today),
            expense(4, 1, "D", older),
        ];
        let buckets = group_by_day(&txs, &calendar);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "Mar 05, 2024"]);
        let first: Vec<i64> = buckets[0]
            .transactions
            .iter()
            .map(|t| t.id.into_inner())
            .collect();
        assert_eq!(first, vec![1, 3]);
    }

    #[test]
    fn monthly_total_uses_calendar_month() {
        let calendar = Calendar::utc(Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap());
        let txs = vec![
            expense(1, 100, "A", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            expense(2, 100, "B", Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()),
        ];
        assert_eq!(
            monthly_total(&txs, TransactionType::Expense, &calendar),
            dec(100)
        );
    }
}
