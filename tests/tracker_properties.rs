//! End-to-end behavior of the blocking tracker over an in-memory store.
#![cfg(feature = "blocking")]

use chrono::{DateTime, TimeZone as _, Utc};
use rust_decimal::Decimal;
use spendwise::models::{NewTransaction, TransactionPatch, TransactionType};
use spendwise::period::{Calendar, DateRange};
use spendwise::storage::InMemoryStore;
use spendwise::tracker::TrackerBlocking;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap()
}

fn at_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

fn tracker() -> TrackerBlocking<InMemoryStore> {
    TrackerBlocking::builder()
        .store(InMemoryStore::new())
        .calendar(Calendar::utc(now()))
        .build()
        .unwrap()
}

fn draft(amount: i64, category: &str, kind: TransactionType) -> NewTransaction {
    NewTransaction::new(Decimal::from(amount), category, kind, now())
}

#[test]
fn type_totals_partition_the_whole() {
    let tracker = tracker();
    let _ids = tracker
        .add_transactions(vec![
            draft(300, "Salary", TransactionType::Income),
            draft(120, "Shopping", TransactionType::Expense),
            draft(45, "Food & Dining", TransactionType::Expense),
        ])
        .unwrap();

    let range = Calendar::utc(now()).this_month();
    let views = tracker.views();
    let expense = views
        .total_by_type_and_date_range(TransactionType::Expense, range)
        .latest()
        .unwrap();
    let income = views
        .total_by_type_and_date_range(TransactionType::Income, range)
        .latest()
        .unwrap();
    let everything: Decimal = views
        .by_date_range(range)
        .latest()
        .unwrap()
        .iter()
        .map(|tx| tx.amount)
        .sum();

    assert_eq!(expense + income, everything);
}

#[test]
fn empty_total_is_zero() {
    let tracker = tracker();
    let range = DateRange::new(at_millis(0), at_millis(3000));
    let total = tracker
        .views()
        .total_by_type_and_date_range(TransactionType::Expense, range)
        .latest();
    assert_eq!(total, Some(Decimal::ZERO));
}

#[test]
fn all_is_newest_first_and_totals_add_up() {
    let tracker = tracker();
    let mut all = tracker.views().all_transactions();
    assert_eq!(all.latest(), Some(Vec::new()));

    let _first = tracker
        .add_transaction(NewTransaction::new(
            Decimal::from(100),
            "Food",
            TransactionType::Expense,
            at_millis(1000),
        ))
        .unwrap();
    let _second = tracker
        .add_transaction(NewTransaction::new(
            Decimal::from(200),
            "Transport",
            TransactionType::Expense,
            at_millis(2000),
        ))
        .unwrap();

    let listed = all.latest().unwrap();
    let dates: Vec<_> = listed.iter().map(|tx| tx.date).collect();
    assert_eq!(dates, vec![at_millis(2000), at_millis(1000)]);

    let total = tracker
        .views()
        .total_by_type_and_date_range(
            TransactionType::Expense,
            DateRange::new(at_millis(0), at_millis(3000)),
        )
        .latest();
    assert_eq!(total, Some(Decimal::from(300)));
}

#[test]
fn inserted_transaction_appears_once_in_date_position() {
    let tracker = tracker();
    let _old = tracker
        .add_transaction(NewTransaction::new(
            Decimal::from(10),
            "Shopping",
            TransactionType::Expense,
            at_millis(1000),
        ))
        .unwrap();
    let _new = tracker
        .add_transaction(NewTransaction::new(
            Decimal::from(30),
            "Shopping",
            TransactionType::Expense,
            at_millis(3000),
        ))
        .unwrap();
    let mut all = tracker.views().all_transactions();
    let _initial = all.latest();

    let id = tracker
        .add_transaction(NewTransaction::new(
            Decimal::from(20),
            "Shopping",
            TransactionType::Expense,
            at_millis(2000),
        ))
        .unwrap();

    let listed = all.latest().unwrap();
    assert_eq!(listed.iter().filter(|tx| tx.id == id).count(), 1);
    assert_eq!(listed.get(1).map(|tx| tx.id), Some(id));
}

#[test]
fn breakdown_shares_sum_to_one_hundred() {
    let tracker = tracker();
    let _ids = tracker
        .add_transactions(vec![
            draft(100, "Food & Dining", TransactionType::Expense),
            draft(150, "Food & Dining", TransactionType::Expense),
            draft(150, "Transportation", TransactionType::Expense),
        ])
        .unwrap();

    let breakdown = tracker
        .views()
        .category_breakdown(TransactionType::Expense)
        .latest()
        .unwrap();
    let food = breakdown
        .iter()
        .find(|group| group.category == "Food & Dining")
        .unwrap();
    assert_eq!(food.amount, Decimal::from(250));
    assert_eq!(food.percentage, Decimal::new(625, 1));
    assert_eq!(food.count, 2);

    let shares: Decimal = breakdown.iter().map(|group| group.percentage).sum();
    assert!((shares - Decimal::ONE_HUNDRED).abs() < Decimal::new(1, 2));
}

#[test]
fn budget_flags_follow_monthly_spending() {
    let tracker = tracker();
    tracker.set_budget_limit(Decimal::from(1000));
    let mut status = tracker.views().budget_status();

    let id = tracker
        .add_transaction(draft(850, "Bills & Utilities", TransactionType::Expense))
        .unwrap();
    let current = status.latest().unwrap();
    assert!(current.approaching_budget);
    assert!(!current.over_budget);

    let _updated = tracker
        .update_transaction(id, TransactionPatch::new().amount(Decimal::from(1050)))
        .unwrap();
    let current = status.latest().unwrap();
    assert!(current.approaching_budget);
    assert!(current.over_budget);
    assert_eq!(current.progress, Decimal::ONE);
}

#[test]
fn progress_stays_in_unit_interval() {
    let tracker = tracker();
    let _id = tracker
        .add_transaction(draft(900_000, "Shopping", TransactionType::Expense))
        .unwrap();

    for limit in [Decimal::ZERO, Decimal::from(-5), Decimal::ONE, Decimal::MAX] {
        tracker.set_budget_limit(limit);
        let value = tracker.views().budget_progress().latest().unwrap();
        assert!(value >= Decimal::ZERO && value <= Decimal::ONE, "{limit}: {value}");
    }
}

#[test]
fn update_changes_only_patched_fields() {
    let tracker = tracker();
    let id = tracker
        .add_transaction(
            draft(75, "Entertainment", TransactionType::Expense).description("cinema"),
        )
        .unwrap();
    let before = tracker.transaction(id).unwrap().unwrap();

    let after = tracker
        .update_transaction(id, TransactionPatch::new().description("concert"))
        .unwrap();

    assert_eq!(after.id, before.id);
    assert_eq!(after.description, "concert");
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.category, before.category);
    assert_eq!(after.date, before.date);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn delete_reaches_every_live_query() {
    let tracker = tracker();
    let id = tracker
        .add_transaction(draft(40, "Healthcare", TransactionType::Expense).description("pharmacy"))
        .unwrap();
    let views = tracker.views();
    let mut all = views.all_transactions();
    let mut by_category = views.by_category("Healthcare");
    let mut search = views.search("PHARM");
    assert_eq!(all.latest().map(|txs| txs.len()), Some(1));
    assert_eq!(by_category.latest().map(|txs| txs.len()), Some(1));
    assert_eq!(search.latest().map(|txs| txs.len()), Some(1));

    tracker.delete_transaction(id).unwrap();

    assert_eq!(all.latest(), Some(Vec::new()));
    assert_eq!(by_category.latest(), Some(Vec::new()));
    assert_eq!(search.latest(), Some(Vec::new()));
}

#[test]
fn search_ignores_case_and_covers_category() {
    let tracker = tracker();
    let _ids = tracker
        .add_transactions(vec![
            draft(12, "Food & Dining", TransactionType::Expense).description("Lunch with team"),
            draft(30, "Transportation", TransactionType::Expense).description("taxi"),
        ])
        .unwrap();
    let views = tracker.views();

    let by_description = views.search("LUNCH").latest().unwrap();
    assert_eq!(by_description.len(), 1);

    let by_category = views.search("transport").latest().unwrap();
    assert_eq!(by_category.len(), 1);

    assert_eq!(views.search("rent").latest(), Some(Vec::new()));
}
