//! Personal finance tracking core.
//!
//! `spendwise` turns a collection of income and expense transactions into
//! the figures a finance app shows: monthly totals, balance, budget
//! progress, category breakdowns, filtered and day-grouped lists. Every
//! derived figure is available as a live subscription that updates when
//! the stored transactions, the list filters, or the budget change.
//!
//! # Layers
//!
//! - [`models`]: transactions, categories, budgets.
//! - [`period`]: calendar ranges (today, this week, this month).
//! - [`query`]: filters and lookups over a slice of transactions.
//! - [`aggregate`]: balance, budget metrics, breakdowns, day buckets.
//! - [`storage`]: the store traits plus in-memory and JSON-file stores.
//! - [`live`]: the dependency graph that republishes derived values.
//! - [`tracker`]: the validated edit boundary tying a store to the views.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "blocking")]
//! # fn main() -> spendwise::error::Result<()> {
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//! use spendwise::models::{NewTransaction, TransactionType};
//! use spendwise::storage::InMemoryStore;
//! use spendwise::tracker::TrackerBlocking;
//!
//! let tracker = TrackerBlocking::builder()
//!     .store(InMemoryStore::new())
//!     .build()?;
//! let mut balance = tracker.views().balance();
//!
//! let _id = tracker.add_transaction(NewTransaction::new(
//!     Decimal::from(2500),
//!     "Salary",
//!     TransactionType::Income,
//!     Utc::now(),
//! ))?;
//! assert_eq!(balance.latest(), Some(Decimal::from(2500)));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "blocking"))]
//! # fn main() {}
//! ```

pub mod aggregate;
pub mod error;
pub mod live;
pub mod models;
pub mod period;
pub mod query;
pub mod storage;
pub mod tracker;
