//! Data models for transactions, the category catalog and derived views.
//!
//! This module contains the persisted [`Transaction`] record, the drafts
//! the edit boundary accepts, the static [`Category`] catalog, and the
//! value types produced by aggregation.

mod budget;
mod category;
mod enums;
mod ids;
mod summary;
mod transaction;

pub use budget::{BUDGET_WARNING_THRESHOLD, Budget, BudgetStatus, DEFAULT_BUDGET_LIMIT};
pub use category::Category;
pub use enums::{DateFilterMode, TransactionType};
pub use ids::TransactionId;
pub use summary::{CategorySpending, DateBucket};
pub use transaction::{NewTransaction, Transaction, TransactionPatch};
