//! In-memory transaction store.
//!
//! Provides [`InMemoryStore`], a thread-safe in-memory implementation of
//! the store traits, and the [`Ledger`] bookkeeping that
//! [`super::FileStore`] persists to disk.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "async")]
use core::future::{self, Future};

use serde::{Deserialize, Serialize};

use super::Snapshot;
use crate::error::{Result, SpendwiseError};
use crate::models::{Transaction, TransactionId};

/// Thread-safe in-memory store.
///
/// This type implements both [`super::Store`] (async) and
/// [`super::BlockingStore`] (blocking) traits, providing a zero-setup
/// backend for tests and short-lived sessions.
///
/// # Example
///
/// ```rust
/// use spendwise::storage::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// // Use with Tracker or TrackerBlocking builders:
/// // TrackerBlocking::builder().store(store).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Ledger>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Ledger) -> Result<R>) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        f(&mut inner)
    }
}

/// Wraps a mutex poison error.
pub(super) fn lock_error<T>(err: &PoisonError<T>) -> SpendwiseError {
    SpendwiseError::Storage(err.to_string().into())
}

/// Counters persisted next to the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LedgerMeta {
    /// Identifier handed to the next unassigned insert.
    pub(super) next_id: i64,
    /// Number of mutations applied so far.
    pub(super) revision: u64,
}

impl Default for LedgerMeta {
    fn default() -> Self {
        Self {
            next_id: 1,
            revision: 0,
        }
    }
}

/// Keyed transaction records plus ID and revision counters.
#[derive(Debug, Default, Clone)]
pub(super) struct Ledger {
    /// Counters.
    meta: LedgerMeta,
    /// Records by ID.
    records: BTreeMap<TransactionId, Transaction>,
}

impl Ledger {
    /// Rebuilds a ledger from persisted parts.
    ///
    /// `next_id` is raised past the largest stored ID in case the
    /// counters were written by an older run.
    #[cfg_attr(
        not(feature = "storage-file"),
        allow(dead_code, reason = "only the file store rebuilds and writes ledgers")
    )]
    pub(super) fn from_parts(meta: LedgerMeta, transactions: Vec<Transaction>) -> Self {
        let records: BTreeMap<TransactionId, Transaction> =
            transactions.into_iter().map(|tx| (tx.id, tx)).collect();
        let floor = records
            .keys()
            .next_back()
            .map_or(1, |id| id.into_inner().saturating_add(1));
        Self {
            meta: LedgerMeta {
                next_id: meta.next_id.max(floor),
                revision: meta.revision,
            },
            records,
        }
    }

    /// Current counters.
    #[cfg_attr(
        not(feature = "storage-file"),
        allow(dead_code, reason = "only the file store rebuilds and writes ledgers")
    )]
    pub(super) const fn meta(&self) -> LedgerMeta {
        self.meta
    }

    /// Stored records in ID order.
    #[cfg_attr(
        not(feature = "storage-file"),
        allow(dead_code, reason = "only the file store rebuilds and writes ledgers")
    )]
    pub(super) fn records(&self) -> impl Iterator<Item = &Transaction> {
        self.records.values()
    }

    /// Copies the records out with the current revision.
    pub(super) fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.meta.revision,
            transactions: self.records.values().cloned().collect(),
        }
    }

    /// Looks up one record.
    pub(super) fn get(&self, id: TransactionId) -> Option<Transaction> {
        self.records.get(&id).cloned()
    }

    /// Inserts or replaces a record.
    pub(super) fn insert(&mut self, mut transaction: Transaction) -> Result<TransactionId> {
        if transaction.id.is_assigned() {
            let next = transaction.id.into_inner().saturating_add(1);
            self.meta.next_id = self.meta.next_id.max(next);
        } else {
            transaction.id = TransactionId::new(self.meta.next_id);
            self.meta.next_id = self
                .meta
                .next_id
                .checked_add(1)
                .ok_or_else(|| SpendwiseError::Storage("transaction ID space exhausted".into()))?;
        }
        let id = transaction.id;
        let _replaced = self.records.insert(id, transaction);
        self.bump();
        Ok(id)
    }

    /// Inserts several records, returning their IDs in input order.
    pub(super) fn insert_all(&mut self, transactions: Vec<Transaction>) -> Result<Vec<TransactionId>> {
        transactions
            .into_iter()
            .map(|transaction| self.insert(transaction))
            .collect()
    }

    /// Replaces a stored record, keeping its `created_at` and `kind`.
    pub(super) fn update(&mut self, transaction: Transaction) -> Result<()> {
        let stored = self
            .records
            .get_mut(&transaction.id)
            .ok_or(SpendwiseError::TransactionNotFound(transaction.id))?;
        let (created_at, kind) = (stored.created_at, stored.kind);
        *stored = Transaction {
            created_at,
            kind,
            ..transaction
        };
        self.bump();
        Ok(())
    }

    /// Removes a record if present.
    pub(super) fn delete(&mut self, id: TransactionId) {
        let _removed = self.records.remove(&id);
        self.bump();
    }

    /// Removes every record. ID assignment continues where it left off.
    pub(super) fn delete_all(&mut self) {
        self.records.clear();
        self.bump();
    }

    /// Advances the revision.
    fn bump(&mut self) {
        self.meta.revision = self.meta.revision.saturating_add(1);
    }
}

// ── BlockingStore implementation ────────────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingStore for InMemoryStore {
    #[inline]
    fn snapshot(&self) -> Result<Snapshot> {
        self.with_lock(|ledger| Ok(ledger.snapshot()))
    }

    #[inline]
    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.with_lock(|ledger| Ok(ledger.get(id)))
    }

    #[inline]
    fn insert(&self, transaction: Transaction) -> Result<TransactionId> {
        self.with_lock(|ledger| ledger.insert(transaction))
    }

    #[inline]
    fn insert_all(&self, transactions: Vec<Transaction>) -> Result<Vec<TransactionId>> {
        self.with_lock(|ledger| ledger.insert_all(transactions))
    }

    #[inline]
    fn update(&self, transaction: Transaction) -> Result<()> {
        self.with_lock(|ledger| ledger.update(transaction))
    }

    #[inline]
    fn delete(&self, id: TransactionId) -> Result<()> {
        self.with_lock(|ledger| {
            ledger.delete(id);
            Ok(())
        })
    }

    #[inline]
    fn delete_all(&self) -> Result<()> {
        self.with_lock(|ledger| {
            ledger.delete_all();
            Ok(())
        })
    }
}

// ── Store (async) implementation ────────────────────────────────────────

#[cfg(feature = "async")]
impl super::Store for InMemoryStore {
    #[inline]
    fn snapshot(&self) -> impl Future<Output = Result<Snapshot>> + Send {
        future::ready(self.with_lock(|ledger| Ok(ledger.snapshot())))
    }

    #[inline]
    fn transaction(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<Option<Transaction>>> + Send {
        future::ready(self.with_lock(|ledger| Ok(ledger.get(id))))
    }

    #[inline]
    fn insert(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = Result<TransactionId>> + Send {
        future::ready(self.with_lock(|ledger| ledger.insert(transaction)))
    }

    #[inline]
    fn insert_all(
        &self,
        transactions: Vec<Transaction>,
    ) -> impl Future<Output = Result<Vec<TransactionId>>> + Send {
        future::ready(self.with_lock(|ledger| ledger.insert_all(transactions)))
    }

    #[inline]
    fn update(&self, transaction: Transaction) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|ledger| ledger.update(transaction)))
    }

    #[inline]
    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|ledger| {
            ledger.delete(id);
            Ok(())
        }))
    }

    #[inline]
    fn delete_all(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|ledger| {
            ledger.delete_all();
            Ok(())
        }))
    }
}
