//! High-level tracker: the edit boundary in front of a store.
//!
//! Combines a [`Store`] / [`BlockingStore`] backend with a [`LiveView`].
//! Every edit is validated first, so invalid input never reaches the
//! store. After a successful write the tracker re-reads the store and
//! publishes the snapshot, which updates every live subscription. A
//! failed re-read does not turn a committed write into an error; it is
//! logged and the views stay on the previous snapshot.
//!
//! [`Store`]: crate::storage::Store
//! [`BlockingStore`]: crate::storage::BlockingStore
//! [`LiveView`]: crate::live::LiveView

use crate::error::SpendwiseError;

/// Logs and passes through a validation failure.
fn rejected(err: SpendwiseError) -> SpendwiseError {
    tracing::warn!(error = %err, "rejected edit");
    err
}

/// Logs a refresh that failed after a committed write. Views keep their
/// last values until the next successful refresh.
fn stale_views(err: &SpendwiseError) {
    tracing::warn!(error = %err, "write committed, views not refreshed");
}

/// Generates a tracker facade (async or blocking).
macro_rules! define_tracker {
    (
        tracker_name: $tracker:ident,
        builder_name: $builder:ident,
        store_trait: $store_trait:ident,
        tracker_doc: $tracker_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $store_trait> {
            /// Transaction store.
            store: Option<S>,
            /// Initial budget limit.
            budget_limit: Option<Decimal>,
            /// Reference calendar.
            calendar: Option<Calendar>,
            /// Length of the recent-transactions list.
            recent_limit: usize,
        }

        impl<S: $store_trait> $builder<S> {
            /// Sets the transaction store.
            #[inline]
            #[must_use]
            pub fn store(mut self, store: S) -> Self {
                self.store = Some(store);
                self
            }

            /// Sets the initial monthly budget limit (default 500000).
            #[inline]
            #[must_use]
            pub fn budget_limit(mut self, limit: Decimal) -> Self {
                self.budget_limit = Some(limit);
                self
            }

            /// Pins the reference calendar (default: local clock at build time).
            #[inline]
            #[must_use]
            pub fn calendar(mut self, calendar: Calendar) -> Self {
                self.calendar = Some(calendar);
                self
            }

            /// Sets how many transactions the recent list shows (default 10).
            #[inline]
            #[must_use]
            pub fn recent_limit(mut self, limit: usize) -> Self {
                self.recent_limit = limit;
                self
            }

            /// Builds the tracker.
            ///
            /// The store is not read here; views hold their empty defaults
            /// until the first refresh.
            ///
            /// # Errors
            ///
            /// Returns [`SpendwiseError::Storage`] if no store was provided.
            #[inline]
            pub fn build(self) -> Result<$tracker<S>> {
                let store = self.store.ok_or_else(|| {
                    SpendwiseError::Storage("transaction store is required".into())
                })?;
                let budget = self.budget_limit.map_or_else(Budget::default, Budget::new);
                let calendar = self.calendar.unwrap_or_else(Calendar::now_local);
                Ok($tracker {
                    store,
                    views: LiveView::with_budget(calendar, budget),
                    recent_limit: self.recent_limit,
                })
            }
        }

        #[doc = $tracker_doc]
        #[derive(Debug)]
        pub struct $tracker<S: $store_trait> {
            /// Transaction store.
            store: S,
            /// Live derived values.
            views: LiveView,
            /// Length of the recent-transactions list.
            recent_limit: usize,
        }

        impl<S: $store_trait> $tracker<S> {
            /// Creates a new builder for configuring the tracker.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<S> {
                $builder {
                    store: None,
                    budget_limit: None,
                    calendar: None,
                    recent_limit: DEFAULT_RECENT_LIMIT,
                }
            }

            /// Live views over this tracker's data.
            #[inline]
            #[must_use]
            pub const fn views(&self) -> &LiveView {
                &self.views
            }

            /// The underlying store.
            #[inline]
            #[must_use]
            pub const fn store(&self) -> &S {
                &self.store
            }

            /// The newest transactions, as many as the configured recent limit.
            #[inline]
            pub fn recent_transactions(&self) -> Subscription<Vec<Transaction>> {
                self.views.recent_transactions(self.recent_limit)
            }

            /// Re-reads the store and publishes the snapshot to every view.
            ///
            /// Returns `false` if the snapshot was older than one already
            /// published.
            ///
            /// # Errors
            ///
            /// Returns an error if the store fails to read. Views keep
            /// their last values.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn refresh(&self) -> Result<bool> {
                let snapshot = self.store.snapshot() $( .$await_ext )? ?;
                let revision = snapshot.revision;
                let count = snapshot.transactions.len();
                let applied = self.views.publish_snapshot(snapshot);
                tracing::debug!(revision, count, applied, "refreshed views");
                Ok(applied)
            }

            /// Validates and stores a new transaction, returning its ID.
            ///
            /// # Errors
            ///
            /// Returns [`SpendwiseError::InvalidAmount`] or
            /// [`SpendwiseError::BlankCategory`] for invalid input, or the
            /// store's error if the write fails. A failed refresh after the
            /// write is logged and leaves the views stale.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn add_transaction(
                &self,
                draft: NewTransaction,
            ) -> Result<TransactionId> {
                draft.validate().map_err(rejected)?;
                let transaction = draft.into_transaction(Utc::now());
                let id = self.store.insert(transaction) $( .$await_ext )? ?;
                tracing::debug!(%id, "added transaction");
                if let Err(err) = self.refresh() $( .$await_ext )? {
                    stale_views(&err);
                }
                Ok(id)
            }

            /// Validates and stores several transactions at once.
            ///
            /// Nothing is written unless every draft is valid.
            ///
            /// # Errors
            ///
            /// Returns the first validation error, or the store's error if
            /// the write fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn add_transactions(
                &self,
                drafts: Vec<NewTransaction>,
            ) -> Result<Vec<TransactionId>> {
                for draft in &drafts {
                    draft.validate().map_err(rejected)?;
                }
                let created_at = Utc::now();
                let transactions = drafts
                    .into_iter()
                    .map(|draft| draft.into_transaction(created_at))
                    .collect();
                let ids = self.store.insert_all(transactions) $( .$await_ext )? ?;
                tracing::debug!(count = ids.len(), "added transactions");
                if let Err(err) = self.refresh() $( .$await_ext )? {
                    stale_views(&err);
                }
                Ok(ids)
            }

            /// Applies a partial update and returns the stored result.
            ///
            /// The identifier, direction and creation time never change.
            ///
            /// # Errors
            ///
            /// Returns [`SpendwiseError::EmptyPatch`],
            /// [`SpendwiseError::InvalidAmount`] or
            /// [`SpendwiseError::BlankCategory`] for invalid input,
            /// [`SpendwiseError::TransactionNotFound`] for an unknown ID, or
            /// the store's error if a read or write fails.
            #[tracing::instrument(skip_all, fields(%id))]
            pub $($async_kw)? fn update_transaction(
                &self,
                id: TransactionId,
                patch: TransactionPatch,
            ) -> Result<Transaction> {
                patch.validate().map_err(rejected)?;
                let current = self
                    .store
                    .transaction(id)
                    $( .$await_ext )?
                    ?
                    .ok_or(SpendwiseError::TransactionNotFound(id))
                    .map_err(rejected)?;
                let updated = patch.apply(&current);
                self.store.update(updated.clone()) $( .$await_ext )? ?;
                tracing::debug!("updated transaction");
                if let Err(err) = self.refresh() $( .$await_ext )? {
                    stale_views(&err);
                }
                Ok(updated)
            }

            /// Deletes a transaction. Unknown IDs are ignored.
            ///
            /// # Errors
            ///
            /// Returns the store's error if the write fails.
            #[tracing::instrument(skip_all, fields(%id))]
            pub $($async_kw)? fn delete_transaction(&self, id: TransactionId) -> Result<()> {
                self.store.delete(id) $( .$await_ext )? ?;
                tracing::debug!("deleted transaction");
                if let Err(err) = self.refresh() $( .$await_ext )? {
                    stale_views(&err);
                }
                Ok(())
            }

            /// Deletes every transaction.
            ///
            /// # Errors
            ///
            /// Returns the store's error if the write fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn delete_all(&self) -> Result<()> {
                self.store.delete_all() $( .$await_ext )? ?;
                tracing::debug!("deleted all transactions");
                if let Err(err) = self.refresh() $( .$await_ext )? {
                    stale_views(&err);
                }
                Ok(())
            }

            /// Looks up one transaction in the store.
            ///
            /// # Errors
            ///
            /// Returns the store's error if the read fails.
            #[inline]
            pub $($async_kw)? fn transaction(
                &self,
                id: TransactionId,
            ) -> Result<Option<Transaction>> {
                self.store.transaction(id) $( .$await_ext )?
            }

            // ── Session state ────────────────────────────────────────

            /// Sets the monthly budget limit for this session.
            ///
            /// Zero and negative limits are accepted; progress then reads 0.
            #[inline]
            pub fn set_budget_limit(&self, limit: Decimal) {
                tracing::debug!(%limit, "budget limit changed");
                self.views.set_budget(Budget::new(limit));
            }

            /// Sets the free-text search of the transaction list.
            #[inline]
            pub fn set_search_query<Q: Into<String>>(&self, query: Q) {
                let query = query.into();
                self.views.update_filter(|filter| filter.search_query = query);
            }

            /// Restricts the transaction list to one direction, or clears it.
            #[inline]
            pub fn set_type_filter(&self, kind: Option<TransactionType>) {
                self.views.update_filter(|filter| filter.kind = kind);
            }

            /// Restricts the transaction list to one category, or clears it.
            #[inline]
            pub fn set_category_filter(&self, category: Option<String>) {
                self.views.update_filter(|filter| filter.category = category);
            }

            /// Sets the date window of the transaction list.
            ///
            /// The bounds only matter for [`DateFilterMode::Custom`], and
            /// only when both are present.
            #[inline]
            pub fn set_date_filter(
                &self,
                mode: DateFilterMode,
                start: Option<DateTime<Utc>>,
                end: Option<DateTime<Utc>>,
            ) {
                self.views.update_filter(|filter| {
                    filter.date_filter_mode = mode;
                    filter.custom_start = start;
                    filter.custom_end = end;
                });
            }

            /// Resets every list filter to its default.
            #[inline]
            pub fn clear_filters(&self) {
                self.views.set_filter_state(FilterState::default());
            }

            /// Chooses the statistics period.
            #[inline]
            pub fn set_statistics_period(&self, period: DateFilterMode) {
                self.views.set_statistics_period(period);
            }

            /// Moves the reference calendar, e.g. after midnight.
            #[inline]
            pub fn set_calendar(&self, calendar: Calendar) {
                self.views.set_calendar(calendar);
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_tracker {
    //! Async tracker.

    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::{rejected, stale_views};
    use crate::error::{Result, SpendwiseError};
    use crate::live::{LiveView, Subscription};
    use crate::models::{
        Budget, DateFilterMode, NewTransaction, Transaction, TransactionId, TransactionPatch,
        TransactionType,
    };
    use crate::period::Calendar;
    use crate::query::{DEFAULT_RECENT_LIMIT, FilterState};
    use crate::storage::Store;

    define_tracker! {
        tracker_name: Tracker,
        builder_name: TrackerBuilder,
        store_trait: Store,
        tracker_doc: "Async finance tracker over a [`Store`].\n\nUse [`Tracker::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Tracker`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_tracker {
    //! Blocking tracker.

    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::{rejected, stale_views};
    use crate::error::{Result, SpendwiseError};
    use crate::live::{LiveView, Subscription};
    use crate::models::{
        Budget, DateFilterMode, NewTransaction, Transaction, TransactionId, TransactionPatch,
        TransactionType,
    };
    use crate::period::Calendar;
    use crate::query::{DEFAULT_RECENT_LIMIT, FilterState};
    use crate::storage::BlockingStore;

    define_tracker! {
        tracker_name: TrackerBlocking,
        builder_name: TrackerBlockingBuilder,
        store_trait: BlockingStore,
        tracker_doc: "Blocking finance tracker over a [`BlockingStore`].\n\nUse [`TrackerBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TrackerBlocking`].",
    }
}

#[cfg(feature = "async")]
pub use async_tracker::{Tracker, TrackerBuilder};
#[cfg(feature = "blocking")]
pub use blocking_tracker::{TrackerBlocking, TrackerBlockingBuilder};
