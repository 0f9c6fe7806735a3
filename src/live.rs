//! Live view binder: keeps derived values in sync with their inputs.
//!
//! A [`LiveView`] owns the leaf inputs (the latest store [`Snapshot`],
//! the list [`FilterState`], the [`Budget`], the [`Calendar`] and the
//! statistics period) and a set of derived nodes keyed by [`ViewKey`].
//! Nodes exist only while someone is subscribed to them.
//!
//! Changing a leaf recomputes every node that depends on it, once per
//! change. Use [`LiveView::batch`] to change several leaves at once;
//! each affected node is still recomputed exactly once. A node pushes
//! to its subscribers only when its value actually changed.
//!
//! # Example
//!
//! ```
//! use spendwise::live::LiveView;
//! use spendwise::period::Calendar;
//! use spendwise::storage::Snapshot;
//!
//! let view = LiveView::new(Calendar::now_local());
//! let mut count = view.transaction_count();
//! assert_eq!(count.try_next(), Some(0));
//!
//! let _applied = view.publish_snapshot(Snapshot::default());
//! // Same value, so nothing new is delivered.
//! assert_eq!(count.try_next(), None);
//! view.unsubscribe(count);
//! assert_eq!(view.active_views(), 0);
//! ```

use core::any::Any;
use core::fmt;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::aggregate;
use crate::models::{
    Budget, BudgetStatus, CategorySpending, DateBucket, DateFilterMode, Transaction,
    TransactionType,
};
use crate::period::{Calendar, DateRange};
use crate::query::{self, FilterState, TransactionFilter};
use crate::storage::Snapshot;

/// Set of leaf inputs a node reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LeafSet(u8);

impl LeafSet {
    /// No leaves.
    const NONE: Self = Self(0);
    /// Store snapshot.
    const STORE: Self = Self(1);
    /// List filter state.
    const FILTER: Self = Self(1 << 1);
    /// Budget limit.
    const BUDGET: Self = Self(1 << 2);
    /// Reference calendar.
    const CALENDAR: Self = Self(1 << 3);
    /// Statistics period.
    const STATISTICS: Self = Self(1 << 4);

    /// Both sets combined.
    const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if the sets share a leaf.
    const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no leaf is set.
    const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Identity of a derived value.
///
/// Subscribing twice with equal keys shares one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Transactions matching a fixed filter, newest first.
    Query(TransactionFilter),
    /// Sum of one direction within a fixed range.
    Total(TransactionType, DateRange),
    /// Largest expense.
    HighestExpense,
    /// Category with the most transactions of one direction.
    MostUsedCategory(TransactionType),
    /// Number of stored transactions.
    Count,
    /// The newest `n` transactions.
    Recent(usize),
    /// Sum of one direction over the current month.
    MonthlyTotal(TransactionType),
    /// Monthly income minus monthly expense.
    Balance,
    /// Budget limit in effect.
    BudgetLimit,
    /// Limit minus monthly expense.
    RemainingBudget,
    /// Monthly expense over the limit, clamped to `[0, 1]`.
    BudgetProgress,
    /// Monthly expense strictly above the limit.
    OverBudget,
    /// Monthly expense at or above the warning share of the limit.
    ApproachingBudget,
    /// Every budget metric at once.
    BudgetStatus,
    /// The list filter state itself.
    FilterState,
    /// Transactions let through by the list filter state.
    FilteredTransactions,
    /// Filtered transactions grouped by local day.
    GroupedTransactions,
    /// Period chosen in the statistics view.
    StatisticsPeriod,
    /// Sum of one direction over the statistics period.
    StatisticsTotal(TransactionType),
    /// Category breakdown of one direction over the statistics period.
    CategoryBreakdown(TransactionType),
}

impl ViewKey {
    /// Leaves this view reads.
    const fn dependencies(&self) -> LeafSet {
        let month = LeafSet::STORE.with(LeafSet::CALENDAR);
        match self {
            Self::Query(_)
            | Self::Total(..)
            | Self::HighestExpense
            | Self::MostUsedCategory(_)
            | Self::Count
            | Self::Recent(_) => LeafSet::STORE,
            Self::MonthlyTotal(_) | Self::Balance => month,
            Self::BudgetLimit => LeafSet::BUDGET,
            Self::RemainingBudget
            | Self::BudgetProgress
            | Self::OverBudget
            | Self::ApproachingBudget
            | Self::BudgetStatus => month.with(LeafSet::BUDGET),
            Self::FilterState => LeafSet::FILTER,
            Self::FilteredTransactions | Self::GroupedTransactions => {
                month.with(LeafSet::FILTER)
            }
            Self::StatisticsPeriod => LeafSet::STATISTICS,
            Self::StatisticsTotal(_) | Self::CategoryBreakdown(_) => {
                month.with(LeafSet::STATISTICS)
            }
        }
    }
}

/// Leaf values every node computes from.
#[derive(Debug)]
struct Inputs {
    /// Latest accepted store contents.
    snapshot: Snapshot,
    /// Set once a snapshot has been accepted.
    loaded: bool,
    /// List filter.
    filter: FilterState,
    /// Budget limit.
    budget: Budget,
    /// Reference calendar.
    calendar: Calendar,
    /// Statistics period.
    statistics_period: DateFilterMode,
}

impl Inputs {
    /// Stored transactions.
    fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    /// Expense total over the current month.
    fn monthly_expense(&self) -> Decimal {
        aggregate::monthly_total(self.transactions(), TransactionType::Expense, &self.calendar)
    }

    /// Budget metrics over the current month.
    fn budget_status(&self) -> BudgetStatus {
        aggregate::budget_status(self.budget.limit, self.monthly_expense())
    }

    /// Range summarised by the statistics view.
    fn statistics_range(&self) -> DateRange {
        aggregate::statistics_range(self.statistics_period, &self.calendar)
    }

    /// Transactions the list filter lets through.
    fn filtered(&self) -> Vec<Transaction> {
        self.filter.apply(self.transactions(), &self.calendar)
    }
}

/// Identifier of one subscriber within a node.
type SubscriberId = u64;

/// A node with its value type erased, so nodes of different types can
/// share one map.
trait ErasedNode: fmt::Debug + Send {
    /// Recomputes and pushes to subscribers if the value changed.
    fn refresh(&mut self, inputs: &Inputs);
    /// Detaches one subscriber.
    fn detach(&mut self, subscriber: SubscriberId);
    /// Returns `true` once no live subscriber remains.
    fn is_idle(&self) -> bool;
    /// Upcast for downcasting to the typed node.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Function deriving a node's value from the leaves.
type Compute<T> = Box<dyn Fn(&Inputs) -> T + Send>;

/// A derived value with its subscribers.
struct Node<T> {
    /// Derivation.
    compute: Compute<T>,
    /// Last computed value.
    value: T,
    /// Attached subscribers.
    subscribers: Vec<(SubscriberId, UnboundedSender<T>)>,
}

impl<T: Clone + PartialEq + Send + 'static> Node<T> {
    /// Creates a node and computes its first value.
    fn new(compute: Compute<T>, inputs: &Inputs) -> Self {
        let value = compute(inputs);
        Self {
            compute,
            value,
            subscribers: Vec::new(),
        }
    }

    /// Attaches a subscriber and hands it the current value.
    fn attach(&mut self, id: SubscriberId) -> UnboundedReceiver<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if sender.send(self.value.clone()).is_ok() {
            self.subscribers.push((id, sender));
        }
        receiver
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + fmt::Debug + Send + 'static> ErasedNode for Node<T> {
    fn refresh(&mut self, inputs: &Inputs) {
        let next = (self.compute)(inputs);
        if next == self.value {
            return;
        }
        self.value = next;
        // Senders whose receiver was dropped are pruned here.
        self.subscribers
            .retain(|(_, sender)| sender.send(self.value.clone()).is_ok());
    }

    fn detach(&mut self, subscriber: SubscriberId) {
        self.subscribers.retain(|(id, _)| *id != subscriber);
    }

    fn is_idle(&self) -> bool {
        self.subscribers.iter().all(|(_, sender)| sender.is_closed())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Everything behind the binder's lock.
#[derive(Debug)]
struct State {
    /// Leaves.
    inputs: Inputs,
    /// Live nodes.
    nodes: HashMap<ViewKey, Box<dyn ErasedNode>>,
    /// Next subscriber identifier.
    next_subscriber: SubscriberId,
}

impl State {
    /// Recomputes every node reading a leaf in `dirty`, then drops
    /// nodes nobody listens to anymore.
    fn propagate(&mut self, dirty: LeafSet) {
        if dirty.is_empty() {
            return;
        }
        let inputs = &self.inputs;
        for (key, node) in &mut self.nodes {
            if key.dependencies().intersects(dirty) {
                tracing::trace!(?key, "recomputing view");
                node.refresh(inputs);
            }
        }
        self.nodes.retain(|_, node| !node.is_idle());
    }
}

/// A stream of values from one derived node.
///
/// The first value is available immediately after subscribing. Later
/// values arrive in the order they were computed, and only when they
/// differ from the previous one.
#[derive(Debug)]
pub struct Subscription<T> {
    /// Node this subscription listens to.
    key: ViewKey,
    /// Identifier within the node.
    id: SubscriberId,
    /// Delivery channel.
    receiver: UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// The node this subscription listens to.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &ViewKey {
        &self.key
    }

    /// Returns the next pending value without waiting.
    #[inline]
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next value.
    ///
    /// Returns `None` once the subscription has been detached and every
    /// pending value was consumed.
    #[inline]
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Blocks the current thread until the next value arrives.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    #[inline]
    pub fn blocking_next(&mut self) -> Option<T> {
        self.receiver.blocking_recv()
    }

    /// Drains every pending value and returns the newest one.
    #[inline]
    pub fn latest(&mut self) -> Option<T> {
        let mut newest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(value) => newest = Some(value),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return newest,
            }
        }
    }
}

/// Batch of leaf changes applied under one lock.
///
/// Created by [`LiveView::batch`]; derived nodes are recomputed once
/// the closure returns.
#[derive(Debug)]
pub struct Session<'view> {
    /// Locked binder state.
    state: &'view mut State,
    /// Leaves changed so far.
    dirty: LeafSet,
}

impl Session<'_> {
    /// Marks leaves as changed.
    fn touch(&mut self, leaves: LeafSet) {
        self.dirty = self.dirty.with(leaves);
    }

    /// Offers a fresh store snapshot.
    ///
    /// Returns `false` and changes nothing if a snapshot with the same
    /// or a newer revision was already accepted.
    pub fn publish_snapshot(&mut self, snapshot: Snapshot) -> bool {
        let inputs = &mut self.state.inputs;
        if inputs.loaded && snapshot.revision <= inputs.snapshot.revision {
            tracing::trace!(
                incoming = snapshot.revision,
                current = inputs.snapshot.revision,
                "ignoring stale snapshot"
            );
            return false;
        }
        inputs.snapshot = snapshot;
        inputs.loaded = true;
        self.touch(LeafSet::STORE);
        true
    }

    /// Current list filter state.
    #[inline]
    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.state.inputs.filter
    }

    /// Replaces the list filter state.
    pub fn set_filter_state(&mut self, filter: FilterState) {
        if self.state.inputs.filter != filter {
            self.state.inputs.filter = filter;
            self.touch(LeafSet::FILTER);
        }
    }

    /// Edits the list filter state in place.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut FilterState)) {
        let mut filter = self.state.inputs.filter.clone();
        edit(&mut filter);
        self.set_filter_state(filter);
    }

    /// Current budget.
    #[inline]
    #[must_use]
    pub fn budget(&self) -> Budget {
        self.state.inputs.budget
    }

    /// Replaces the budget.
    pub fn set_budget(&mut self, budget: Budget) {
        if self.state.inputs.budget != budget {
            self.state.inputs.budget = budget;
            self.touch(LeafSet::BUDGET);
        }
    }

    /// Replaces the reference calendar.
    pub fn set_calendar(&mut self, calendar: Calendar) {
        if self.state.inputs.calendar != calendar {
            self.state.inputs.calendar = calendar;
            self.touch(LeafSet::CALENDAR);
        }
    }

    /// Chooses the statistics period.
    pub fn set_statistics_period(&mut self, period: DateFilterMode) {
        if self.state.inputs.statistics_period != period {
            self.state.inputs.statistics_period = period;
            self.touch(LeafSet::STATISTICS);
        }
    }
}

/// Dependency graph of live derived values.
///
/// All methods take `&self`; the binder is safe to share between
/// threads. Values are delivered through unbounded channels, so a
/// change never blocks on a slow subscriber.
#[derive(Debug)]
pub struct LiveView {
    /// Leaves, nodes and counters.
    state: Mutex<State>,
}

impl Default for LiveView {
    #[inline]
    fn default() -> Self {
        Self::new(Calendar::now_local())
    }
}

impl LiveView {
    /// Creates a binder with default leaves: no snapshot yet, cleared
    /// filters, the default budget, and statistics over this month.
    #[inline]
    #[must_use]
    pub fn new(calendar: Calendar) -> Self {
        Self::with_budget(calendar, Budget::default())
    }

    /// Creates a binder starting from a specific budget.
    #[inline]
    #[must_use]
    pub fn with_budget(calendar: Calendar, budget: Budget) -> Self {
        Self {
            state: Mutex::new(State {
                inputs: Inputs {
                    snapshot: Snapshot::default(),
                    loaded: false,
                    filter: FilterState::default(),
                    budget,
                    calendar,
                    statistics_period: DateFilterMode::ThisMonth,
                },
                nodes: HashMap::new(),
                next_subscriber: 0,
            }),
        }
    }

    /// Locks the state. A poisoned lock is recovered, since every
    /// mutation leaves the state consistent.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies several leaf changes and recomputes affected nodes once.
    #[inline]
    pub fn batch<R>(&self, changes: impl FnOnce(&mut Session<'_>) -> R) -> R {
        let mut state = self.lock();
        let mut session = Session {
            state: &mut state,
            dirty: LeafSet::NONE,
        };
        let result = changes(&mut session);
        let dirty = session.dirty;
        state.propagate(dirty);
        result
    }

    /// Offers a fresh store snapshot. See [`Session::publish_snapshot`].
    #[inline]
    pub fn publish_snapshot(&self, snapshot: Snapshot) -> bool {
        self.batch(|session| session.publish_snapshot(snapshot))
    }

    /// Replaces the list filter state.
    #[inline]
    pub fn set_filter_state(&self, filter: FilterState) {
        self.batch(|session| session.set_filter_state(filter));
    }

    /// Edits the list filter state in place.
    #[inline]
    pub fn update_filter(&self, edit: impl FnOnce(&mut FilterState)) {
        self.batch(|session| session.update_filter(edit));
    }

    /// Replaces the budget.
    #[inline]
    pub fn set_budget(&self, budget: Budget) {
        self.batch(|session| session.set_budget(budget));
    }

    /// Replaces the reference calendar.
    #[inline]
    pub fn set_calendar(&self, calendar: Calendar) {
        self.batch(|session| session.set_calendar(calendar));
    }

    /// Chooses the statistics period.
    #[inline]
    pub fn set_statistics_period(&self, period: DateFilterMode) {
        self.batch(|session| session.set_statistics_period(period));
    }

    /// Revision of the latest accepted snapshot.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.lock().inputs.snapshot.revision
    }

    /// Current list filter state.
    #[inline]
    #[must_use]
    pub fn current_filter(&self) -> FilterState {
        self.lock().inputs.filter.clone()
    }

    /// Current budget.
    #[inline]
    #[must_use]
    pub fn current_budget(&self) -> Budget {
        self.lock().inputs.budget
    }

    /// Current reference calendar.
    #[inline]
    #[must_use]
    pub fn current_calendar(&self) -> Calendar {
        self.lock().inputs.calendar
    }

    /// Number of nodes with at least one subscriber.
    #[inline]
    #[must_use]
    pub fn active_views(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Detaches a subscription. Its node is torn down once no other
    /// subscriber remains.
    #[inline]
    pub fn unsubscribe<T>(&self, subscription: Subscription<T>) {
        let mut state = self.lock();
        let idle = state.nodes.get_mut(&subscription.key).is_some_and(|node| {
            node.detach(subscription.id);
            node.is_idle()
        });
        if idle {
            let _node = state.nodes.remove(&subscription.key);
            tracing::trace!(key = ?subscription.key, "tore down idle view");
        }
    }

    /// Subscribes to the node for `key`, creating it from `compute` if
    /// it does not exist yet.
    fn subscribe<T, F>(&self, key: ViewKey, compute: F) -> Subscription<T>
    where
        T: Clone + PartialEq + fmt::Debug + Send + 'static,
        F: Fn(&Inputs) -> T + Send + 'static,
    {
        let mut guard = self.lock();
        let state = &mut *guard;
        let id = state.next_subscriber;
        state.next_subscriber = state.next_subscriber.wrapping_add(1);

        if let Some(existing) = state.nodes.get_mut(&key)
            && let Some(node) = existing.as_any_mut().downcast_mut::<Node<T>>()
        {
            let receiver = node.attach(id);
            return Subscription { key, id, receiver };
        }

        let mut node = Node::<T>::new(Box::new(compute), &state.inputs);
        let receiver = node.attach(id);
        tracing::trace!(?key, "created view");
        let _previous = state.nodes.insert(key.clone(), Box::new(node));
        Subscription { key, id, receiver }
    }

    // ── Query views ─────────────────────────────────────────────────

    /// Transactions matching `filter`, newest first.
    #[inline]
    pub fn query(&self, filter: TransactionFilter) -> Subscription<Vec<Transaction>> {
        let captured = filter.clone();
        self.subscribe(ViewKey::Query(filter), move |inputs| {
            query::select(inputs.transactions(), &captured)
        })
    }

    /// Every transaction, newest first.
    #[inline]
    pub fn all_transactions(&self) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::all())
    }

    /// Transactions of one direction.
    #[inline]
    pub fn by_type(&self, kind: TransactionType) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::by_type(kind))
    }

    /// Transactions with exactly this category string.
    #[inline]
    pub fn by_category<C: Into<String>>(&self, category: C) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::by_category(category))
    }

    /// Transactions dated within `range`.
    #[inline]
    pub fn by_date_range(&self, range: DateRange) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::by_date_range(range))
    }

    /// Transactions of one direction dated within `range`.
    #[inline]
    pub fn by_type_and_date_range(
        &self,
        kind: TransactionType,
        range: DateRange,
    ) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::by_type_and_date_range(kind, range))
    }

    /// Transactions whose description or category contains `needle`.
    #[inline]
    pub fn search<N: Into<String>>(&self, needle: N) -> Subscription<Vec<Transaction>> {
        self.query(TransactionFilter::by_search(needle))
    }

    /// Sum of one direction within `range`; zero when nothing matches.
    #[inline]
    pub fn total_by_type_and_date_range(
        &self,
        kind: TransactionType,
        range: DateRange,
    ) -> Subscription<Decimal> {
        self.subscribe(ViewKey::Total(kind, range), move |inputs| {
            query::total_by_type_and_date_range(inputs.transactions(), kind, range)
        })
    }

    /// Largest expense, if any.
    #[inline]
    pub fn highest_expense(&self) -> Subscription<Option<Transaction>> {
        self.subscribe(ViewKey::HighestExpense, |inputs| {
            query::highest_expense(inputs.transactions())
        })
    }

    /// Category with the most transactions of `kind`, if any.
    #[inline]
    pub fn most_used_category(&self, kind: TransactionType) -> Subscription<Option<String>> {
        self.subscribe(ViewKey::MostUsedCategory(kind), move |inputs| {
            query::most_used_category(inputs.transactions(), kind)
        })
    }

    /// Number of stored transactions.
    #[inline]
    pub fn transaction_count(&self) -> Subscription<usize> {
        self.subscribe(ViewKey::Count, |inputs| inputs.transactions().len())
    }

    /// The newest `limit` transactions.
    #[inline]
    pub fn recent_transactions(&self, limit: usize) -> Subscription<Vec<Transaction>> {
        self.subscribe(ViewKey::Recent(limit), move |inputs| {
            query::recent(inputs.transactions(), limit)
        })
    }

    // ── Home views ──────────────────────────────────────────────────

    /// Income over the current month.
    #[inline]
    pub fn monthly_income(&self) -> Subscription<Decimal> {
        self.monthly_total(TransactionType::Income)
    }

    /// Expense over the current month.
    #[inline]
    pub fn monthly_expense(&self) -> Subscription<Decimal> {
        self.monthly_total(TransactionType::Expense)
    }

    /// Sum of `kind` over the current month.
    #[inline]
    pub fn monthly_total(&self, kind: TransactionType) -> Subscription<Decimal> {
        self.subscribe(ViewKey::MonthlyTotal(kind), move |inputs| {
            aggregate::monthly_total(inputs.transactions(), kind, &inputs.calendar)
        })
    }

    /// Monthly income minus monthly expense.
    #[inline]
    pub fn balance(&self) -> Subscription<Decimal> {
        self.subscribe(ViewKey::Balance, |inputs| {
            let transactions = inputs.transactions();
            aggregate::balance(
                aggregate::monthly_total(transactions, TransactionType::Income, &inputs.calendar),
                aggregate::monthly_total(transactions, TransactionType::Expense, &inputs.calendar),
            )
        })
    }

    // ── Budget views ────────────────────────────────────────────────

    /// Budget limit in effect.
    #[inline]
    pub fn budget_limit(&self) -> Subscription<Decimal> {
        self.subscribe(ViewKey::BudgetLimit, |inputs| inputs.budget.limit)
    }

    /// Expense over the current month, the figure budgets are checked
    /// against.
    #[inline]
    pub fn monthly_spending(&self) -> Subscription<Decimal> {
        self.monthly_expense()
    }

    /// Limit minus monthly spending; negative once over budget.
    #[inline]
    pub fn remaining_budget(&self) -> Subscription<Decimal> {
        self.subscribe(ViewKey::RemainingBudget, |inputs| {
            inputs.budget_status().remaining
        })
    }

    /// Share of the limit spent, clamped to `[0, 1]`.
    #[inline]
    pub fn budget_progress(&self) -> Subscription<Decimal> {
        self.subscribe(ViewKey::BudgetProgress, |inputs| {
            inputs.budget_status().progress
        })
    }

    /// Monthly spending strictly above the limit.
    #[inline]
    pub fn over_budget(&self) -> Subscription<bool> {
        self.subscribe(ViewKey::OverBudget, |inputs| {
            inputs.budget_status().over_budget
        })
    }

    /// Monthly spending at or above the warning share of the limit.
    #[inline]
    pub fn approaching_budget(&self) -> Subscription<bool> {
        self.subscribe(ViewKey::ApproachingBudget, |inputs| {
            inputs.budget_status().approaching_budget
        })
    }

    /// Every budget metric at once.
    #[inline]
    pub fn budget_status(&self) -> Subscription<BudgetStatus> {
        self.subscribe(ViewKey::BudgetStatus, Inputs::budget_status)
    }

    // ── Transaction list views ──────────────────────────────────────

    /// The list filter state.
    #[inline]
    pub fn filter_state(&self) -> Subscription<FilterState> {
        self.subscribe(ViewKey::FilterState, |inputs| inputs.filter.clone())
    }

    /// Transactions the list filter lets through, newest first.
    #[inline]
    pub fn filtered_transactions(&self) -> Subscription<Vec<Transaction>> {
        self.subscribe(ViewKey::FilteredTransactions, Inputs::filtered)
    }

    /// Filtered transactions grouped by local day, newest day first.
    #[inline]
    pub fn grouped_transactions(&self) -> Subscription<Vec<DateBucket>> {
        self.subscribe(ViewKey::GroupedTransactions, |inputs| {
            aggregate::group_by_day(&inputs.filtered(), &inputs.calendar)
        })
    }

    // ── Statistics views ────────────────────────────────────────────

    /// Period chosen in the statistics view.
    #[inline]
    pub fn statistics_period(&self) -> Subscription<DateFilterMode> {
        self.subscribe(ViewKey::StatisticsPeriod, |inputs| inputs.statistics_period)
    }

    /// Sum of `kind` over the statistics period.
    #[inline]
    pub fn statistics_total(&self, kind: TransactionType) -> Subscription<Decimal> {
        self.subscribe(ViewKey::StatisticsTotal(kind), move |inputs| {
            query::total_by_type_and_date_range(
                inputs.transactions(),
                kind,
                inputs.statistics_range(),
            )
        })
    }

    /// Category breakdown of `kind` over the statistics period.
    #[inline]
    pub fn category_breakdown(&self, kind: TransactionType) -> Subscription<Vec<CategorySpending>> {
        self.subscribe(ViewKey::CategoryBreakdown(kind), move |inputs| {
            aggregate::category_breakdown_for(inputs.transactions(), kind, inputs.statistics_range())
        })
    }
}
