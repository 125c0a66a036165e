use std::fmt;
use std::sync::Arc;

use chrono::TimeZone;
use parking_lot::RwLock;

use crate::compile::{compile_filters, compile_filters_local, ApiFilterParams};
use crate::config::FilterDefaults;
use crate::state::{SortOrder, StatusFilter, TransactionFilterState};

pub type Listener = Box<dyn Fn(&TransactionFilterState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The transaction list's filter, paging and sort selection.
///
/// Every setter except [`set_page`](Self::set_page) and
/// [`set_limit`](Self::set_limit) also moves back to page 1, even when the
/// new value equals the old one. Listeners see each committed state.
pub struct FilterStore {
    state: TransactionFilterState,
    defaults: FilterDefaults,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("defaults", &self.defaults)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterDefaults::default())
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

impl FilterStore {
    pub fn new(defaults: FilterDefaults) -> Self {
        Self {
            state: defaults.initial_state(),
            defaults,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &TransactionFilterState {
        &self.state
    }

    pub fn snapshot(&self) -> TransactionFilterState {
        self.state.clone()
    }

    pub fn defaults(&self) -> &FilterDefaults {
        &self.defaults
    }

    /// API parameters for the current selection, in the local time zone.
    pub fn api_params(&self) -> ApiFilterParams {
        compile_filters_local(&self.state)
    }

    pub fn api_params_in<Tz: TimeZone>(&self, tz: &Tz) -> ApiFilterParams {
        compile_filters(&self.state, tz)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&TransactionFilterState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Applies `change` and, when `reset_page` is set, the page reset in the
    /// same step, then notifies listeners.
    fn commit(&mut self, reset_page: bool, change: impl FnOnce(&mut TransactionFilterState)) {
        change(&mut self.state);
        if reset_page {
            self.state.page = 1;
        }
        tracing::trace!(state = ?self.state, "filter state updated");
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    // ── Paging ───────────────────────────────────────────────────────────────

    pub fn set_page(&mut self, page: u32) {
        self.commit(false, |s| s.page = page.max(1));
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.commit(false, |s| s.limit = limit.max(1));
    }

    // ── Filters ──────────────────────────────────────────────────────────────

    pub fn set_search(&mut self, search: &str) {
        self.commit(true, |s| s.search = search.to_string());
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.commit(true, |s| s.status = status);
    }

    pub fn set_account_id(&mut self, account_id: Option<&str>) {
        self.commit(true, |s| s.account_id = owned(account_id));
    }

    pub fn set_supplier_id(&mut self, supplier_id: Option<&str>) {
        self.commit(true, |s| s.supplier_id = owned(supplier_id));
    }

    pub fn set_category_id(&mut self, category_id: Option<&str>) {
        self.commit(true, |s| s.category_id = owned(category_id));
    }

    pub fn set_tax_id(&mut self, tax_id: Option<&str>) {
        self.commit(true, |s| s.tax_id = owned(tax_id));
    }

    pub fn set_start_date(&mut self, start_date: Option<&str>) {
        self.commit(true, |s| s.start_date = owned(start_date));
    }

    pub fn set_end_date(&mut self, end_date: Option<&str>) {
        self.commit(true, |s| s.end_date = owned(end_date));
    }

    pub fn set_date_range(&mut self, start_date: Option<&str>, end_date: Option<&str>) {
        self.commit(true, |s| {
            s.start_date = owned(start_date);
            s.end_date = owned(end_date);
        });
    }

    pub fn set_min_amount(&mut self, min_amount: Option<&str>) {
        self.commit(true, |s| s.min_amount = owned(min_amount));
    }

    pub fn set_max_amount(&mut self, max_amount: Option<&str>) {
        self.commit(true, |s| s.max_amount = owned(max_amount));
    }

    /// Sets the sort column. Without an explicit `order`, picking the active
    /// column again flips the direction and a new column starts ascending.
    pub fn set_sort(&mut self, sort: &str, order: Option<SortOrder>) {
        let order = order.unwrap_or_else(|| {
            if self.state.sort.as_deref() == Some(sort) {
                self.state.order.unwrap_or_default().toggled()
            } else {
                SortOrder::Asc
            }
        });
        self.commit(true, |s| {
            s.sort = Some(sort.to_string());
            s.order = Some(order);
        });
    }

    pub fn reset_filters(&mut self) {
        let fresh = self.defaults.initial_state();
        self.commit(true, |s| *s = fresh);
    }
}

/// A [`FilterStore`] shared between threads. Each call takes the write lock
/// once, so a field change and its page reset land together.
#[derive(Clone, Default)]
pub struct SharedFilterStore {
    inner: Arc<RwLock<FilterStore>>,
}

impl fmt::Debug for SharedFilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedFilterStore").field(&*self.inner.read()).finish()
    }
}

impl SharedFilterStore {
    pub fn new(store: FilterStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    /// Runs `f` under the write lock. Listeners fire inside the lock and must
    /// not call back into this handle.
    pub fn update<R>(&self, f: impl FnOnce(&mut FilterStore) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn snapshot(&self) -> TransactionFilterState {
        self.inner.read().snapshot()
    }

    pub fn api_params(&self) -> ApiFilterParams {
        self.inner.read().api_params()
    }

    pub fn api_params_in<Tz: TimeZone>(&self, tz: &Tz) -> ApiFilterParams {
        self.inner.read().api_params_in(tz)
    }
}
