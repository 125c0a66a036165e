use chrono::{Local, TimeZone};
use ledgerdesk_core::{parse_amount, parse_picker_date, DayBounds, TxStatus};
use serde::{Deserialize, Serialize};

use crate::search::{classify, DatePrecision, SearchTerm};
use crate::state::{SortOrder, TransactionFilterState};

/// Client-facing sort keys and the field name the API sorts on.
pub const SORT_RENAMES: &[(&str, &str)] = &[
    ("date", "paidAt"),
    ("amount", "amount"),
    ("createdAt", "createdAt"),
    ("updatedAt", "updatedAt"),
];

/// Fields the API accepts in `sort`.
pub const SORT_ALLOW_LIST: &[&str] = &["paidAt", "amount", "createdAt", "updatedAt"];

/// Maps a client sort key to the server field, or `None` if the API would
/// reject it. Keys missing from the rename table pass through unchanged
/// before the allow-list check.
pub fn server_sort_key(client_key: &str) -> Option<&'static str> {
    let renamed = SORT_RENAMES
        .iter()
        .find(|(client, _)| *client == client_key)
        .map_or(client_key, |&(_, server)| server);
    SORT_ALLOW_LIST.iter().copied().find(|allowed| *allowed == renamed)
}

/// Query parameters for the transactions endpoint. Absent fields are left
/// out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TxStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl ApiFilterParams {
    /// Flattens to `(key, value)` pairs in a stable order, ready for a query string.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        let optional = [
            ("search", self.search.clone()),
            ("status", self.status.map(|s| s.to_string())),
            ("accountId", self.account_id.clone()),
            ("startDate", self.start_date.clone()),
            ("endDate", self.end_date.clone()),
            ("contactId", self.contact_id.clone()),
            ("categoryId", self.category_id.clone()),
            ("taxId", self.tax_id.clone()),
            ("minAmount", self.min_amount.map(|v| v.to_string())),
            ("maxAmount", self.max_amount.map(|v| v.to_string())),
            ("sort", self.sort.clone()),
            ("order", self.order.map(|o| o.to_string())),
        ];
        pairs.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
        pairs
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

fn amount_bound(name: &str, raw: Option<&String>) -> Option<f64> {
    let raw = non_empty(raw)?;
    let parsed = parse_amount(&raw);
    if parsed.is_none() {
        tracing::debug!(field = name, value = %raw, "dropping unparseable amount filter");
    }
    parsed
}

fn picker_bounds<Tz: TimeZone>(tz: &Tz, name: &str, raw: Option<&String>) -> Option<DayBounds> {
    let raw = non_empty(raw)?;
    let bounds = parse_picker_date(&raw).and_then(|date| DayBounds::for_day(tz, date));
    if bounds.is_none() {
        tracing::debug!(field = name, value = %raw, "dropping unparseable date filter");
    }
    bounds
}

/// Builds API query parameters from the filter state, reading local dates
/// in `tz`.
///
/// Every filter is gated on its own input. Malformed input drops that one
/// filter and never fails the whole query. When both a date search and the
/// date pickers are set, the pickers win for the bound they set.
pub fn compile_filters<Tz: TimeZone>(state: &TransactionFilterState, tz: &Tz) -> ApiFilterParams {
    let mut params = ApiFilterParams {
        page: state.page.max(1),
        limit: state.limit.max(1),
        ..ApiFilterParams::default()
    };

    match classify(&state.search) {
        Some(SearchTerm::Date { precision: DatePrecision::Day, date }) => {
            if let Some(bounds) = DayBounds::for_day(tz, date) {
                params.start_date = Some(bounds.start_iso());
                params.end_date = Some(bounds.end_iso());
            }
        }
        // Amounts, reference numbers, partial dates and free text are left to the server.
        Some(_) => params.search = Some(state.search.trim().to_string()),
        None => {}
    }

    params.status = state.status.status();
    params.account_id = non_empty(state.account_id.as_ref());
    params.contact_id = non_empty(state.supplier_id.as_ref());
    params.category_id = non_empty(state.category_id.as_ref());
    params.tax_id = non_empty(state.tax_id.as_ref());

    if let Some(bounds) = picker_bounds(tz, "startDate", state.start_date.as_ref()) {
        params.start_date = Some(bounds.start_iso());
    }
    if let Some(bounds) = picker_bounds(tz, "endDate", state.end_date.as_ref()) {
        params.end_date = Some(bounds.end_iso());
    }

    params.min_amount = amount_bound("minAmount", state.min_amount.as_ref());
    params.max_amount = amount_bound("maxAmount", state.max_amount.as_ref());

    if let Some(key) = state.sort.as_deref() {
        match server_sort_key(key) {
            Some(field) => {
                params.sort = Some(field.to_string());
                params.order = state.order;
            }
            None => tracing::debug!(sort = key, "dropping sort key outside the allow-list"),
        }
    }

    params
}

/// [`compile_filters`] in the machine's local time zone.
pub fn compile_filters_local(state: &TransactionFilterState) -> ApiFilterParams {
    compile_filters(state, &Local)
}
