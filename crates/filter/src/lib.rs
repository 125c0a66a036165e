pub mod compile;
pub mod config;
pub mod search;
pub mod state;
pub mod store;

pub use compile::{compile_filters, compile_filters_local, server_sort_key, ApiFilterParams};
pub use config::{ConfigError, FilterDefaults};
pub use search::{
    classify, is_date_like, is_numeric, parse_search_date, search_day_bounds, search_instant,
    DatePrecision, SearchTerm,
};
pub use state::{SortOrder, StatusFilter, TransactionFilterState};
pub use store::{FilterStore, SharedFilterStore, SubscriptionId};
