use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compile::SORT_RENAMES;
use crate::state::{SortOrder, StatusFilter, TransactionFilterState, DEFAULT_LIMIT, DEFAULT_SORT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Page size must be at least 1, got {0}")]
    InvalidLimit(u32),
    #[error("Unknown sort key: '{0}'")]
    UnknownSortKey(String),
}

/// The values `reset_filters` returns the store to.
///
/// ```toml
/// limit = 50
/// status = "pending"
/// sort = "amount"
/// order = "desc"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterDefaults {
    pub limit: u32,
    pub status: StatusFilter,
    pub sort: Option<String>,
    pub order: SortOrder,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            status: StatusFilter::All,
            sort: Some(DEFAULT_SORT.to_string()),
            order: SortOrder::Asc,
        }
    }
}

impl FilterDefaults {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let defaults: FilterDefaults = toml::from_str(toml_content)?;
        defaults.validate()?;
        Ok(defaults)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::InvalidLimit(self.limit));
        }
        if let Some(sort) = &self.sort {
            if !SORT_RENAMES.iter().any(|(client, _)| *client == sort.as_str()) {
                return Err(ConfigError::UnknownSortKey(sort.clone()));
            }
        }
        Ok(())
    }

    /// A fresh filter state: page 1, these defaults, every other filter empty.
    pub fn initial_state(&self) -> TransactionFilterState {
        TransactionFilterState {
            limit: self.limit,
            status: self.status,
            sort: self.sort.clone(),
            order: Some(self.order),
            ..TransactionFilterState::default()
        }
    }
}
