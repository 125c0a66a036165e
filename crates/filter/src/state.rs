use ledgerdesk_core::TxStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status picker value; `All` disables status filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Posted,
    Voided,
    Reversed,
}

impl StatusFilter {
    pub fn status(self) -> Option<TxStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(TxStatus::Pending),
            StatusFilter::Posted => Some(TxStatus::Posted),
            StatusFilter::Voided => Some(TxStatus::Voided),
            StatusFilter::Reversed => Some(TxStatus::Reversed),
        }
    }
}

impl From<TxStatus> for StatusFilter {
    fn from(status: TxStatus) -> Self {
        match status {
            TxStatus::Pending => StatusFilter::Pending,
            TxStatus::Posted => StatusFilter::Posted,
            TxStatus::Voided => StatusFilter::Voided,
            TxStatus::Reversed => StatusFilter::Reversed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => write!(f, "{status}"),
            None => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<TxStatus>().map(StatusFilter::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order: '{other}'")),
        }
    }
}

/// Everything the transaction list can be filtered, paged and sorted by.
///
/// Dates are `YYYY-MM-DD` picker values and amounts are raw text box
/// contents; both are interpreted only when compiled into API parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionFilterState {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub status: StatusFilter,
    pub account_id: Option<String>,
    pub supplier_id: Option<String>,
    pub category_id: Option<String>,
    pub tax_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_SORT: &str = "date";

impl Default for TransactionFilterState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            status: StatusFilter::All,
            account_id: None,
            supplier_id: None,
            category_id: None,
            tax_id: None,
            start_date: None,
            end_date: None,
            min_amount: None,
            max_amount: None,
            sort: Some(DEFAULT_SORT.to_string()),
            order: Some(SortOrder::Asc),
        }
    }
}
