use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::RawTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Pending,
    Posted,
    Voided,
    Reversed,
}

impl TxStatus {
    pub const ALL: [TxStatus; 4] = [
        TxStatus::Pending,
        TxStatus::Posted,
        TxStatus::Voided,
        TxStatus::Reversed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Posted => "posted",
            TxStatus::Voided => "voided",
            TxStatus::Reversed => "reversed",
        }
    }

    /// Voided and reversed transactions are kept out of the working ledger.
    pub fn is_excluded(self) -> bool {
        matches!(self, TxStatus::Voided | TxStatus::Reversed)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TxStatus::Pending),
            "posted" => Ok(TxStatus::Posted),
            "voided" => Ok(TxStatus::Voided),
            "reversed" => Ok(TxStatus::Reversed),
            other => Err(format!("Unknown transaction status: '{other}'")),
        }
    }
}

/// Derives the display status of a raw record.
///
/// Order: no record → pending; `draft` → pending; a recognised status string
/// is used as-is; anything else falls back to the `reconciled` flag.
pub fn classify_status(record: Option<&RawTransaction>) -> TxStatus {
    let Some(tx) = record else {
        return TxStatus::Pending;
    };

    if let Some(raw) = tx.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if raw.eq_ignore_ascii_case("draft") {
            return TxStatus::Pending;
        }
        match raw.parse::<TxStatus>() {
            Ok(status) => return status,
            Err(e) => tracing::warn!("{e}; falling back to reconciled flag"),
        }
    }

    if tx.reconciled.unwrap_or(false) {
        TxStatus::Posted
    } else {
        TxStatus::Pending
    }
}

/// Per-status tallies for the transaction list tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending_count: usize,
    pub posted_count: usize,
    pub excluded_count: usize,
    pub all_count: usize,
}

impl StatusCounts {
    pub fn tally<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawTransaction>,
    {
        records
            .into_iter()
            .map(|tx| classify_status(Some(tx)))
            .fold(StatusCounts::default(), |mut counts, status| {
                counts.record(status);
                counts
            })
    }

    pub fn record(&mut self, status: TxStatus) {
        match status {
            TxStatus::Pending => self.pending_count += 1,
            TxStatus::Posted => self.posted_count += 1,
            TxStatus::Voided | TxStatus::Reversed => self.excluded_count += 1,
        }
        self.all_count += 1;
    }
}
