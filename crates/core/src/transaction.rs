use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::RecordError;
use super::money::parse_amount;
use super::status::{classify_status, TxStatus};

/// Identifiers usually arrive as strings; some endpoints send bare integers.
/// Anything else (booleans, objects) reads as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Other(IgnoredAny),
}

impl RawId {
    fn into_string(self) -> Option<String> {
        match self {
            RawId::Text(s) => Some(s),
            RawId::Signed(n) => Some(n.to_string()),
            RawId::Unsigned(n) => Some(n.to_string()),
            RawId::Other(_) => None,
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.and_then(RawId::into_string))
}

fn lenient_ids<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Option<String>>>, D::Error> {
    let ids = Option::<Vec<RawId>>::deserialize(deserializer)?;
    Ok(ids.map(|ids| ids.into_iter().map(RawId::into_string).collect()))
}

/// A `{ id, name }` reference as nested by the API (contact, category, account).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRef {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Amounts arrive as decimal strings, occasionally as bare JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            RawAmount::Number(n) => Some(*n).filter(|v| v.is_finite()),
            RawAmount::Text(s) => parse_amount(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSplit {
    pub amount: Option<RawAmount>,
    pub contact: Option<RawRef>,
    #[serde(deserialize_with = "lenient_id")]
    pub contact_id: Option<String>,
    pub category: Option<RawRef>,
    #[serde(deserialize_with = "lenient_id")]
    pub category_id: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    pub tax_id: Option<String>,
    #[serde(deserialize_with = "lenient_ids")]
    pub tax_ids: Option<Vec<Option<String>>>,
}

/// A transaction record exactly as the API returns it. Every field is
/// optional; the same fact may live in several places depending on which
/// endpoint produced the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTransaction {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub date: Option<String>,
    pub paid_at: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub amount: Option<RawAmount>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub reconciled: Option<bool>,
    pub contact: Option<RawRef>,
    #[serde(deserialize_with = "lenient_id")]
    pub contact_id: Option<String>,
    pub contact_name: Option<String>,
    pub category: Option<RawRef>,
    #[serde(deserialize_with = "lenient_id")]
    pub category_id: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    pub tax_id: Option<String>,
    #[serde(deserialize_with = "lenient_ids")]
    pub tax_ids: Option<Vec<Option<String>>>,
    pub tax_amount: Option<RawAmount>,
    pub tax_rate: Option<RawAmount>,
    pub account: Option<RawRef>,
    #[serde(deserialize_with = "lenient_id")]
    pub account_id: Option<String>,
    pub splits: Option<Vec<RawSplit>>,
    pub matched: Option<bool>,
    pub matched_receipt_docs: Option<Vec<String>>,
}

impl RawTransaction {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Accepts either a bare array or a `{ "data": [...] }` envelope.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, RecordError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Listing {
            Bare(Vec<RawTransaction>),
            Envelope { data: Vec<RawTransaction> },
        }

        match serde_json::from_str(json)? {
            Listing::Bare(list) | Listing::Envelope { data: list } => Ok(list),
        }
    }

    pub fn first_split(&self) -> Option<&RawSplit> {
        self.splits.as_ref()?.first()
    }

    pub fn status(&self) -> TxStatus {
        classify_status(Some(self))
    }
}

/// Flattened row for the bank transactions table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub id: String,
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_receipt_docs: Option<Vec<String>>,
    pub status: TxStatus,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

// ── Fallback chains ──────────────────────────────────────────────────────────

type Accessor = fn(&RawTransaction) -> Option<&str>;

fn first_present(tx: &RawTransaction, chain: &[Accessor]) -> Option<String> {
    chain
        .iter()
        .filter_map(|get| get(tx))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_listed(ids: Option<&Vec<Option<String>>>) -> Option<&str> {
    ids?.iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.trim().is_empty())
}

fn nested_contact_name(tx: &RawTransaction) -> Option<&str> {
    tx.contact.as_ref()?.name.as_deref()
}
fn flat_contact_name(tx: &RawTransaction) -> Option<&str> {
    tx.contact_name.as_deref()
}
fn split_contact_name(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.contact.as_ref()?.name.as_deref()
}

fn nested_contact_id(tx: &RawTransaction) -> Option<&str> {
    tx.contact.as_ref()?.id.as_deref()
}
fn flat_contact_id(tx: &RawTransaction) -> Option<&str> {
    tx.contact_id.as_deref()
}
fn split_contact_id(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.contact_id.as_deref()
}
fn split_nested_contact_id(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.contact.as_ref()?.id.as_deref()
}

fn nested_category_id(tx: &RawTransaction) -> Option<&str> {
    tx.category.as_ref()?.id.as_deref()
}
fn flat_category_id(tx: &RawTransaction) -> Option<&str> {
    tx.category_id.as_deref()
}
fn split_category_id(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.category_id.as_deref()
}
fn split_nested_category_id(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.category.as_ref()?.id.as_deref()
}

fn flat_tax_id(tx: &RawTransaction) -> Option<&str> {
    tx.tax_id.as_deref()
}
fn split_tax_id(tx: &RawTransaction) -> Option<&str> {
    tx.first_split()?.tax_id.as_deref()
}
fn listed_tax_id(tx: &RawTransaction) -> Option<&str> {
    first_listed(tx.tax_ids.as_ref())
}
fn split_listed_tax_id(tx: &RawTransaction) -> Option<&str> {
    first_listed(tx.first_split()?.tax_ids.as_ref())
}

fn nested_account_name(tx: &RawTransaction) -> Option<&str> {
    tx.account.as_ref()?.name.as_deref()
}
fn nested_account_id(tx: &RawTransaction) -> Option<&str> {
    tx.account.as_ref()?.id.as_deref()
}
fn flat_account_id(tx: &RawTransaction) -> Option<&str> {
    tx.account_id.as_deref()
}

fn raw_date(tx: &RawTransaction) -> Option<&str> {
    tx.date.as_deref()
}
fn raw_paid_at(tx: &RawTransaction) -> Option<&str> {
    tx.paid_at.as_deref()
}
fn raw_description(tx: &RawTransaction) -> Option<&str> {
    tx.description.as_deref()
}
fn raw_reference(tx: &RawTransaction) -> Option<&str> {
    tx.reference.as_deref()
}

const FROM_TO: [Accessor; 3] = [nested_contact_name, flat_contact_name, split_contact_name];
const CONTACT_ID: [Accessor; 4] = [
    nested_contact_id,
    flat_contact_id,
    split_contact_id,
    split_nested_contact_id,
];
const CATEGORY_ID: [Accessor; 4] = [
    nested_category_id,
    flat_category_id,
    split_category_id,
    split_nested_category_id,
];
const TAX_ID: [Accessor; 4] = [flat_tax_id, split_tax_id, listed_tax_id, split_listed_tax_id];
const ACCOUNT_NAME: [Accessor; 1] = [nested_account_name];
const ACCOUNT_ID: [Accessor; 2] = [nested_account_id, flat_account_id];
const DATE: [Accessor; 2] = [raw_date, raw_paid_at];
const DESCRIPTION: [Accessor; 2] = [raw_description, raw_reference];

// ── Projection ───────────────────────────────────────────────────────────────

impl BankTransaction {
    /// Projects a raw record. Absent data leaves the matching field `None`;
    /// this never fails.
    pub fn from_raw(tx: &RawTransaction) -> Self {
        let amount = tx.amount.as_ref().and_then(RawAmount::to_f64);
        let (spent, received) = match tx.kind.as_deref() {
            Some("income") => (None, amount),
            // Expense and unknown types both land in `spent` so the amount is never dropped.
            _ => (amount, None),
        };

        BankTransaction {
            id: tx.id.clone().unwrap_or_default(),
            date: first_present(tx, &DATE).unwrap_or_default(),
            description: first_present(tx, &DESCRIPTION).unwrap_or_default(),
            spent,
            received,
            tax: tx.tax_amount.as_ref().and_then(RawAmount::to_f64),
            tax_id: first_present(tx, &TAX_ID),
            tax_rate: tx.tax_rate.as_ref().and_then(RawAmount::to_f64),
            from_to: first_present(tx, &FROM_TO),
            contact_id: first_present(tx, &CONTACT_ID),
            category: first_present(tx, &CATEGORY_ID),
            matched: tx.matched,
            matched_receipt_docs: tx.matched_receipt_docs.clone(),
            status: tx.status(),
            account: first_present(tx, &ACCOUNT_NAME).unwrap_or_default(),
            account_id: first_present(tx, &ACCOUNT_ID),
        }
    }
}

pub fn project_transactions(records: &[RawTransaction]) -> Vec<BankTransaction> {
    records.iter().map(BankTransaction::from_raw).collect()
}
