pub mod error;
pub mod invoice;
pub mod money;
pub mod period;
pub mod status;
pub mod transaction;

pub use error::RecordError;
pub use invoice::{calculate_totals, DiscountKind, DiscountSpec, InvoiceTotals, LineItem};
pub use money::{parse_amount, round2, Money};
pub use period::{local_midnight, local_to_utc, parse_picker_date, to_iso, DayBounds};
pub use status::{classify_status, StatusCounts, TxStatus};
pub use transaction::{project_transactions, BankTransaction, RawAmount, RawRef, RawSplit, RawTransaction};
