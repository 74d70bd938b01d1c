//! Ledgerbook engine.
//!
//! Two independent ledgers share one pattern: mutate a leaf record, then
//! re-derive the aggregate that depends on it.
//!
//! - **Booking ledger**: every [`Booking`] draws its ticket cost from the
//!   global [`CreditEnvelope`]. A booking that would consume more than the
//!   available credit is rejected before anything is written; after every
//!   accepted create/update/delete the envelope is recomputed from all
//!   bookings.
//! - **Customer ledger**: every [`MoneyTransaction`] belongs to a
//!   [`Customer`]. After any add/edit/remove the owner's running balances and
//!   cached totals are recomputed from its full history (see
//!   [`derive_ledger`]).
//!
//! All operations live on [`Engine`] and run inside a single database
//! transaction.

pub use bookings::{Booking, PaymentStatus};
pub use commands::{
    BookingCmd, BookingListFilter, CreditTotalCmd, CustomerCmd, TransactionCmd,
    TransactionListFilter, TransactionUpdateCmd,
};
pub use credit_envelope::{CreditEnvelope, DEFAULT_TOTAL_CREDIT};
pub use customers::Customer;
pub use error::EngineError;
pub use ledger::{DerivedLedger, LedgerEntry, LedgerTotals, TransactionEvent, derive_ledger};
pub use money::Money;
pub use ops::{BookingSummary, CustomerOverview, Engine, EngineBuilder, LedgerOverview};
pub use transactions::{MoneyTransaction, TransactionStatus};

pub mod bookings;
mod commands;
pub mod credit_envelope;
pub mod customers;
mod error;
mod ledger;
mod money;
mod ops;
pub mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
