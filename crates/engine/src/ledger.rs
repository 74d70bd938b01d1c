//! Running-balance derivation for a customer ledger.
//!
//! The ledger is always re-derived from scratch: entries are ordered by
//! `(date, created_at, id)` and walked once, accumulating
//! `credit - debit`. A change to any entry can move the running balance of
//! every entry after it, so there is no incremental path.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, ResultEngine};

/// Which lifecycle event touched a transaction before re-derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionEvent {
    Created,
    Updated,
    Deleted,
}

impl TransactionEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// The fields of a transaction that take part in the derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Uuid,
    /// Caller-supplied date, compared as a string.
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub debit: Money,
    pub credit: Money,
}

impl LedgerEntry {
    fn chronological(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.created_at.cmp(&other.created_at))
            .then(self.id.cmp(&other.id))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_credit: Money,
    pub total_debit: Money,
    /// Running balance after the last entry.
    pub balance: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedLedger {
    /// `(transaction id, running balance)` in chronological order.
    pub balances: Vec<(Uuid, Money)>,
    pub totals: LedgerTotals,
}

/// Orders `entries` chronologically and computes every running balance plus
/// the customer totals.
///
/// Fails with [`EngineError::InvalidAmount`](crate::EngineError::InvalidAmount)
/// when a running sum leaves the `i64` range.
pub fn derive_ledger(mut entries: Vec<LedgerEntry>) -> ResultEngine<DerivedLedger> {
    entries.sort_by(LedgerEntry::chronological);

    let mut totals = LedgerTotals::default();
    let mut balances = Vec::with_capacity(entries.len());
    for entry in entries {
        totals.balance = totals
            .balance
            .try_add(entry.credit)?
            .try_sub(entry.debit)?;
        totals.total_credit = totals.total_credit.try_add(entry.credit)?;
        totals.total_debit = totals.total_debit.try_add(entry.debit)?;
        balances.push((entry.id, totals.balance));
    }

    Ok(DerivedLedger { balances, totals })
}
