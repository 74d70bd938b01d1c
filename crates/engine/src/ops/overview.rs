use sea_orm::{TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{Booking, CreditEnvelope, Customer, Money, ResultEngine, bookings, customers};

use super::{BookingSummary, Engine, with_tx};

/// Aggregates over every customer ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CustomerOverview {
    pub count: u64,
    pub total_credit: Money,
    pub total_debit: Money,
    pub balance: Money,
}

impl CustomerOverview {
    pub fn tally<'a, I>(customers: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = &'a Customer>,
    {
        customers.into_iter().try_fold(Self::default(), |acc, customer| {
            Ok(Self {
                count: acc.count + 1,
                total_credit: acc.total_credit.try_add(customer.total_credit)?,
                total_debit: acc.total_debit.try_add(customer.total_debit)?,
                balance: acc.balance.try_add(customer.balance)?,
            })
        })
    }
}

/// Dashboard snapshot of both ledgers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerOverview {
    pub bookings: BookingSummary,
    pub customers: CustomerOverview,
    pub envelope: CreditEnvelope,
}

impl Engine {
    /// Booking totals, customer totals and the refreshed credit envelope, read
    /// in one database transaction.
    pub async fn ledger_overview(&self) -> ResultEngine<LedgerOverview> {
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| {
            let envelope = self.refresh_envelope(&db_tx).await?;

            let mut booking_list = Vec::new();
            for model in bookings::Entity::find().all(&db_tx).await? {
                booking_list.push(Booking::try_from(model)?);
            }
            let customer_list: Vec<Customer> = customers::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Customer::from)
                .collect();

            Ok(LedgerOverview {
                bookings: BookingSummary::tally(&booking_list)?,
                customers: CustomerOverview::tally(&customer_list)?,
                envelope,
            })
        })
    }
}
