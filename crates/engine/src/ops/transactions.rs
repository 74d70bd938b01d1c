use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Customer, EngineError, Money, MoneyTransaction, ResultEngine, TransactionCmd, TransactionListFilter,
    TransactionUpdateCmd, customers,
    ledger::{TransactionEvent, derive_ledger},
    transactions::{self, default_description},
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a ledger entry for the customer named in `cmd`.
    ///
    /// The customer is resolved case-insensitively and created when unknown.
    /// The stored `customer_name` is the customer's canonical name. The whole
    /// ledger of the owner is re-derived before returning.
    pub async fn create_transaction(&self, cmd: TransactionCmd) -> ResultEngine<MoneyTransaction> {
        let customer_name = normalize_required_name(&cmd.customer_name, "customer")?;
        let notes = normalize_optional_text(cmd.notes.as_deref());
        let description = normalize_optional_text(cmd.description.as_deref())
            .unwrap_or_else(|| default_description(notes.as_deref(), cmd.debit));
        with_tx!(self, |db_tx| {
            let customer = Self::resolve_customer(&db_tx, &customer_name).await?;
            let now = Utc::now();
            let tx = MoneyTransaction {
                id: Uuid::new_v4(),
                customer_id: customer.id,
                customer_name: customer.name.clone(),
                date: cmd.date.trim().to_string(),
                description,
                debit: cmd.debit,
                credit: cmd.credit,
                balance: Money::ZERO,
                status: cmd.status,
                notes,
                created_at: now,
                updated_at: now,
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            Self::apply_transaction_mutation(&db_tx, TransactionEvent::Created, tx.id, customer.id)
                .await?;
            Self::require_transaction(&db_tx, tx.id).await
        })
    }

    /// Replace the editable fields of a transaction and re-derive its owner.
    ///
    /// A blank description falls back to the same default as on creation.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        cmd: TransactionUpdateCmd,
    ) -> ResultEngine<MoneyTransaction> {
        let notes = normalize_optional_text(cmd.notes.as_deref());
        let description = normalize_optional_text(Some(&cmd.description))
            .unwrap_or_else(|| default_description(notes.as_deref(), cmd.debit));
        with_tx!(self, |db_tx| {
            let current = Self::require_transaction(&db_tx, transaction_id).await?;

            transactions::ActiveModel {
                id: ActiveValue::Set(current.id),
                date: ActiveValue::Set(cmd.date.trim().to_string()),
                description: ActiveValue::Set(description),
                debit: ActiveValue::Set(cmd.debit.minor()),
                credit: ActiveValue::Set(cmd.credit.minor()),
                status: ActiveValue::Set(cmd.status.as_str().to_string()),
                notes: ActiveValue::Set(notes),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Self::apply_transaction_mutation(
                &db_tx,
                TransactionEvent::Updated,
                current.id,
                current.customer_id,
            )
            .await?;
            Self::require_transaction(&db_tx, current.id).await
        })
    }

    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let current = Self::require_transaction(&db_tx, transaction_id).await?;
            transactions::Entity::delete_by_id(current.id)
                .exec(&db_tx)
                .await?;

            Self::apply_transaction_mutation(
                &db_tx,
                TransactionEvent::Deleted,
                current.id,
                current.customer_id,
            )
            .await?;
            Ok(())
        })
    }

    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<MoneyTransaction> {
        with_tx!(self, |db_tx| Self::require_transaction(&db_tx, transaction_id).await)
    }

    /// List transactions newest first (date desc, then creation desc).
    ///
    /// `customer_id` selects one ledger; otherwise `customer_name` filters by
    /// a case-insensitive substring of the stored display name.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<MoneyTransaction>> {
        let name_needle = filter
            .customer_name
            .as_deref()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty());
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find();
            if let Some(customer_id) = filter.customer_id {
                query = query.filter(transactions::Column::CustomerId.eq(customer_id));
            }
            let models = query
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            // The id filter wins over the name filter.
            let name_needle = name_needle.filter(|_| filter.customer_id.is_none());
            let mut out = Vec::with_capacity(models.len());
            for model in models {
                let name_matches = name_needle
                    .as_deref()
                    .is_none_or(|needle| model.customer_name.to_lowercase().contains(needle));
                if name_matches {
                    out.push(MoneyTransaction::try_from(model)?);
                }
            }
            Ok(out)
        })
    }

    /// Re-derive every running balance and the cached totals of one customer
    /// from its full transaction history.
    ///
    /// Idempotent: running it twice without intervening changes writes the
    /// same values.
    pub async fn recompute_customer_ledger(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| Self::rederive_customer(&db_tx, customer_id).await)
    }

    /// Hook run after any leaf change of a customer's ledger. Always a full
    /// re-derivation.
    async fn apply_transaction_mutation(
        db_tx: &DatabaseTransaction,
        event: TransactionEvent,
        transaction_id: Uuid,
        customer_id: Uuid,
    ) -> ResultEngine<Customer> {
        let customer = Self::rederive_customer(db_tx, customer_id).await?;
        tracing::info!(
            event = event.as_str(),
            transaction_id = %transaction_id,
            customer_id = %customer.id,
            balance = %customer.balance,
            "money transaction applied"
        );
        Ok(customer)
    }

    async fn rederive_customer(
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<Customer> {
        let mut customer = Self::require_customer(db_tx, customer_id).await?;

        let models = transactions::Entity::find()
            .filter(transactions::Column::CustomerId.eq(customer_id))
            .all(db_tx)
            .await?;
        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            entries.push(MoneyTransaction::try_from(model)?.ledger_entry());
        }

        let derived = derive_ledger(entries)?;
        for (transaction_id, balance) in &derived.balances {
            transactions::ActiveModel {
                id: ActiveValue::Set(*transaction_id),
                balance: ActiveValue::Set(balance.minor()),
                ..Default::default()
            }
            .update(db_tx)
            .await?;
        }

        customer.total_credit = derived.totals.total_credit;
        customer.total_debit = derived.totals.total_debit;
        customer.balance = derived.totals.balance;
        customer.updated_at = Utc::now();
        customers::ActiveModel {
            id: ActiveValue::Set(customer.id),
            total_credit: ActiveValue::Set(customer.total_credit.minor()),
            total_debit: ActiveValue::Set(customer.total_debit.minor()),
            balance: ActiveValue::Set(customer.balance.minor()),
            updated_at: ActiveValue::Set(customer.updated_at),
            ..Default::default()
        }
        .update(db_tx)
        .await?;

        tracing::debug!(
            customer_id = %customer.id,
            entries = derived.balances.len(),
            balance = %customer.balance,
            "customer ledger re-derived"
        );
        Ok(customer)
    }

    async fn require_transaction(
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<MoneyTransaction> {
        let model = transactions::Entity::find_by_id(transaction_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        MoneyTransaction::try_from(model)
    }
}
