use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Customer, CustomerCmd, EngineError, ResultEngine, customers, transactions,
    util::{name_key, normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a customer with zero totals.
    ///
    /// Names are not unique: two customers may share one.
    pub async fn create_customer(&self, cmd: CustomerCmd) -> ResultEngine<Customer> {
        let name = normalize_required_name(&cmd.name, "customer")?;
        with_tx!(self, |db_tx| {
            let customer = Customer::new(
                name,
                normalize_optional_text(cmd.email.as_deref()),
                normalize_optional_text(cmd.phone.as_deref()),
                Utc::now(),
            );
            customers::ActiveModel::from(&customer).insert(&db_tx).await?;
            tracing::info!(customer_id = %customer.id, name = %customer.name, "customer created");
            Ok(customer)
        })
    }

    /// Update name and contact fields. Totals stay derived.
    ///
    /// A rename also refreshes the display name stored on the customer's
    /// transactions.
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        cmd: CustomerCmd,
    ) -> ResultEngine<Customer> {
        let name = normalize_required_name(&cmd.name, "customer")?;
        with_tx!(self, |db_tx| {
            let mut customer = Self::require_customer(&db_tx, customer_id).await?;
            let renamed = customer.name != name;

            customer.name = name;
            customer.email = normalize_optional_text(cmd.email.as_deref());
            customer.phone = normalize_optional_text(cmd.phone.as_deref());
            customer.updated_at = Utc::now();

            customers::ActiveModel {
                id: ActiveValue::Set(customer.id),
                name: ActiveValue::Set(customer.name.clone()),
                name_norm: ActiveValue::Set(name_key(&customer.name)),
                email: ActiveValue::Set(customer.email.clone()),
                phone: ActiveValue::Set(customer.phone.clone()),
                updated_at: ActiveValue::Set(customer.updated_at),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            if renamed {
                transactions::Entity::update_many()
                    .col_expr(
                        transactions::Column::CustomerName,
                        Expr::value(customer.name.clone()),
                    )
                    .filter(transactions::Column::CustomerId.eq(customer.id))
                    .exec(&db_tx)
                    .await?;
            }

            tracing::info!(customer_id = %customer.id, renamed, "customer updated");
            Ok(customer)
        })
    }

    /// Delete a customer together with its transactions.
    ///
    /// Rejected with [`EngineError::BusinessRule`] while the customer has any
    /// credit or debit recorded.
    pub async fn delete_customer(&self, customer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let customer = Self::require_customer(&db_tx, customer_id).await?;
            if customer.has_activity() {
                tracing::warn!(
                    customer_id = %customer.id,
                    total_credit = %customer.total_credit,
                    total_debit = %customer.total_debit,
                    "customer delete rejected: existing transactions"
                );
                return Err(EngineError::BusinessRule(
                    "cannot delete customer with existing transactions".to_string(),
                ));
            }

            transactions::Entity::delete_many()
                .filter(transactions::Column::CustomerId.eq(customer.id))
                .exec(&db_tx)
                .await?;
            customers::Entity::delete_by_id(customer.id)
                .exec(&db_tx)
                .await?;

            tracing::info!(customer_id = %customer.id, "customer deleted");
            Ok(())
        })
    }

    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| Self::require_customer(&db_tx, customer_id).await)
    }

    /// List customers ordered by name, optionally filtered by a
    /// case-insensitive name substring.
    pub async fn list_customers(&self, search: Option<&str>) -> ResultEngine<Vec<Customer>> {
        let needle = search.map(name_key).filter(|s| !s.is_empty());
        with_tx!(self, |db_tx| {
            let models = customers::Entity::find()
                .order_by_asc(customers::Column::NameNorm)
                .order_by_asc(customers::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            Ok(models
                .into_iter()
                .filter(|model| {
                    needle
                        .as_deref()
                        .is_none_or(|needle| model.name_norm.contains(needle))
                })
                .map(Customer::from)
                .collect())
        })
    }

    /// Resolve `name` to a customer (case-insensitive, first created wins),
    /// creating one with zero totals when none matches.
    pub async fn find_or_create_customer(&self, name: &str) -> ResultEngine<Customer> {
        let name = normalize_required_name(name, "customer")?;
        with_tx!(self, |db_tx| Self::resolve_customer(&db_tx, &name).await)
    }

    pub(super) async fn resolve_customer(
        db_tx: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<Customer> {
        let existing = customers::Entity::find()
            .filter(customers::Column::NameNorm.eq(name_key(name)))
            .order_by_asc(customers::Column::CreatedAt)
            .order_by_asc(customers::Column::Id)
            .one(db_tx)
            .await?;
        if let Some(model) = existing {
            return Ok(model.into());
        }

        let customer = Customer::new(name.to_string(), None, None, Utc::now());
        customers::ActiveModel::from(&customer).insert(db_tx).await?;
        tracing::info!(customer_id = %customer.id, name = %customer.name, "customer created");
        Ok(customer)
    }

    pub(super) async fn require_customer(
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<Customer> {
        let model = customers::Entity::find_by_id(customer_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))?;
        Ok(model.into())
    }
}
