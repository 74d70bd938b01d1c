//! Ledger customers.
//!
//! A customer owns its money transactions and caches three aggregates derived
//! from them (`total_credit`, `total_debit`, `balance`). The caches are only
//! ever written by the ledger re-derivation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, util::name_key};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_credit: Money,
    pub total_debit: Money,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            total_credit: Money::ZERO,
            total_debit: Money::ZERO,
            balance: Money::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// A customer with any credit or debit recorded counts as having
    /// transactions and cannot be deleted.
    pub fn has_activity(&self) -> bool {
        self.total_credit.is_positive() || self.total_debit.is_positive()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Lookup key for case-insensitive name resolution (not unique).
    pub name_norm: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_credit: i64,
    pub total_debit: i64,
    pub balance: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(value: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::Set(name_key(&value.name)),
            email: ActiveValue::Set(value.email.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            total_credit: ActiveValue::Set(value.total_credit.minor()),
            total_debit: ActiveValue::Set(value.total_debit.minor()),
            balance: ActiveValue::Set(value.balance.minor()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            total_credit: Money::new(model.total_credit),
            total_debit: Money::new(model.total_debit),
            balance: Money::new(model.balance),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn activity_requires_positive_totals() {
        let mut customer = Customer::new(
            "Sarah".to_string(),
            None,
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert!(!customer.has_activity());

        customer.total_debit = Money::from_major(30);
        assert!(customer.has_activity());

        customer.total_debit = Money::ZERO;
        customer.total_credit = Money::new(1);
        assert!(customer.has_activity());
    }

    #[test]
    fn active_model_stores_lookup_key() {
        let customer = Customer::new(
            "  Sarah Khan ".to_string(),
            None,
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        let active = ActiveModel::from(&customer);
        assert_eq!(active.name_norm.unwrap(), "sarah khan");
    }
}
