//! Money transactions of the customer ledger.
//!
//! A `MoneyTransaction` belongs to exactly one customer through `customer_id`.
//! `customer_name` is a display copy only. `balance` is the running balance of
//! the owner's ledger after this entry and is written by the ledger
//! re-derivation, never by callers.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, ledger::LedgerEntry};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidStatus(format!(
                "unknown transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyTransaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub date: String,
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    pub balance: Money,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoneyTransaction {
    pub fn ledger_entry(&self) -> LedgerEntry {
        LedgerEntry {
            id: self.id,
            date: self.date.clone(),
            created_at: self.created_at,
            debit: self.debit,
            credit: self.credit,
        }
    }
}

/// Description used when the caller gives none: the notes, or a label based
/// on the side of the ledger the entry hits.
pub fn default_description(notes: Option<&str>, debit: Money) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => notes.to_string(),
        None if debit.is_positive() => "Debit transaction".to_string(),
        None => "Credit transaction".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "money_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub date: String,
    pub description: String,
    pub debit: i64,
    pub credit: i64,
    pub balance: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MoneyTransaction> for ActiveModel {
    fn from(value: &MoneyTransaction) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            customer_id: ActiveValue::Set(value.customer_id),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            date: ActiveValue::Set(value.date.clone()),
            description: ActiveValue::Set(value.description.clone()),
            debit: ActiveValue::Set(value.debit.minor()),
            credit: ActiveValue::Set(value.credit.minor()),
            balance: ActiveValue::Set(value.balance.minor()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            notes: ActiveValue::Set(value.notes.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for MoneyTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            status: TransactionStatus::try_from(model.status.as_str())?,
            customer_id: model.customer_id,
            customer_name: model.customer_name,
            date: model.date,
            description: model.description,
            debit: Money::new(model.debit),
            credit: Money::new(model.credit),
            balance: Money::new(model.balance),
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
