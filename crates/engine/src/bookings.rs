//! Air-travel bookings.
//!
//! A [`Booking`] is a leaf record of the booking ledger. Its ticket cost is the
//! amount drawn from the global credit envelope, while `due_balance` and
//! `profit` are derived from `ticket_cost` and `amount_received` every time
//! either of them changes:
//!
//! - `due_balance = ticket_cost - amount_received`
//! - `profit = amount_received - ticket_cost` (always `-due_balance`)

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BookingCmd, EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Unpaid => "Unpaid",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(EngineError::InvalidStatus(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub reference_number: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub departure_place: String,
    pub destination: String,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub short_description: String,
    pub full_description: String,
    pub ticket_cost: Money,
    pub amount_received: Money,
    pub due_balance: Money,
    pub profit: Money,
    pub agent: String,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(cmd: BookingCmd, now: DateTime<Utc>) -> ResultEngine<Self> {
        Self::from_cmd(Uuid::new_v4(), cmd, now, now)
    }

    /// Replaces the whole field set of an existing booking, keeping identity
    /// and creation time.
    pub fn replaced(&self, cmd: BookingCmd, now: DateTime<Utc>) -> ResultEngine<Self> {
        Self::from_cmd(self.id, cmd, self.created_at, now)
    }

    fn from_cmd(
        id: Uuid,
        cmd: BookingCmd,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let (due_balance, profit) = settle(cmd.ticket_cost, cmd.amount_received)?;
        let short_description =
            short_description(&cmd.customer_name, &cmd.departure_place, &cmd.destination);
        let full_description = full_description(
            &cmd.customer_name,
            &cmd.departure_place,
            &cmd.destination,
            cmd.departure_date.as_deref(),
            cmd.return_date.as_deref(),
        );

        Ok(Self {
            id,
            reference_number: cmd.reference_number,
            customer_name: cmd.customer_name,
            email: cmd.email,
            phone: cmd.phone,
            departure_place: cmd.departure_place,
            destination: cmd.destination,
            departure_date: cmd.departure_date,
            return_date: cmd.return_date,
            short_description,
            full_description,
            ticket_cost: cmd.ticket_cost,
            amount_received: cmd.amount_received,
            due_balance,
            profit,
            agent: cmd.agent,
            payment_status: cmd.payment_status,
            notes: cmd.notes,
            created_at,
            updated_at,
        })
    }

    /// Case-insensitive substring match over the fields the booking list
    /// searches.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.short_description,
            &self.reference_number,
            &self.customer_name,
            &self.agent,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Returns `(due_balance, profit)` for a ticket cost and the amount received.
pub fn settle(ticket_cost: Money, amount_received: Money) -> ResultEngine<(Money, Money)> {
    Ok((
        ticket_cost.try_sub(amount_received)?,
        amount_received.try_sub(ticket_cost)?,
    ))
}

pub fn short_description(customer_name: &str, departure_place: &str, destination: &str) -> String {
    format!("{customer_name} - {departure_place} → {destination}")
}

pub fn full_description(
    customer_name: &str,
    departure_place: &str,
    destination: &str,
    departure_date: Option<&str>,
    return_date: Option<&str>,
) -> String {
    let return_date = return_date.filter(|d| !d.trim().is_empty());
    let trip = if return_date.is_some() {
        "Round Trip"
    } else {
        "One Way"
    };
    let return_line = return_date
        .map(|d| format!("Return: {d}\n"))
        .unwrap_or_default();

    format!(
        "{customer_name} - {trip} Flight\n{departure_place} → {destination}\nDeparture: {}\n{return_line}Passengers: 1 Adult\nClass: Economy",
        departure_date.unwrap_or_default()
    )
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "air_bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reference_number: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub departure_place: String,
    pub destination: String,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub short_description: String,
    pub full_description: String,
    pub ticket_cost: i64,
    pub amount_received: i64,
    pub due_balance: i64,
    pub profit: i64,
    pub agent: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(value: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            reference_number: ActiveValue::Set(value.reference_number.clone()),
            customer_name: ActiveValue::Set(value.customer_name.clone()),
            email: ActiveValue::Set(value.email.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            departure_place: ActiveValue::Set(value.departure_place.clone()),
            destination: ActiveValue::Set(value.destination.clone()),
            departure_date: ActiveValue::Set(value.departure_date.clone()),
            return_date: ActiveValue::Set(value.return_date.clone()),
            short_description: ActiveValue::Set(value.short_description.clone()),
            full_description: ActiveValue::Set(value.full_description.clone()),
            ticket_cost: ActiveValue::Set(value.ticket_cost.minor()),
            amount_received: ActiveValue::Set(value.amount_received.minor()),
            due_balance: ActiveValue::Set(value.due_balance.minor()),
            profit: ActiveValue::Set(value.profit.minor()),
            agent: ActiveValue::Set(value.agent.clone()),
            payment_status: ActiveValue::Set(value.payment_status.as_str().to_string()),
            notes: ActiveValue::Set(value.notes.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            reference_number: model.reference_number,
            customer_name: model.customer_name,
            email: model.email,
            phone: model.phone,
            departure_place: model.departure_place,
            destination: model.destination,
            departure_date: model.departure_date,
            return_date: model.return_date,
            short_description: model.short_description,
            full_description: model.full_description,
            ticket_cost: Money::new(model.ticket_cost),
            amount_received: Money::new(model.amount_received),
            due_balance: Money::new(model.due_balance),
            profit: Money::new(model.profit),
            agent: model.agent,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
