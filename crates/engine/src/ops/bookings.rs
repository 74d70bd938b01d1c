use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryOrder, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Booking, BookingCmd, BookingListFilter, EngineError, Money, ResultEngine, bookings,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

/// Totals over a filtered set of bookings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub count: u64,
    pub total_ticket_cost: Money,
    pub total_amount_received: Money,
    pub total_due: Money,
    pub total_profit: Money,
}

impl BookingSummary {
    /// Totals `bookings`; a sum that leaves the `i64` range is an error.
    pub fn tally<'a, I>(bookings: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        bookings.into_iter().try_fold(Self::default(), |acc, booking| {
            Ok(Self {
                count: acc.count + 1,
                total_ticket_cost: acc.total_ticket_cost.try_add(booking.ticket_cost)?,
                total_amount_received: acc
                    .total_amount_received
                    .try_add(booking.amount_received)?,
                total_due: acc.total_due.try_add(booking.due_balance)?,
                total_profit: acc.total_profit.try_add(booking.profit)?,
            })
        })
    }
}

/// Trims free text. Blank reference, route or customer fields are stored
/// as empty strings.
fn normalize_cmd(cmd: BookingCmd) -> BookingCmd {
    BookingCmd {
        reference_number: cmd.reference_number.trim().to_string(),
        customer_name: cmd.customer_name.trim().to_string(),
        departure_place: cmd.departure_place.trim().to_string(),
        destination: cmd.destination.trim().to_string(),
        email: normalize_optional_text(cmd.email.as_deref()),
        phone: normalize_optional_text(cmd.phone.as_deref()),
        departure_date: normalize_optional_text(cmd.departure_date.as_deref()),
        return_date: normalize_optional_text(cmd.return_date.as_deref()),
        agent: cmd.agent.trim().to_string(),
        notes: normalize_optional_text(cmd.notes.as_deref()),
        ..cmd
    }
}

impl Engine {
    /// Create a booking drawing `ticket_cost` from the credit envelope.
    ///
    /// Fails with [`EngineError::InsufficientCredit`] when the cost exceeds
    /// the stored available credit; nothing is written in that case. On
    /// success the envelope is re-derived from all bookings.
    pub async fn create_booking(&self, cmd: BookingCmd) -> ResultEngine<Booking> {
        let cmd = normalize_cmd(cmd);
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| {
            let envelope = self.stored_envelope(&db_tx).await?;
            if let Err(err) = envelope.check_availability(cmd.ticket_cost) {
                tracing::warn!(
                    reference = %cmd.reference_number,
                    requested = %cmd.ticket_cost,
                    available = %envelope.available_credit,
                    "booking rejected: insufficient credit"
                );
                return Err(err);
            }

            let booking = Booking::new(cmd, Utc::now())?;
            bookings::ActiveModel::from(&booking).insert(&db_tx).await?;
            let envelope = self.refresh_envelope(&db_tx).await?;

            tracing::info!(
                booking_id = %booking.id,
                reference = %booking.reference_number,
                ticket_cost = %booking.ticket_cost,
                available_credit = %envelope.available_credit,
                "booking created"
            );
            Ok(booking)
        })
    }

    /// Replace every field of an existing booking.
    ///
    /// Only a cost increase is checked against the available credit; the
    /// delta is `new cost - old cost`.
    pub async fn update_booking(&self, booking_id: Uuid, cmd: BookingCmd) -> ResultEngine<Booking> {
        let cmd = normalize_cmd(cmd);
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| {
            let current = Self::require_booking(&db_tx, booking_id).await?;

            let delta = cmd.ticket_cost.try_sub(current.ticket_cost)?;
            let envelope = self.stored_envelope(&db_tx).await?;
            if let Err(err) = envelope.check_availability(delta) {
                tracing::warn!(
                    booking_id = %booking_id,
                    requested = %delta,
                    available = %envelope.available_credit,
                    "booking update rejected: insufficient credit"
                );
                return Err(err);
            }

            let booking = current.replaced(cmd, Utc::now())?;
            bookings::ActiveModel::from(&booking).update(&db_tx).await?;
            self.refresh_envelope(&db_tx).await?;

            tracing::info!(
                booking_id = %booking.id,
                ticket_cost = %booking.ticket_cost,
                delta = %delta,
                "booking updated"
            );
            Ok(booking)
        })
    }

    /// Delete a booking and release its ticket cost back to the envelope.
    pub async fn delete_booking(&self, booking_id: Uuid) -> ResultEngine<()> {
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| {
            let result = bookings::Entity::delete_by_id(booking_id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("booking not exists".to_string()));
            }
            let envelope = self.refresh_envelope(&db_tx).await?;

            tracing::info!(
                booking_id = %booking_id,
                available_credit = %envelope.available_credit,
                "booking deleted"
            );
            Ok(())
        })
    }

    pub async fn booking(&self, booking_id: Uuid) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| Self::require_booking(&db_tx, booking_id).await)
    }

    /// List bookings matching `filter`, newest first.
    pub async fn list_bookings(&self, filter: &BookingListFilter) -> ResultEngine<Vec<Booking>> {
        with_tx!(self, |db_tx| {
            let models = bookings::Entity::find()
                .order_by_desc(bookings::Column::CreatedAt)
                .order_by_desc(bookings::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                let booking = Booking::try_from(model)?;
                if matches_filter(&booking, filter) {
                    out.push(booking);
                }
            }
            Ok(out)
        })
    }

    pub async fn booking_summary(&self, filter: &BookingListFilter) -> ResultEngine<BookingSummary> {
        let bookings = self.list_bookings(filter).await?;
        BookingSummary::tally(&bookings)
    }

    async fn require_booking(
        db_tx: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<Booking> {
        let model = bookings::Entity::find_by_id(booking_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))?;
        Booking::try_from(model)
    }
}

fn matches_filter(booking: &Booking, filter: &BookingListFilter) -> bool {
    let search_ok = filter
        .search
        .as_deref()
        .is_none_or(|search| booking.matches_search(search));
    let status_ok = filter
        .payment_status
        .is_none_or(|status| booking.payment_status == status);
    let agent_ok = match filter.agent.as_deref().map(str::trim) {
        Some(agent) if !agent.is_empty() => booking.agent == agent,
        _ => true,
    };
    search_ok && status_ok && agent_ok
}
