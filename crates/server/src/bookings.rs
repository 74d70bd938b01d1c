//! Air booking endpoints.

use api_types::booking::{
    BookingList, BookingListResponse, BookingSummaryView, BookingUpsert, BookingView,
    PaymentStatus,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Booking, BookingCmd, BookingListFilter, BookingSummary, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn engine_status(status: PaymentStatus) -> engine::PaymentStatus {
    match status {
        PaymentStatus::Paid => engine::PaymentStatus::Paid,
        PaymentStatus::Pending => engine::PaymentStatus::Pending,
        PaymentStatus::Unpaid => engine::PaymentStatus::Unpaid,
    }
}

fn api_status(status: engine::PaymentStatus) -> PaymentStatus {
    match status {
        engine::PaymentStatus::Paid => PaymentStatus::Paid,
        engine::PaymentStatus::Pending => PaymentStatus::Pending,
        engine::PaymentStatus::Unpaid => PaymentStatus::Unpaid,
    }
}

fn amount(value: Option<&str>) -> Money {
    value.map(Money::parse_or_zero).unwrap_or_default()
}

fn command(payload: BookingUpsert) -> BookingCmd {
    BookingCmd {
        ticket_cost: amount(payload.ticket_cost.as_deref()),
        amount_received: amount(payload.amount_received.as_deref()),
        payment_status: engine_status(payload.payment_status.unwrap_or_default()),
        agent: payload.agent.unwrap_or_default(),
        reference_number: payload.reference_number,
        customer_name: payload.customer_name,
        email: payload.email,
        phone: payload.phone,
        departure_place: payload.departure_place,
        destination: payload.destination,
        departure_date: payload.departure_date,
        return_date: payload.return_date,
        notes: payload.notes,
    }
}

fn filter(query: BookingList) -> BookingListFilter {
    BookingListFilter {
        search: query.search,
        payment_status: query.payment_status.map(engine_status),
        agent: query.agent,
    }
}

fn view(booking: Booking) -> BookingView {
    BookingView {
        id: booking.id,
        reference_number: booking.reference_number,
        customer_name: booking.customer_name,
        email: booking.email,
        phone: booking.phone,
        departure_place: booking.departure_place,
        destination: booking.destination,
        departure_date: booking.departure_date,
        return_date: booking.return_date,
        short_description: booking.short_description,
        full_description: booking.full_description,
        ticket_cost_minor: booking.ticket_cost.minor(),
        amount_received_minor: booking.amount_received.minor(),
        due_balance_minor: booking.due_balance.minor(),
        profit_minor: booking.profit.minor(),
        agent: booking.agent,
        payment_status: api_status(booking.payment_status),
        notes: booking.notes,
        created_at: booking.created_at,
        updated_at: booking.updated_at,
    }
}

pub(crate) fn summary_view(summary: BookingSummary) -> BookingSummaryView {
    BookingSummaryView {
        count: summary.count,
        total_ticket_cost_minor: summary.total_ticket_cost.minor(),
        total_amount_received_minor: summary.total_amount_received.minor(),
        total_due_minor: summary.total_due.minor(),
        total_profit_minor: summary.total_profit.minor(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<BookingList>,
) -> Result<Json<BookingListResponse>, ServerError> {
    let bookings = state.engine.list_bookings(&filter(query)).await?;
    Ok(Json(BookingListResponse {
        bookings: bookings.into_iter().map(view).collect(),
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<BookingList>,
) -> Result<Json<BookingSummaryView>, ServerError> {
    let summary = state.engine.booking_summary(&filter(query)).await?;
    Ok(Json(summary_view(summary)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.booking(id).await?;
    Ok(Json(view(booking)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingUpsert>,
) -> Result<(StatusCode, Json<BookingView>), ServerError> {
    let booking = state.engine.create_booking(command(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(booking))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingUpsert>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.update_booking(id, command(payload)).await?;
    Ok(Json(view(booking)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_booking(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
