//! Dashboard endpoint.

use api_types::overview::{CustomerOverviewView, LedgerOverviewView};
use axum::{Json, extract::State};

use crate::{ServerError, bookings, credit, server::ServerState};

pub async fn get(State(state): State<ServerState>) -> Result<Json<LedgerOverviewView>, ServerError> {
    let overview = state.engine.ledger_overview().await?;
    let customers = overview.customers;

    Ok(Json(LedgerOverviewView {
        bookings: bookings::summary_view(overview.bookings),
        customers: CustomerOverviewView {
            count: customers.count,
            total_credit_minor: customers.total_credit.minor(),
            total_debit_minor: customers.total_debit.minor(),
            balance_minor: customers.balance.minor(),
        },
        envelope: credit::view(overview.envelope),
    }))
}
