//! Customer endpoints.

use api_types::customer::{CustomerList, CustomerListResponse, CustomerUpsert, CustomerView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Customer, CustomerCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn command(payload: CustomerUpsert) -> CustomerCmd {
    CustomerCmd {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
    }
}

fn view(customer: Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        email: customer.email,
        phone: customer.phone,
        total_credit_minor: customer.total_credit.minor(),
        total_debit_minor: customer.total_debit.minor(),
        balance_minor: customer.balance.minor(),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CustomerList>,
) -> Result<Json<CustomerListResponse>, ServerError> {
    let customers = state.engine.list_customers(query.search.as_deref()).await?;
    Ok(Json(CustomerListResponse {
        customers: customers.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.customer(id).await?;
    Ok(Json(view(customer)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerUpsert>,
) -> Result<(StatusCode, Json<CustomerView>), ServerError> {
    let customer = state.engine.create_customer(command(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(customer))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerUpsert>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.update_customer(id, command(payload)).await?;
    Ok(Json(view(customer)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Repair entry point: re-derive balances and totals from the stored history.
pub async fn recompute(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerView>, ServerError> {
    let customer = state.engine.recompute_customer_ledger(id).await?;
    Ok(Json(view(customer)))
}
