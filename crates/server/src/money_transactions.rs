//! Customer ledger endpoints.

use api_types::money_transaction::{
    MoneyTransactionList, MoneyTransactionListResponse, MoneyTransactionNew,
    MoneyTransactionUpdate, MoneyTransactionView, TransactionStatus,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    Money, MoneyTransaction, TransactionCmd, TransactionListFilter, TransactionUpdateCmd,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn engine_status(status: TransactionStatus) -> engine::TransactionStatus {
    match status {
        TransactionStatus::Completed => engine::TransactionStatus::Completed,
        TransactionStatus::Pending => engine::TransactionStatus::Pending,
        TransactionStatus::Failed => engine::TransactionStatus::Failed,
    }
}

fn api_status(status: engine::TransactionStatus) -> TransactionStatus {
    match status {
        engine::TransactionStatus::Completed => TransactionStatus::Completed,
        engine::TransactionStatus::Pending => TransactionStatus::Pending,
        engine::TransactionStatus::Failed => TransactionStatus::Failed,
    }
}

fn amount(value: Option<&str>) -> Money {
    value.map(Money::parse_or_zero).unwrap_or_default()
}

fn view(tx: MoneyTransaction) -> MoneyTransactionView {
    MoneyTransactionView {
        id: tx.id,
        customer_id: tx.customer_id,
        customer_name: tx.customer_name,
        date: tx.date,
        description: tx.description,
        debit_minor: tx.debit.minor(),
        credit_minor: tx.credit.minor(),
        balance_minor: tx.balance.minor(),
        status: api_status(tx.status),
        notes: tx.notes,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MoneyTransactionList>,
) -> Result<Json<MoneyTransactionListResponse>, ServerError> {
    let filter = TransactionListFilter {
        customer_id: query.customer_id,
        customer_name: query.customer_name,
    };
    let transactions = state.engine.list_transactions(&filter).await?;
    Ok(Json(MoneyTransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MoneyTransactionNew>,
) -> Result<(StatusCode, Json<MoneyTransactionView>), ServerError> {
    let cmd = TransactionCmd {
        customer_name: payload.customer_name,
        date: payload.date,
        debit: amount(payload.debit.as_deref()),
        credit: amount(payload.credit.as_deref()),
        description: payload.description,
        status: engine_status(payload.status.unwrap_or_default()),
        notes: payload.notes,
    };
    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoneyTransactionUpdate>,
) -> Result<Json<MoneyTransactionView>, ServerError> {
    let cmd = TransactionUpdateCmd {
        date: payload.date,
        description: payload.description,
        debit: amount(payload.debit.as_deref()),
        credit: amount(payload.credit.as_deref()),
        status: engine_status(payload.status.unwrap_or_default()),
        notes: payload.notes,
    };
    let tx = state.engine.update_transaction(id, cmd).await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
