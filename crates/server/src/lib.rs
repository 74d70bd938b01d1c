use api_types::{ErrorBody, credit::CreditShortfall};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run_with_listener, spawn_with_listener};

mod bookings;
mod credit;
mod customers;
mod money_transactions;
mod overview;
mod server;

pub mod types {
    pub mod booking {
        pub use api_types::booking::{
            BookingList, BookingListResponse, BookingSummaryView, BookingUpsert, BookingView,
            PaymentStatus,
        };
    }

    pub mod credit {
        pub use api_types::credit::{CreditEnvelopeView, CreditShortfall, CreditTotalUpdate};
    }

    pub mod customer {
        pub use api_types::customer::{
            CustomerList, CustomerListResponse, CustomerUpsert, CustomerView,
        };
    }

    pub mod money_transaction {
        pub use api_types::money_transaction::{
            MoneyTransactionList, MoneyTransactionListResponse, MoneyTransactionNew,
            MoneyTransactionUpdate, MoneyTransactionView, TransactionStatus,
        };
    }

    pub mod overview {
        pub use api_types::overview::{CustomerOverviewView, LedgerOverviewView};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InsufficientCredit { .. } => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::BusinessRule(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidStatus(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    let credit = match &err {
        EngineError::InsufficientCredit {
            available,
            requested,
            shortfall,
        } => Some(CreditShortfall {
            available_credit_minor: available.minor(),
            requested_minor: requested.minor(),
            shortfall_minor: shortfall.minor(),
        }),
        _ => None,
    };
    let error = match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    };
    ErrorBody { error, credit }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
