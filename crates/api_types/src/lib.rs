//! Wire types of the ledgerbook HTTP API.
//!
//! Request amounts are decimal strings (`"3650.00"`); the server parses them
//! permissively and treats missing or unparsable values as zero. Responses
//! carry amounts as signed minor units (`*_minor`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Set only for insufficient-credit rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<credit::CreditShortfall>,
}

pub mod booking {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PaymentStatus {
        Paid,
        Pending,
        #[default]
        Unpaid,
    }

    /// Create or fully replace a booking.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingUpsert {
        pub reference_number: String,
        pub customer_name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub departure_place: String,
        pub destination: String,
        pub departure_date: Option<String>,
        pub return_date: Option<String>,
        /// Decimal string, e.g. `"3650.00"`.
        pub ticket_cost: Option<String>,
        pub amount_received: Option<String>,
        pub agent: Option<String>,
        pub payment_status: Option<PaymentStatus>,
        pub notes: Option<String>,
    }

    /// Query string of `GET /air-bookings` and `GET /air-bookings/summary`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingList {
        pub search: Option<String>,
        pub payment_status: Option<PaymentStatus>,
        pub agent: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingView {
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
        pub ticket_cost_minor: i64,
        pub amount_received_minor: i64,
        pub due_balance_minor: i64,
        pub profit_minor: i64,
        pub agent: String,
        pub payment_status: PaymentStatus,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingListResponse {
        pub bookings: Vec<BookingView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingSummaryView {
        pub count: u64,
        pub total_ticket_cost_minor: i64,
        pub total_amount_received_minor: i64,
        pub total_due_minor: i64,
        pub total_profit_minor: i64,
    }
}

pub mod credit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditTotalUpdate {
        /// Decimal string; unparsable input counts as zero.
        pub total_credit: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditEnvelopeView {
        pub total_credit_minor: i64,
        pub used_credit_minor: i64,
        /// Negative when bookings exceed the total.
        pub available_credit_minor: i64,
        pub notes: Option<String>,
        pub last_updated: DateTime<Utc>,
    }

    /// Details of a rejected booking mutation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditShortfall {
        pub available_credit_minor: i64,
        pub requested_minor: i64,
        pub shortfall_minor: i64,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerUpsert {
        pub name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerList {
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub total_credit_minor: i64,
        pub total_debit_minor: i64,
        pub balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerListResponse {
        pub customers: Vec<CustomerView>,
    }
}

pub mod money_transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        #[default]
        Completed,
        Pending,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoneyTransactionNew {
        /// Resolved case-insensitively; an unknown name creates the customer.
        pub customer_name: String,
        pub date: String,
        pub debit: Option<String>,
        pub credit: Option<String>,
        pub description: Option<String>,
        pub status: Option<TransactionStatus>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoneyTransactionUpdate {
        pub date: String,
        pub description: String,
        pub debit: Option<String>,
        pub credit: Option<String>,
        pub status: Option<TransactionStatus>,
        pub notes: Option<String>,
    }

    /// Query string of `GET /money-transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyTransactionList {
        pub customer_id: Option<Uuid>,
        pub customer_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoneyTransactionView {
        pub id: Uuid,
        pub customer_id: Uuid,
        pub customer_name: String,
        pub date: String,
        pub description: String,
        pub debit_minor: i64,
        pub credit_minor: i64,
        /// Running balance of the customer's ledger after this entry.
        pub balance_minor: i64,
        pub status: TransactionStatus,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MoneyTransactionListResponse {
        pub transactions: Vec<MoneyTransactionView>,
    }
}

pub mod overview {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerOverviewView {
        pub count: u64,
        pub total_credit_minor: i64,
        pub total_debit_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerOverviewView {
        pub bookings: booking::BookingSummaryView,
        pub customers: CustomerOverviewView,
        pub envelope: credit::CreditEnvelopeView,
    }
}
