//! Command structs for engine operations.
//!
//! These types group the parameters of write operations (bookings, credit
//! total, customers, money transactions), keeping call sites readable and
//! avoiding long argument lists. Updates take the same command as creation:
//! the whole field set is replaced.

use uuid::Uuid;

use crate::{Money, PaymentStatus, TransactionStatus};

/// Create or fully replace an air booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingCmd {
    pub reference_number: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub departure_place: String,
    pub destination: String,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub ticket_cost: Money,
    pub amount_received: Money,
    pub agent: String,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

impl BookingCmd {
    #[must_use]
    pub fn new(
        reference_number: impl Into<String>,
        customer_name: impl Into<String>,
        departure_place: impl Into<String>,
        destination: impl Into<String>,
        ticket_cost: Money,
    ) -> Self {
        Self {
            reference_number: reference_number.into(),
            customer_name: customer_name.into(),
            email: None,
            phone: None,
            departure_place: departure_place.into(),
            destination: destination.into(),
            departure_date: None,
            return_date: None,
            ticket_cost,
            amount_received: Money::ZERO,
            agent: String::new(),
            payment_status: PaymentStatus::default(),
            notes: None,
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn departure_date(mut self, date: impl Into<String>) -> Self {
        self.departure_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn return_date(mut self, date: impl Into<String>) -> Self {
        self.return_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn ticket_cost(mut self, ticket_cost: Money) -> Self {
        self.ticket_cost = ticket_cost;
        self
    }

    #[must_use]
    pub fn amount_received(mut self, amount_received: Money) -> Self {
        self.amount_received = amount_received;
        self
    }

    #[must_use]
    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    #[must_use]
    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Set the operator-defined ceiling of the credit envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditTotalCmd {
    pub total_credit: Money,
    pub notes: Option<String>,
}

impl CreditTotalCmd {
    #[must_use]
    pub fn new(total_credit: Money) -> Self {
        Self {
            total_credit,
            notes: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Create or update a customer's contact fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerCmd {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Record a ledger entry for a customer, creating the customer when the name
/// is unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionCmd {
    pub customer_name: String,
    pub date: String,
    pub debit: Money,
    pub credit: Money,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub notes: Option<String>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        customer_name: impl Into<String>,
        date: impl Into<String>,
        debit: Money,
        credit: Money,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            date: date.into(),
            debit,
            credit,
            description: None,
            status: TransactionStatus::default(),
            notes: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Replace the editable fields of a ledger entry. Identity and ownership are
/// not editable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionUpdateCmd {
    pub date: String,
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    pub status: TransactionStatus,
    pub notes: Option<String>,
}

impl TransactionUpdateCmd {
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        debit: Money,
        credit: Money,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            debit,
            credit,
            status: TransactionStatus::default(),
            notes: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Filters for listing bookings.
#[derive(Clone, Debug, Default)]
pub struct BookingListFilter {
    /// Case-insensitive substring over description, reference, customer and
    /// agent.
    pub search: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub agent: Option<String>,
}

/// Filters for listing money transactions. `customer_id` wins over
/// `customer_name` when both are set.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub customer_id: Option<Uuid>,
    /// Case-insensitive substring of the stored display name.
    pub customer_name: Option<String>,
}
