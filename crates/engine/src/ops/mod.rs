use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::{DEFAULT_TOTAL_CREDIT, Money, ResultEngine};

mod bookings;
mod customers;
mod envelope;
mod overview;
mod transactions;

pub use bookings::BookingSummary;
pub use overview::{CustomerOverview, LedgerOverview};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    default_total_credit: Money,
    /// Serializes every read-modify-write of the credit envelope (booking
    /// mutations and total updates).
    credit_lock: Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Total credit used when the envelope is created lazily.
    pub fn default_total_credit(&self) -> Money {
        self.default_total_credit
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    default_total_credit: Money,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            default_total_credit: DEFAULT_TOTAL_CREDIT,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the total credit of a lazily created envelope.
    pub fn default_total_credit(mut self, total: Money) -> EngineBuilder {
        self.default_total_credit = total;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        // Fail early on a disconnected/unreachable database.
        self.database.ping().await?;
        tracing::debug!(
            default_total_credit = %self.default_total_credit,
            "engine ready"
        );
        Ok(Engine {
            database: self.database,
            default_total_credit: self.default_total_credit,
            credit_lock: Mutex::new(()),
        })
    }
}
