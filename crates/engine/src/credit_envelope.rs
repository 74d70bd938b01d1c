//! The global credit envelope.
//!
//! There is at most one envelope, stored in the `credit_settings` table under
//! [`SINGLETON_ID`]. Only `total_credit` (and the notes) are operator-set;
//! `used_credit` and `available_credit` are always re-derived from the full
//! booking set:
//!
//! - `used_credit = Σ ticket_cost` over every booking
//! - `available_credit = total_credit - used_credit` (may be negative)

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Primary key of the one and only envelope row.
pub const SINGLETON_ID: i32 = 1;

/// Total credit assigned to a freshly created envelope.
pub const DEFAULT_TOTAL_CREDIT: Money = Money::from_major(7010);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEnvelope {
    pub total_credit: Money,
    pub used_credit: Money,
    pub available_credit: Money,
    pub notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl CreditEnvelope {
    pub fn new(total_credit: Money, used_credit: Money, now: DateTime<Utc>) -> ResultEngine<Self> {
        Ok(Self {
            total_credit,
            used_credit,
            available_credit: total_credit.try_sub(used_credit)?,
            notes: None,
            last_updated: now,
        })
    }

    /// Re-derives the used/available pair, leaving `total_credit` untouched.
    /// On overflow the envelope is left as it was.
    pub fn refresh(&mut self, used_credit: Money, now: DateTime<Utc>) -> ResultEngine<()> {
        self.available_credit = self.total_credit.try_sub(used_credit)?;
        self.used_credit = used_credit;
        self.last_updated = now;
        Ok(())
    }

    /// Gate applied before a booking consumes `requested` more credit.
    ///
    /// Zero or negative requests free credit and always pass.
    pub fn check_availability(&self, requested: Money) -> ResultEngine<()> {
        if !requested.is_positive() || requested <= self.available_credit {
            return Ok(());
        }
        Err(EngineError::InsufficientCredit {
            available: self.available_credit,
            requested,
            shortfall: requested.try_sub(self.available_credit)?,
        })
    }
}

/// Sums the ticket cost of every booking.
pub fn used_credit<I>(ticket_costs: I) -> ResultEngine<Money>
where
    I: IntoIterator<Item = Money>,
{
    Money::try_sum(ticket_costs)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "credit_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub total_credit: i64,
    pub used_credit: i64,
    pub available_credit: i64,
    pub notes: Option<String>,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CreditEnvelope> for ActiveModel {
    fn from(value: &CreditEnvelope) -> Self {
        Self {
            id: ActiveValue::Set(SINGLETON_ID),
            total_credit: ActiveValue::Set(value.total_credit.minor()),
            used_credit: ActiveValue::Set(value.used_credit.minor()),
            available_credit: ActiveValue::Set(value.available_credit.minor()),
            notes: ActiveValue::Set(value.notes.clone()),
            last_updated: ActiveValue::Set(value.last_updated),
        }
    }
}

impl From<Model> for CreditEnvelope {
    fn from(model: Model) -> Self {
        Self {
            total_credit: Money::new(model.total_credit),
            used_credit: Money::new(model.used_credit),
            available_credit: Money::new(model.available_credit),
            notes: model.notes,
            last_updated: model.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn envelope(used: Money) -> CreditEnvelope {
        CreditEnvelope::new(DEFAULT_TOTAL_CREDIT, used, Utc.timestamp_opt(0, 0).unwrap()).unwrap()
    }

    #[test]
    fn available_is_total_minus_used() {
        let env = envelope(Money::from_major(3650));
        assert_eq!(env.used_credit, Money::from_major(3650));
        assert_eq!(env.available_credit, Money::from_major(3360));
    }

    #[test]
    fn refresh_keeps_total() {
        let mut env = envelope(Money::ZERO);
        env.refresh(Money::from_major(8000), Utc.timestamp_opt(10, 0).unwrap())
            .unwrap();

        assert_eq!(env.total_credit, DEFAULT_TOTAL_CREDIT);
        assert_eq!(env.available_credit, Money::from_major(-990));
    }

    #[test]
    fn check_rejects_with_shortfall() {
        let env = envelope(Money::from_major(3650));
        let err = env.check_availability(Money::from_major(4000)).unwrap_err();

        assert_eq!(
            err,
            EngineError::InsufficientCredit {
                available: Money::from_major(3360),
                requested: Money::from_major(4000),
                shortfall: Money::from_major(640),
            }
        );
    }

    #[test]
    fn check_accepts_exact_and_non_positive_requests() {
        let env = envelope(Money::from_major(3650));
        assert!(env.check_availability(Money::from_major(3360)).is_ok());
        assert!(env.check_availability(Money::ZERO).is_ok());
        assert!(env.check_availability(Money::from_major(-500)).is_ok());
    }

    #[test]
    fn negative_available_still_lets_decreases_through() {
        let env = envelope(Money::from_major(9000));
        assert!(env.check_availability(Money::from_major(-100)).is_ok());
        assert!(env.check_availability(Money::new(1)).is_err());
    }

    #[test]
    fn used_credit_of_empty_set_is_zero() {
        assert_eq!(used_credit(Vec::new()).unwrap(), Money::ZERO);
        assert_eq!(
            used_credit([Money::from_major(10), Money::new(50)]).unwrap(),
            Money::new(1050)
        );
    }

    #[test]
    fn out_of_range_totals_are_rejected() {
        let huge = Money::new(i64::MAX);
        assert!(used_credit([huge, Money::new(1)]).is_err());
        assert!(CreditEnvelope::new(huge, Money::new(-1), Utc::now()).is_err());

        let mut env = envelope(Money::from_major(100));
        let before = env.clone();
        assert!(env.refresh(Money::new(i64::MIN), Utc::now()).is_err());
        assert_eq!(env, before);

        let drained = CreditEnvelope::new(Money::new(i64::MIN + 1), Money::ZERO, Utc::now()).unwrap();
        assert_eq!(
            drained.check_availability(Money::new(i64::MAX)),
            Err(EngineError::InvalidAmount("amount too large".to_string()))
        );
    }
}
