use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    CreditEnvelope, CreditTotalCmd, Money, ResultEngine, bookings,
    credit_envelope::{self, SINGLETON_ID},
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the up-to-date credit envelope.
    ///
    /// Creates it with the default total when it does not exist yet, otherwise
    /// re-derives `used_credit`/`available_credit` from every booking and
    /// persists the refresh. Calling it repeatedly without booking changes
    /// yields the same amounts.
    pub async fn credit_envelope(&self) -> ResultEngine<CreditEnvelope> {
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| self.refresh_envelope(&db_tx).await)
    }

    /// Sets the operator-defined total credit (upserting the envelope).
    ///
    /// `available_credit` may become negative: that signals an over-extended
    /// state and does not reject the update.
    pub async fn set_credit_total(&self, cmd: CreditTotalCmd) -> ResultEngine<CreditEnvelope> {
        let notes = normalize_optional_text(cmd.notes.as_deref());
        let _guard = self.credit_lock.lock().await;
        with_tx!(self, |db_tx| {
            let used = Self::used_credit(&db_tx).await?;
            let mut envelope = CreditEnvelope::new(cmd.total_credit, used, Utc::now())?;
            envelope.notes = notes;

            let active = credit_envelope::ActiveModel::from(&envelope);
            let exists = credit_envelope::Entity::find_by_id(SINGLETON_ID)
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                active.update(&db_tx).await?;
            } else {
                active.insert(&db_tx).await?;
            }

            tracing::info!(
                total_credit = %envelope.total_credit,
                used_credit = %envelope.used_credit,
                available_credit = %envelope.available_credit,
                "credit total updated"
            );
            Ok(envelope)
        })
    }

    /// Sum of the ticket cost of every booking (full scan).
    pub(super) async fn used_credit(db_tx: &DatabaseTransaction) -> ResultEngine<Money> {
        let models = bookings::Entity::find().all(db_tx).await?;
        credit_envelope::used_credit(models.iter().map(|model| Money::new(model.ticket_cost)))
    }

    /// Get-or-create the envelope and re-derive it from the current bookings.
    pub(super) async fn refresh_envelope(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultEngine<CreditEnvelope> {
        let used = Self::used_credit(db_tx).await?;
        let now = Utc::now();

        match credit_envelope::Entity::find_by_id(SINGLETON_ID)
            .one(db_tx)
            .await?
        {
            Some(model) => {
                let mut envelope = CreditEnvelope::from(model);
                envelope.refresh(used, now)?;
                let active = credit_envelope::ActiveModel {
                    id: ActiveValue::Set(SINGLETON_ID),
                    used_credit: ActiveValue::Set(envelope.used_credit.minor()),
                    available_credit: ActiveValue::Set(envelope.available_credit.minor()),
                    last_updated: ActiveValue::Set(now),
                    ..Default::default()
                };
                active.update(db_tx).await?;
                Ok(envelope)
            }
            None => {
                let envelope = CreditEnvelope::new(self.default_total_credit, used, now)?;
                credit_envelope::ActiveModel::from(&envelope)
                    .insert(db_tx)
                    .await?;
                tracing::info!(
                    total_credit = %envelope.total_credit,
                    "credit envelope created"
                );
                Ok(envelope)
            }
        }
    }

    /// The envelope exactly as stored, used by the pre-mutation credit check.
    /// A missing envelope is created lazily first.
    pub(super) async fn stored_envelope(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultEngine<CreditEnvelope> {
        match credit_envelope::Entity::find_by_id(SINGLETON_ID)
            .one(db_tx)
            .await?
        {
            Some(model) => Ok(model.into()),
            None => self.refresh_envelope(db_tx).await,
        }
    }
}
