//! Credit envelope endpoints.

use api_types::credit::{CreditEnvelopeView, CreditTotalUpdate};
use axum::{Json, extract::State};
use engine::{CreditEnvelope, CreditTotalCmd, Money};

use crate::{ServerError, server::ServerState};

pub(crate) fn view(envelope: CreditEnvelope) -> CreditEnvelopeView {
    CreditEnvelopeView {
        total_credit_minor: envelope.total_credit.minor(),
        used_credit_minor: envelope.used_credit.minor(),
        available_credit_minor: envelope.available_credit.minor(),
        notes: envelope.notes,
        last_updated: envelope.last_updated,
    }
}

pub async fn get(State(state): State<ServerState>) -> Result<Json<CreditEnvelopeView>, ServerError> {
    let envelope = state.engine.credit_envelope().await?;
    Ok(Json(view(envelope)))
}

pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<CreditTotalUpdate>,
) -> Result<Json<CreditEnvelopeView>, ServerError> {
    let total_credit = payload
        .total_credit
        .as_deref()
        .map(Money::parse_or_zero)
        .unwrap_or_default();
    let cmd = CreditTotalCmd {
        total_credit,
        notes: payload.notes,
    };
    let envelope = state.engine.set_credit_total(cmd).await?;
    Ok(Json(view(envelope)))
}
