use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    app_state::AppState,
    db::{models::CreateCardRequest, queries},
    disclosure::db_repository::DatabaseAccountRepository,
};

/// Masked view of a freshly issued card; real PAN/CVV are never echoed.
#[derive(Debug, Serialize)]
pub struct CardCreatedResponse {
    pub card_id: i64,
    pub account_id: i64,
    pub circuit: String,
    pub pan_last4: String,
    pub expiry_month: i64,
    pub expiry_year: i64,
    pub active: bool,
}

/// POST /api/cards
/// Issues a card and runs the card-created disclosure hook
pub async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<CardCreatedResponse>, StatusCode> {
    queries::get_account(&state.pool, req.account_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if req.pan_real.len() < 4 || !req.pan_real.chars().all(|c| c.is_ascii_digit()) {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !(1..=12).contains(&req.expiry_month) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let pan_last4 = req.pan_real[req.pan_real.len() - 4..].to_string();
    let active = req.active.unwrap_or(true);

    let card_id = queries::insert_card(
        &state.pool,
        req.account_id,
        &req.circuit,
        &pan_last4,
        req.expiry_month,
        req.expiry_year,
        &req.pan_real,
        &req.cvv_real,
        active,
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Covers the card-arrives-after-account ordering; a no-op when the
    // account already disclosed. Never blocks card creation.
    let repo = DatabaseAccountRepository::new(state.pool.clone());
    if let Err(err) = state.disclosure.on_card_created(&repo, card_id).await {
        tracing::error!(card_id, error = %err, "card-created disclosure hook failed");
    }

    Ok(Json(CardCreatedResponse {
        card_id,
        account_id: req.account_id,
        circuit: req.circuit,
        pan_last4,
        expiry_month: req.expiry_month,
        expiry_year: req.expiry_year,
        active,
    }))
}
