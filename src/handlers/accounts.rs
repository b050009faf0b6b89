use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    app_state::AppState,
    db::{models::{AccountStatusResponse, CreateAccountRequest}, queries},
    disclosure::db_repository::DatabaseAccountRepository,
};

/// POST /api/accounts
/// Creates a bank account and runs the account-created disclosure hook
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<AccountStatusResponse>, StatusCode> {
    queries::get_user(&state.pool, req.user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let account_id = queries::insert_account(&state.pool, req.user_id, &req.iban)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Observer hook runs inline at the write boundary. Notification failure
    // never blocks account creation.
    let repo = DatabaseAccountRepository::new(state.pool.clone());
    if let Err(err) = state.disclosure.on_account_created(&repo, account_id).await {
        tracing::error!(account_id, error = %err, "account-created disclosure hook failed");
    }

    account_status(&state, account_id).await.map(Json)
}

/// GET /api/accounts/{account_id}
/// Account status without secrets
pub async fn get_account_status(
    Path(account_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AccountStatusResponse>, StatusCode> {
    account_status(&state, account_id).await.map(Json)
}

async fn account_status(
    state: &AppState,
    account_id: i64,
) -> Result<AccountStatusResponse, StatusCode> {
    let account = queries::get_account(&state.pool, account_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let card_count = queries::count_cards(&state.pool, account_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(AccountStatusResponse {
        account_id: account.account_id,
        user_id: account.user_id,
        iban: account.iban,
        credentials_sent: account.credentials_sent,
        card_count,
    })
}
