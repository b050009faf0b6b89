use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    app_state::AppState,
    db::{models::{CreateUserRequest, User}, queries},
};

/// POST /api/users
/// Creates a user record
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<User>, StatusCode> {
    let full_name = req.full_name.unwrap_or_default();

    let user_id = queries::insert_user(&state.pool, &full_name, &req.email)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let user = queries::get_user(&state.pool, user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(user))
}
