use sqlx::{Pool, Sqlite};
use anyhow::Result;
use chrono;
use crate::db::models::{BankAccount, Card, User};

pub async fn insert_user(pool: &Pool<Sqlite>, full_name: &str, email: &str) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO users (full_name, email) VALUES (?, ?)"
    )
    .bind(full_name)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_user(pool: &Pool<Sqlite>, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE user_id = ?"
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn insert_account(pool: &Pool<Sqlite>, user_id: i64, iban: &str) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO bank_accounts (user_id, iban, pin, credentials_sent) VALUES (?, ?, NULL, 0)"
    )
    .bind(user_id)
    .bind(iban)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_account(pool: &Pool<Sqlite>, account_id: i64) -> Result<Option<BankAccount>> {
    let account = sqlx::query_as::<_, BankAccount>(
        "SELECT * FROM bank_accounts WHERE account_id = ?"
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn set_pin(pool: &Pool<Sqlite>, account_id: i64, pin: &str) -> Result<()> {
    sqlx::query(
        "UPDATE bank_accounts SET pin = ? WHERE account_id = ?"
    )
    .bind(pin)
    .bind(account_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Conditional claim of the disclosure flag. Returns true only for the caller
/// that flipped it, so concurrent observers cannot both send.
pub async fn try_mark_credentials_sent(pool: &Pool<Sqlite>, account_id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE bank_accounts SET credentials_sent = 1 WHERE account_id = ? AND credentials_sent = 0"
    )
    .bind(account_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_card(
    pool: &Pool<Sqlite>,
    account_id: i64,
    circuit: &str,
    pan_last4: &str,
    expiry_month: i64,
    expiry_year: i64,
    pan_real: &str,
    cvv_real: &str,
    active: bool,
) -> Result<i64> {
    // SQLite datetime in UTC format
    let issued_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let result = sqlx::query(
        "INSERT INTO cards (account_id, active, circuit, pan_last4, expiry_month, expiry_year,
         pan_real, cvv_real, issued_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(account_id)
    .bind(active)
    .bind(circuit)
    .bind(pan_last4)
    .bind(expiry_month)
    .bind(expiry_year)
    .bind(pan_real)
    .bind(cvv_real)
    .bind(issued_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_card(pool: &Pool<Sqlite>, card_id: i64) -> Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(
        "SELECT * FROM cards WHERE card_id = ?"
    )
    .bind(card_id)
    .fetch_optional(pool)
    .await?;

    Ok(card)
}

/// The disclosure card: active, most recently issued.
pub async fn latest_active_card(pool: &Pool<Sqlite>, account_id: i64) -> Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(
        "SELECT * FROM cards WHERE account_id = ? AND active = 1
         ORDER BY issued_at DESC, card_id DESC LIMIT 1"
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(card)
}

pub async fn clear_card_secrets(pool: &Pool<Sqlite>, card_id: i64) -> Result<()> {
    sqlx::query(
        "UPDATE cards SET pan_real = NULL, cvv_real = NULL WHERE card_id = ?"
    )
    .bind(card_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn count_cards(pool: &Pool<Sqlite>, account_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM cards WHERE account_id = ?"
    )
    .bind(account_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
