use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub created_at: Option<String>,
}

impl User {
    /// Display name used in email salutations; falls back to the address
    /// when no full name is on record.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BankAccount {
    pub account_id: i64,
    pub user_id: i64,
    pub iban: String,
    pub pin: Option<String>,
    pub credentials_sent: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub card_id: i64,
    pub account_id: i64,
    pub active: bool,
    pub circuit: String,
    pub pan_last4: String,
    pub expiry_month: i64,
    pub expiry_year: i64,
    pub pan_real: Option<String>,
    pub cvv_real: Option<String>,
    pub issued_at: Option<String>,
    pub created_at: Option<String>,
}

impl Card {
    pub fn has_real_secrets(&self) -> bool {
        self.pan_real.as_deref().is_some_and(|s| !s.is_empty())
            || self.cvv_real.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: i64,
    pub iban: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub account_id: i64,
    pub circuit: String,
    pub pan_real: String,
    pub cvv_real: String,
    pub expiry_month: i64,
    pub expiry_year: i64,
    pub active: Option<bool>,
}

/// Account view returned by the API; never carries the PIN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatusResponse {
    pub account_id: i64,
    pub user_id: i64,
    pub iban: String,
    pub credentials_sent: bool,
    pub card_count: i64,
}
