use sqlx::{Pool, Sqlite};
use anyhow::Result;
use crate::{
    db::models::{BankAccount, Card, User},
    db::queries,
    disclosure::AccountRepository,
};

/// Database implementation of AccountRepository
pub struct DatabaseAccountRepository {
    pool: Pool<Sqlite>,
}

impl DatabaseAccountRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountRepository for DatabaseAccountRepository {
    async fn get_account(&self, account_id: i64) -> Result<Option<BankAccount>> {
        queries::get_account(&self.pool, account_id).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        queries::get_user(&self.pool, user_id).await
    }

    async fn get_card(&self, card_id: i64) -> Result<Option<Card>> {
        queries::get_card(&self.pool, card_id).await
    }

    async fn latest_active_card(&self, account_id: i64) -> Result<Option<Card>> {
        queries::latest_active_card(&self.pool, account_id).await
    }

    async fn set_pin(&self, account_id: i64, pin: &str) -> Result<()> {
        queries::set_pin(&self.pool, account_id, pin).await
    }

    async fn try_mark_credentials_sent(&self, account_id: i64) -> Result<bool> {
        queries::try_mark_credentials_sent(&self.pool, account_id).await
    }

    async fn clear_card_secrets(&self, card_id: i64) -> Result<()> {
        queries::clear_card_secrets(&self.pool, card_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> Pool<Sqlite> {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn seed_account(pool: &Pool<Sqlite>) -> i64 {
        let user_id = queries::insert_user(pool, "Mario Rossi", "mario@example.com")
            .await
            .unwrap();
        queries::insert_account(pool, user_id, "IT60X0542811101000000123456")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_flag_claim_succeeds_exactly_once() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;
        let repo = DatabaseAccountRepository::new(pool);

        assert!(repo.try_mark_credentials_sent(account_id).await.unwrap());
        assert!(!repo.try_mark_credentials_sent(account_id).await.unwrap());

        let account = repo.get_account(account_id).await.unwrap().unwrap();
        assert!(account.credentials_sent);
    }

    #[tokio::test]
    async fn test_latest_active_card_skips_inactive() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;

        // Three issuance timestamps T1 < T2 < T3; only T1 and T3 active.
        for (active, ts, last4) in [
            (true, "2026-01-01 10:00:00", "1111"),
            (false, "2026-02-01 10:00:00", "2222"),
            (true, "2026-03-01 10:00:00", "3333"),
        ] {
            sqlx::query(
                "INSERT INTO cards (account_id, active, circuit, pan_last4, expiry_month,
                 expiry_year, pan_real, cvv_real, issued_at)
                 VALUES (?, ?, 'VISA', ?, 4, 2028, NULL, NULL, ?)",
            )
            .bind(account_id)
            .bind(active)
            .bind(last4)
            .bind(ts)
            .execute(&pool)
            .await
            .unwrap();
        }

        let repo = DatabaseAccountRepository::new(pool);
        let card = repo.latest_active_card(account_id).await.unwrap().unwrap();
        assert_eq!(card.pan_last4, "3333");
    }

    #[tokio::test]
    async fn test_clear_card_secrets_nulls_both_fields() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;
        let card_id = queries::insert_card(
            &pool,
            account_id,
            "VISA",
            "1111",
            4,
            2028,
            "4111111111111111",
            "123",
            true,
        )
        .await
        .unwrap();

        let repo = DatabaseAccountRepository::new(pool);
        assert!(repo.get_card(card_id).await.unwrap().unwrap().has_real_secrets());

        repo.clear_card_secrets(card_id).await.unwrap();

        let card = repo.get_card(card_id).await.unwrap().unwrap();
        assert!(card.pan_real.is_none());
        assert!(card.cvv_real.is_none());
    }

    #[tokio::test]
    async fn test_set_pin_overwrites_previous_value() {
        let pool = test_pool().await;
        let account_id = seed_account(&pool).await;
        let repo = DatabaseAccountRepository::new(pool);

        repo.set_pin(account_id, "000000").await.unwrap();
        repo.set_pin(account_id, "425961").await.unwrap();

        let account = repo.get_account(account_id).await.unwrap().unwrap();
        assert_eq!(account.pin.as_deref(), Some("425961"));
    }
}
