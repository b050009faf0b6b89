pub mod db_repository;

use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::{
    db::models::{BankAccount, Card, User},
    mailer::{Mailer, OutgoingEmail},
    pin::generate_pin,
    templates::{CredentialsContext, TemplateRenderer},
};

/// Subject line of the one-time credential email.
pub const DISCLOSURE_SUBJECT: &str = "Credenziali conto FinHub (IBAN, PIN e dati carta)";

/// Result of a disclosure attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureOutcome {
    /// The account was already disclosed (or a concurrent caller won the
    /// claim); nothing was written and no email was sent.
    AlreadySent,
    Sent {
        card_included: bool,
    },
}

/// Trait for the persistence operations disclosure needs
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_account(&self, account_id: i64) -> Result<Option<BankAccount>>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;
    async fn get_card(&self, card_id: i64) -> Result<Option<Card>>;
    /// The active card with the most recent issuance timestamp, if any.
    async fn latest_active_card(&self, account_id: i64) -> Result<Option<Card>>;
    async fn set_pin(&self, account_id: i64, pin: &str) -> Result<()>;
    /// Atomic test-and-set of the disclosure flag. Returns false when the
    /// flag was already set, so at most one caller proceeds to send.
    async fn try_mark_credentials_sent(&self, account_id: i64) -> Result<bool>;
    async fn clear_card_secrets(&self, card_id: i64) -> Result<()>;
}

/// One-time credential disclosure service
pub struct DisclosureService<T: TemplateRenderer> {
    renderer: T,
    mailer: Arc<dyn Mailer>,
    from_email: String,
    pin_length: usize,
}

impl<T: TemplateRenderer> DisclosureService<T> {
    pub fn new(renderer: T, mailer: Arc<dyn Mailer>, from_email: String, pin_length: usize) -> Self {
        Self {
            renderer,
            mailer,
            from_email,
            pin_length,
        }
    }

    /// Send the one-time credential email for an account, then scrub the
    /// disclosed card's real secrets.
    ///
    /// Disclosure happens at most once per account: the `credentials_sent`
    /// flag is claimed with a conditional update before anything is sent, so
    /// concurrent account-created and card-created observers cannot both
    /// email. Email delivery is best effort; a transport failure is logged
    /// and the disclosure still counts as done.
    pub async fn try_send_credentials<R: AccountRepository>(
        &self,
        repo: &R,
        account_id: i64,
    ) -> Result<DisclosureOutcome> {
        let account = repo
            .get_account(account_id)
            .await?
            .ok_or_else(|| anyhow!("account {} not found", account_id))?;

        if account.credentials_sent {
            return Ok(DisclosureOutcome::AlreadySent);
        }

        let user = repo
            .get_user(account.user_id)
            .await?
            .ok_or_else(|| anyhow!("user {} not found", account.user_id))?;

        let card = repo.latest_active_card(account_id).await?;

        // Claim the flag before sending; the loser of a concurrent race
        // stops here without writing anything else.
        if !repo.try_mark_credentials_sent(account_id).await? {
            return Ok(DisclosureOutcome::AlreadySent);
        }

        // Disclosure always rotates the PIN, even when one already exists,
        // so the emailed value matches the stored one.
        let pin = generate_pin(self.pin_length)?;
        repo.set_pin(account_id, &pin).await?;

        let mut ctx = CredentialsContext {
            user_name: user.display_name().to_string(),
            iban: account.iban.clone(),
            pin,
            ..Default::default()
        };
        if let Some(card) = &card {
            ctx.card_brand = Some(card.circuit.clone());
            ctx.card_last4 = Some(card.pan_last4.clone());
            ctx.expiry_month = Some(card.expiry_month);
            ctx.expiry_year = Some(card.expiry_year);
            ctx.cvv_real = card.cvv_real.clone().filter(|c| !c.is_empty());
        }

        let text_body = self.renderer.render_text(&ctx)?;
        // An HTML rendering failure degrades the email to text-only.
        let html_body = self.renderer.render_html(&ctx).ok();

        let email = OutgoingEmail {
            subject: DISCLOSURE_SUBJECT.to_string(),
            text_body,
            html_body,
            from: self.from_email.clone(),
            to: user.email.clone(),
        };

        if let Err(err) = self.mailer.send(&email).await {
            tracing::warn!(
                account_id,
                error = %err,
                "credential email send failed, disclosure still recorded"
            );
        }

        if let Some(card) = &card {
            if card.has_real_secrets() {
                repo.clear_card_secrets(card.card_id).await?;
            }
        }

        tracing::info!(
            account_id,
            card_included = card.is_some(),
            "credentials disclosed"
        );

        Ok(DisclosureOutcome::Sent {
            card_included: card.is_some(),
        })
    }

    /// Hook invoked after a new account row is committed: make sure a PIN
    /// exists, then attempt disclosure (which no-ops when already sent).
    pub async fn on_account_created<R: AccountRepository>(
        &self,
        repo: &R,
        account_id: i64,
    ) -> Result<()> {
        let account = repo
            .get_account(account_id)
            .await?
            .ok_or_else(|| anyhow!("account {} not found", account_id))?;

        if account.pin.as_deref().is_none_or(|p| p.is_empty()) {
            let pin = generate_pin(self.pin_length)?;
            repo.set_pin(account_id, &pin).await?;
        }

        self.try_send_credentials(repo, account_id).await?;
        Ok(())
    }

    /// Hook invoked after a new card row is committed: covers the case where
    /// the card arrives after the account's own disclosure already ran and
    /// found no card to attach.
    pub async fn on_card_created<R: AccountRepository>(
        &self,
        repo: &R,
        card_id: i64,
    ) -> Result<()> {
        let card = repo
            .get_card(card_id)
            .await?
            .ok_or_else(|| anyhow!("card {} not found", card_id))?;

        let account = repo
            .get_account(card.account_id)
            .await?
            .ok_or_else(|| anyhow!("account {} not found", card.account_id))?;

        if !account.credentials_sent {
            self.try_send_credentials(repo, card.account_id).await?;
        }
        Ok(())
    }
}
