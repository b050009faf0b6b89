use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// A composed credential email, ready for transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

/// Outbound email transport. Disclosure treats send failures as
/// non-fatal, so implementations only report them; they never retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

/// SMTP delivery via lettre's async transport (STARTTLS relay).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, MailerError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);

        if let (Some(user), Some(password)) = (user, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), password.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let builder = Message::builder()
            .from(email.from.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject.clone());

        let message = match &email.html_body {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(
                    email.text_body.clone(),
                    html.clone(),
                ))
                .map_err(|e| MailerError::Build(e.to_string()))?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.text_body.clone())
                .map_err(|e| MailerError::Build(e.to_string()))?,
        };

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Stand-in transport used when no SMTP relay is configured: the email is
/// logged and dropped, which matches the fire-and-forget delivery contract.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured, dropping credential email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_error_display_build() {
        let err = MailerError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn test_mailer_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailerError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[tokio::test]
    async fn test_noop_mailer_accepts_everything() {
        let email = OutgoingEmail {
            subject: "subject".to_string(),
            text_body: "body".to_string(),
            html_body: None,
            from: "noreply@finhub.local".to_string(),
            to: "user@example.com".to_string(),
        };
        assert!(NoopMailer.send(&email).await.is_ok());
    }
}
