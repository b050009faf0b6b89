use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "finhub-credentials")]
#[command(about = "FinHub one-time credential disclosure service")]
#[command(version)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://finhub.db")]
    pub database_url: String,

    /// Sender address for credential emails
    #[arg(long, env = "DEFAULT_FROM_EMAIL", default_value = "noreply@finhub.local")]
    pub from_email: String,

    /// Number of digits in generated account PINs
    #[arg(long, env = "PIN_LENGTH", default_value = "6")]
    pub pin_length: usize,

    /// SMTP relay host; when unset, credential emails are logged and dropped
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP relay port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// Optional SMTP username
    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    /// Optional SMTP password
    #[arg(long, env = "SMTP_PASSWORD")]
    pub smtp_password: Option<String>,
}

impl Config {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
