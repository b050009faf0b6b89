mod app_state;
mod config;
mod db;
mod disclosure;
mod handlers;
mod mailer;
mod pin;
mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_state::AppState;
use config::Config;
use db::init_pool;
use disclosure::DisclosureService;
use handlers::{accounts, cards, users};
use mailer::{Mailer, NoopMailer, SmtpMailer};
use templates::DefaultTemplateRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finhub_credentials=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration
    let config = Arc::new(Config::parse());

    // Initialize database
    let pool = init_pool(&config.database_url).await?;

    // Pick the email transport: real SMTP when configured, log-and-drop otherwise
    let mailer: Arc<dyn Mailer> = match &config.smtp_host {
        Some(host) => Arc::new(SmtpMailer::new(
            host,
            config.smtp_port,
            config.smtp_user.as_deref(),
            config.smtp_password.as_deref(),
        )?),
        None => Arc::new(NoopMailer),
    };

    let disclosure = Arc::new(DisclosureService::new(
        DefaultTemplateRenderer,
        mailer,
        config.from_email.clone(),
        config.pin_length,
    ));

    // Create shared state
    let state = AppState {
        pool,
        config: config.clone(),
        disclosure,
    };

    // Build router
    let app = Router::new()
        .route("/api/users", post(users::create_user))
        .route("/api/accounts", post(accounts::create_account))
        .route("/api/accounts/{account_id}", get(accounts::get_account_status))
        .route("/api/cards", post(cards::create_card))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
        )
        // Add shared state
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.socket_addr()).await?;

    tracing::info!("Server running on {}", config.socket_addr());
    tracing::info!("Sender address: {}", config.from_email);
    if config.smtp_host.is_none() {
        tracing::warn!("SMTP not configured, credential emails will be logged and dropped");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
