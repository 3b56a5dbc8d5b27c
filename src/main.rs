use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use ticketing::config::AppConfig;
use ticketing::services::analytics::PgAnalyticsStore;
use ticketing::services::mailer::Mailer;
use ticketing::services::mpesa::MpesaClient;
use ticketing::{db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketing=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let mailer = Mailer::new(config.smtp.as_ref())?;
    if !mailer.is_enabled() {
        tracing::warn!("SMTP not configured, outgoing mail will be skipped");
    }
    let mpesa = MpesaClient::new(config.mpesa.clone())?;
    if !mpesa.is_configured() {
        tracing::warn!("M-Pesa credentials missing, STK push will fail");
    }

    let state = AppState {
        db: pool.clone(),
        config: config.clone(),
        mailer,
        mpesa,
        analytics: Arc::new(PgAnalyticsStore::new(pool)),
    };

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(host = %addr, "Starting ticketing API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
