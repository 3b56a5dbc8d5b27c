pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::analytics::AnalyticsStore;
use crate::services::mailer::Mailer;
use crate::services::mpesa::MpesaClient;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub mailer: Mailer,
    pub mpesa: MpesaClient,
    pub analytics: Arc<dyn AnalyticsStore>,
}
