//! boardtriage server entry point.
//!
//! Starts the Axum HTTP server backed by PostgreSQL.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use boardtriage::api;
use boardtriage::app_state::AppState;
use boardtriage::config::AppConfig;
use boardtriage::persistence::postgres::PgStore;
use boardtriage::service::{
    ActivityService, CatalogService, LotService, ScanService, StatsService, UserService,
};
use boardtriage::vision::HttpClassifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting boardtriage");

    // Connect to PostgreSQL and run migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database ready, migrations applied");

    let store = Arc::new(PgStore::new(pool));

    // Bootstrap admin account when configured
    if let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash) {
        let users = UserService::new(Arc::clone(&store));
        users.ensure_admin(email, hash, None).await?;
    }

    // Build the vision collaborator client
    let classifier = Arc::new(HttpClassifier::new(
        config.vision_api_url.clone(),
        config.vision_api_key.clone(),
        config.vision_timeout_secs,
    )?);

    // Build service layer
    let app_state = AppState {
        scans: Arc::new(ScanService::new(Arc::clone(&store), classifier)),
        lots: Arc::new(LotService::new(Arc::clone(&store))),
        sessions: Arc::new(ActivityService::new(Arc::clone(&store))),
        stats: Arc::new(StatsService::new(Arc::clone(&store))),
        catalog: Arc::new(CatalogService::new(Arc::clone(&store))),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
