/// Server setup and initialization
///
/// Wires together all components: database pool, storage layers, media
/// store, project service, and HTTP routes. Provides the main application
/// factory function for creating the Axum app.

use crate::{
    api::{create_project_routes, projects::AppState},
    config::Config,
    db,
    media::MediaStore,
    portfolio::{
        service::ProjectService,
        storage::{ProjectStorage, TaxonomyStorage},
    },
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Initializes all components and wires them together into a complete
/// application: database pool, schema, blob store, service, and HTTP routes.
pub async fn create_app(config: Config) -> Result<Router> {
    // Ensure media directory exists
    tracing::info!("📁 Ensuring media directory exists: {}", config.media.media_dir);
    std::fs::create_dir_all(&config.media.media_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create media directory: {}", e))?;

    // Open the admin database and initialize its schema
    let pool = db::connect_pool(&config.database.data_dir).await?;

    tracing::info!("📋 Initializing project schema");
    let storage = ProjectStorage::new(pool.clone());
    storage
        .init_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize schema: {}", e))?;
    let taxonomy = TaxonomyStorage::new(pool);

    // Blob store for uploaded cover images
    tracing::info!("🖼️ Initializing media store: {}", config.media.media_dir);
    let media = MediaStore::new(&config.media.media_dir);

    // Create application state
    tracing::info!("🏗️ Creating application state");
    let service = Arc::new(ProjectService::new(storage, taxonomy, media));
    let app_state = AppState { service };

    // Create the main application router
    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Project management API routes
        .merge(create_project_routes().with_state(app_state));

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured
/// address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Showfolio server...");

    // Create the application
    let app = create_app(config.clone()).await?;

    // Bind to the configured address
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    // Start the server
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
