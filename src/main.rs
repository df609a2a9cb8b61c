/// Showfolio: portfolio admin backend
///
/// Main entry point for the Showfolio server. Initializes configuration and
/// starts the HTTP server with project management endpoints.

use showfolio::{config::Config, server::start_server};

/// Application entry point
///
/// Initializes the server with default configuration and starts listening
/// for requests. The server provides:
/// - Project management API at /api/projects/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3006 and local data/media dirs)
    let config = Config::default();

    // Start the server
    start_server(config).await?;

    Ok(())
}
