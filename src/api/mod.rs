/// HTTP API Layer
///
/// This module provides the REST API endpoints for the portfolio admin
/// panel. It handles:
/// - Project CRUD operations with multipart create/update
/// - Form-population endpoints (categories + tags)

// Project management endpoints (POST/GET/PUT/DELETE)
pub mod projects;

// Re-export router builder
pub use projects::create_project_routes;
