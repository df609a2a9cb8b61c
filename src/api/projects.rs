/// Project management REST API endpoints
///
/// CRUD over portfolio projects. Create and update accept multipart form
/// submissions so a cover image can ride along with the text fields; the
/// create response carries the derived slug for downstream redirection.

use crate::portfolio::service::{ProjectService, ServiceError};
use crate::portfolio::types::{EditFormData, FormOptions, ProjectDetail, ProjectInput, UploadedImage};
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Project resource coordination layer
    pub service: Arc<ProjectService>,
}

/// Response for project creation/update operations
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub slug: String,
    pub message: String,
}

/// Create project management routes
///
/// Sets up the REST API endpoints for project CRUD plus the form-population
/// endpoints the admin frontend uses for its create/edit screens.
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", post(create_project))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/new", get(new_project_form))
        .route("/api/projects/{id}", get(show_project))
        .route("/api/projects/{id}/edit", get(edit_project_form))
        .route("/api/projects/{id}", put(update_project))
        .route("/api/projects/{id}", delete(destroy_project))
}

/// List all projects
///
/// GET /api/projects
/// Returns: { "projects": [{ "id": "...", "title": "...", "slug": "...", ... }] }
async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.service.list().await {
        Ok(projects) => Ok(Json(json!({ "projects": projects }))),
        Err(e) => Err(error_status("list projects", e)),
    }
}

/// Create a new project
///
/// POST /api/projects
/// Multipart fields: title, description, category_id (optional), repeated
/// tags entries, optional cover_image file part.
async fn create_project(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProjectResponse>, StatusCode> {
    let input = parse_project_form(multipart).await?;

    // Structural validation only; field rules live in the admin frontend
    if input.title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.service.create(input).await {
        Ok(project) => {
            let message = format!("Project '{}' created successfully", project.title);
            Ok(Json(ProjectResponse {
                id: project.id,
                slug: project.slug,
                message,
            }))
        }
        Err(e) => Err(error_status("create project", e)),
    }
}

/// Selectable options for the create form
///
/// GET /api/projects/new
/// Returns: { "categories": [...], "tags": [...] }
async fn new_project_form(State(state): State<AppState>) -> Result<Json<FormOptions>, StatusCode> {
    match state.service.form_options().await {
        Ok(options) => Ok(Json(options)),
        Err(e) => Err(error_status("load form options", e)),
    }
}

/// Display a single project with its tags and category
///
/// GET /api/projects/{id} (accepts the record id or the public slug)
async fn show_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetail>, StatusCode> {
    match state.service.retrieve(&id).await {
        Ok(detail) => Ok(Json(detail)),
        Err(e) => Err(error_status("show project", e)),
    }
}

/// Everything the edit form needs
///
/// GET /api/projects/{id}/edit
/// Returns: { "project": {...}, "categories": [...], "tags": [...] }
async fn edit_project_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditFormData>, StatusCode> {
    match state.service.prepare_edit(&id).await {
        Ok(form) => Ok(Json(form)),
        Err(e) => Err(error_status("load edit form", e)),
    }
}

/// Update an existing project
///
/// PUT /api/projects/{id}
/// Same multipart fields as create. The submitted tag set fully replaces
/// the stored one; omitting every tags field clears all associations.
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ProjectResponse>, StatusCode> {
    let input = parse_project_form(multipart).await?;

    if input.title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.service.update(&id, input).await {
        Ok(project) => {
            let message = format!("Project '{}' updated successfully", project.title);
            Ok(Json(ProjectResponse {
                id: project.id,
                slug: project.slug,
                message,
            }))
        }
        Err(e) => Err(error_status("update project", e)),
    }
}

/// Delete a project
///
/// DELETE /api/projects/{id}
/// Returns: { "message": "Project '...' deleted successfully" }
async fn destroy_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.service.delete(&id).await {
        Ok(project) => Ok(Json(json!({
            "message": format!("Project '{}' deleted successfully", project.title)
        }))),
        Err(e) => Err(error_status("delete project", e)),
    }
}

/// Parse the multipart form shared by create and update
///
/// Unknown fields are ignored. A cover_image part without a filename is
/// treated as "no upload", since browsers submit an empty file part when
/// the picker was left untouched.
async fn parse_project_form(mut multipart: Multipart) -> Result<ProjectInput, StatusCode> {
    let mut input = ProjectInput::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed multipart submission: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match name.as_str() {
            "title" => input.title = read_text(field).await?,
            "description" => input.description = read_text(field).await?,
            "category_id" => {
                let value = read_text(field).await?;
                if !value.is_empty() {
                    input.category_id = Some(value);
                }
            }
            "tags" => {
                let value = read_text(field).await?;
                if !value.is_empty() {
                    input.tags.push(value);
                }
            }
            "cover_image" => {
                let filename = match field.file_name() {
                    Some(filename) if !filename.is_empty() => filename.to_string(),
                    _ => continue,
                };
                let content_type = field.content_type().map(|ct| ct.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read cover_image upload: {}", e);
                    StatusCode::BAD_REQUEST
                })?;
                input.cover_image = Some(UploadedImage {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(input)
}

/// Read a text field, mapping decode failures to 400
async fn read_text(field: Field<'_>) -> Result<String, StatusCode> {
    field.text().await.map_err(|e| {
        tracing::warn!("Malformed multipart field: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Map service errors onto HTTP status codes
fn error_status(operation: &str, err: ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(id) => {
            tracing::debug!("{}: not found: {}", operation, id);
            StatusCode::NOT_FOUND
        }
        ServiceError::InvalidInput(reason) => {
            tracing::warn!("{}: invalid input: {}", operation, reason);
            StatusCode::BAD_REQUEST
        }
        ServiceError::Storage(e) => {
            tracing::error!("{}: storage failure: {}", operation, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
