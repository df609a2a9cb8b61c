/// Core portfolio type definitions
///
/// Row types for projects, tags, and categories plus the validated input
/// structs the HTTP layer hands to the service. All wire types serialize
/// to JSON.

use serde::{Deserialize, Serialize};

/// A portfolio project record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier (uuid string)
    pub id: String,
    /// Display title as entered on the form
    pub title: String,
    /// URL-safe identifier derived from the title
    /// Re-derived on every title change; global uniqueness is not enforced
    pub slug: String,
    /// Free-form project description
    pub description: String,
    /// Optional category reference for the public site's grouping
    pub category_id: Option<String>,
    /// Blob-store key of the cover image, when one was uploaded
    pub cover_image: Option<String>,
    /// Creation timestamp (rfc3339)
    pub created_at: String,
    /// Last-modified timestamp (rfc3339)
    pub updated_at: String,
}

/// A tag usable on any number of projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A category offered on the create/edit forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Project with its associated data, as served on show/edit
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    /// The project record itself, flattened into the response object
    #[serde(flatten)]
    pub project: Project,
    /// Tags currently associated with the project
    pub tags: Vec<Tag>,
    /// Resolved category, when the project carries a category_id
    pub category: Option<Category>,
}

/// Everything the edit form needs: the project plus the full option lists
#[derive(Debug, Serialize)]
pub struct EditFormData {
    pub project: ProjectDetail,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// Selectable options for the create form
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// An uploaded cover image held in memory until the blob store takes it
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Original filename as submitted (extension is kept for the blob key)
    pub filename: String,
    /// MIME type reported by the client, if any
    pub content_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// Validated form data for create and update
///
/// Field values arrive already validated by the admin frontend; the service
/// only enforces structural and referential checks. On update, `tags` is the
/// full replacement set: an empty vec clears every association.
#[derive(Debug, Default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    /// Tag ids to associate with the project
    pub tags: Vec<String>,
    /// Cover image upload, when the form carried one
    pub cover_image: Option<UploadedImage>,
}
